use serde_derive::{Deserialize, Serialize};

use crate::HashMap;
use crate::grammar::Grammar;

/// Declared return types of semantic actions, keyed by rule id and alternative index.
///
/// The table is produced alongside the CST and is read-only during translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ActionTypeEntry>", into = "Vec<ActionTypeEntry>")]
pub struct ActionTypes {
    entries: HashMap<(String, usize), String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTypeEntry {
    pub rule: String,
    pub alternative: usize,
    pub return_type: String,
}

impl ActionTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: &str, alternative: usize, return_type: &str) {
        self.entries.insert((rule.to_owned(), alternative), return_type.to_owned());
    }

    pub fn with(mut self, rule: &str, alternative: usize, return_type: &str) -> Self {
        self.insert(rule, alternative, return_type);
        self
    }

    /// The declared return type of the action attached to `alternative` of `rule`, if any.
    pub fn declared(&self, rule: &str, alternative: usize) -> Option<&str> {
        self.entries.get(&(rule.to_owned(), alternative)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ActionTypeEntry>> for ActionTypes {
    fn from(entries: Vec<ActionTypeEntry>) -> Self {
        let mut table = ActionTypes::new();
        for ActionTypeEntry { rule, alternative, return_type } in entries {
            table.insert(&rule, alternative, &return_type);
        }
        table
    }
}

impl From<ActionTypes> for Vec<ActionTypeEntry> {
    fn from(table: ActionTypes) -> Self {
        let mut entries: Vec<_> = table
            .entries
            .into_iter()
            .map(|((rule, alternative), return_type)| ActionTypeEntry {
                rule,
                alternative,
                return_type,
            })
            .collect();
        entries.sort_by(|a, b| (&a.rule, a.alternative).cmp(&(&b.rule, b.alternative)));
        entries
    }
}

/// The input of the translator: a grammar and the return types of its actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CstDocument {
    pub grammar: Grammar,
    #[serde(default)]
    pub action_types: ActionTypes,
}
