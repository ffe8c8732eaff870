use serde_derive::{Deserialize, Serialize};

use crate::terms::Element;

/// A complete grammar definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    /// Code emitted verbatim in front of the generated module.
    #[serde(default)]
    pub prologue: Option<String>,
    /// Code emitted verbatim at the end of the generated module.
    #[serde(default)]
    pub epilogue: Option<String>,
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        Grammar { rules, prologue: None, epilogue: None }
    }

    pub fn start_rule(&self) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.start)
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub start: bool,
    pub body: Choice,
}

impl Rule {
    pub fn new(id: &str, body: Choice) -> Self {
        Rule { id: id.to_owned(), start: false, body }
    }

    pub fn start(id: &str, body: Choice) -> Self {
        Rule { id: id.to_owned(), start: true, body }
    }
}

/// Ordered choice: the first alternative that succeeds wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub alternatives: Vec<Sequence>,
}

impl Choice {
    pub fn new(alternatives: Vec<Sequence>) -> Self {
        Choice { alternatives }
    }

    /// A choice with a single alternative.
    pub fn single(sequence: Sequence) -> Self {
        Choice { alternatives: vec![sequence] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub action: Option<Action>,
}

impl Sequence {
    pub fn new(elements: Vec<Element>) -> Self {
        Sequence { elements, action: None }
    }

    pub fn with_action(mut self, code: &str) -> Self {
        self.action = Some(Action { code: code.to_owned() });
        self
    }
}

/// A semantic action attached to an alternative.
///
/// The code is opaque target-language text; its return type lives in the [`crate::ActionTypes`] table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub code: String,
}
