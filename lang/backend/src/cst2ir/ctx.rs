use fortpeg_cst::{ActionTypes, HashMap, NodeKind, Rule};

use crate::ir::names::{self, Ident, RuleNames, ValueType};
use crate::ir::ActionFn;
use crate::result::{BackendError, Location, UnresolvedRuleReference};

/// Where the translation currently is.
///
/// The context is never mutated: entering an alternative, an element or a nested group derives a
/// child context, and the parent context stays valid for the remaining siblings.
#[derive(Debug, Clone)]
pub struct GenCtx {
    /// Id of the rule being translated
    pub rule: String,
    /// Base name of the rule, used to derive the names of actions and predicates
    pub base: Ident,
    /// Whether the rule is the start rule
    pub start: bool,
    /// Index of the current alternative within the innermost choice
    pub alternative: usize,
    /// Index of the current element within the current alternative
    pub position: usize,
    /// `(alternative, position)` of every enclosing group, outermost first
    pub path: Vec<(usize, usize)>,
    /// Index of the rule-level alternative containing the current position
    pub rule_alternative: usize,
    /// Whether matched values are stored; false inside lookaheads
    pub capturing: bool,
    /// Whether the current expression is a repetition separator
    pub separator: bool,
    /// Labels bound earlier in the current sequence
    pub labels: Vec<Binding>,
    /// Values of rule references captured earlier in the current sequence, labeled by rule id
    pub rule_values: Vec<Binding>,
    /// Rule ids the predicates of the current sequence may take values from
    pub predicate_sources: Vec<String>,
}

/// A label of a sequence element and the variable holding its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub label: String,
    pub var: String,
    pub ty: ValueType,
}

impl GenCtx {
    pub fn rule(rule: &str, base: Ident, start: bool) -> Self {
        GenCtx {
            rule: rule.to_owned(),
            base,
            start,
            alternative: 0,
            position: 0,
            path: Vec::new(),
            rule_alternative: 0,
            capturing: true,
            separator: false,
            labels: Vec::new(),
            rule_values: Vec::new(),
            predicate_sources: Vec::new(),
        }
    }

    /// Enter alternative `idx` of the innermost choice.
    pub fn alternative(&self, idx: usize) -> Self {
        let rule_alternative = if self.is_nested() { self.rule_alternative } else { idx };
        GenCtx {
            alternative: idx,
            position: 0,
            rule_alternative,
            labels: Vec::new(),
            rule_values: Vec::new(),
            predicate_sources: Vec::new(),
            ..self.clone()
        }
    }

    /// Enter a sequence whose predicates refer to the given sources.
    pub fn sequence(&self, predicate_sources: Vec<String>) -> Self {
        GenCtx { predicate_sources, ..self.clone() }
    }

    /// Move to element `pos` of the current alternative, with `labels` and `rule_values` bound
    /// before it.
    pub fn element(&self, pos: usize, labels: &[Binding], rule_values: &[Binding]) -> Self {
        GenCtx {
            position: pos,
            labels: labels.to_vec(),
            rule_values: rule_values.to_vec(),
            ..self.clone()
        }
    }

    /// Enter the group found at the current position.
    pub fn group(&self) -> Self {
        let mut path = self.path.clone();
        path.push((self.alternative, self.position));
        GenCtx {
            path,
            alternative: 0,
            position: 0,
            labels: Vec::new(),
            rule_values: Vec::new(),
            predicate_sources: Vec::new(),
            ..self.clone()
        }
    }

    pub fn lookahead(&self) -> Self {
        GenCtx { capturing: false, ..self.clone() }
    }

    pub fn in_separator(&self) -> Self {
        GenCtx { capturing: false, separator: true, ..self.clone() }
    }

    /// Whether the current alternative belongs to a nested group rather than to the rule itself.
    pub fn is_nested(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn lookup_label(&self, label: &str) -> Option<&Binding> {
        self.labels.iter().find(|binding| binding.label.eq_ignore_ascii_case(label))
    }

    /// The value of the latest reference to `rule` earlier in the current sequence.
    pub fn lookup_rule_value(&self, rule: &str) -> Option<&Binding> {
        self.rule_values.iter().rev().find(|binding| binding.label == rule)
    }

    /// Whether a reference to `rule` must keep its value for a later predicate.
    pub fn is_predicate_source(&self, rule: &str) -> bool {
        self.predicate_sources.iter().any(|source| source == rule)
    }

    pub fn location(&self) -> Location {
        Location::Alternative { rule: self.rule.clone(), alternative: self.rule_alternative }
    }

    pub fn malformed(&self, kind: NodeKind, reason: impl Into<String>) -> BackendError {
        BackendError::malformed(self.location(), kind, reason)
    }
}

/// What the translation knows about every rule before translating any of them.
#[derive(Debug)]
pub struct Env<'a> {
    pub action_types: &'a ActionTypes,
    rules: HashMap<String, RuleInfo>,
}

#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub base: Ident,
    pub function: String,
    pub result_type: ValueType,
}

impl<'a> Env<'a> {
    pub fn new(rules: &[Rule], action_types: &'a ActionTypes) -> Self {
        let names = RuleNames::new(rules.iter().map(|rule| rule.id.as_str()));

        let rules = rules
            .iter()
            .filter_map(|rule| {
                let base = names.base(&rule.id)?.clone();
                let info = RuleInfo {
                    function: names::rule_function_name(&base),
                    result_type: rule_result_type(rule, action_types),
                    base,
                };
                Some((rule.id.clone(), info))
            })
            .collect();

        Env { action_types, rules }
    }

    pub fn rule(&self, id: &str) -> Option<&RuleInfo> {
        self.rules.get(id)
    }
}

/// The declared type of the first alternative with a typed action, or text.
fn rule_result_type(rule: &Rule, action_types: &ActionTypes) -> ValueType {
    rule.body
        .alternatives
        .iter()
        .enumerate()
        .filter(|(_, alt)| alt.action.is_some())
        .filter_map(|(idx, _)| action_types.declared(&rule.id, idx))
        .map(ValueType::declared)
        .find(|ty| !ty.is_text())
        .unwrap_or(ValueType::Text)
}

/// Everything extracted while translating, in traversal order.
#[derive(Debug, Default)]
pub struct Emitted {
    pub actions: Vec<ActionFn>,
    pub unresolved: Vec<UnresolvedRuleReference>,
    /// Number of predicates extracted so far, per rule id
    predicates: HashMap<String, usize>,
}

impl Emitted {
    /// The index of the next predicate extracted from `rule`.
    pub fn next_predicate(&mut self, rule: &str) -> usize {
        let count = self.predicates.entry(rule.to_owned()).or_default();
        let index = *count;
        *count += 1;
        index
    }

    /// Whether a reference to an undefined rule was found in the given rule-level alternative.
    pub fn has_unresolved(&self, rule: &str, alternative: usize) -> bool {
        self.unresolved.iter().any(|r| r.rule == rule && r.alternative == alternative)
    }
}
