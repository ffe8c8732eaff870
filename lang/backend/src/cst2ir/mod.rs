//! Resolution of a grammar into the matcher IR.
//!
//! Rule names, capture variables, result types and the extracted action and predicate functions
//! are all decided here; control flow is left to [`crate::ir2fortran`].

mod ctx;
mod elements;
mod rules;
mod traits;

use fortpeg_cst::{ActionTypes, Grammar, HashMap, NodeKind};

use crate::ir;
use crate::result::{BackendError, BackendResult, Location};

pub use ctx::{Binding, Emitted, Env, GenCtx, RuleInfo};
pub use traits::ToIR;

/// Resolve `grammar` into the matcher IR.
///
/// Malformed nodes abort the translation right away; references to undefined rules are collected
/// over the whole grammar and reported together.
pub fn grammar_to_ir(grammar: &Grammar, action_types: &ActionTypes) -> BackendResult<ir::Parser> {
    let Grammar { rules, prologue, epilogue } = grammar;

    check_rules(grammar)?;

    let env = Env::new(rules, action_types);
    let mut out = Emitted::default();

    let rules = rules
        .iter()
        .map(|rule| rules::rule_to_ir(rule, &env, &mut out))
        .collect::<BackendResult<Vec<_>>>()?;

    let Emitted { actions, unresolved, .. } = out;
    if !unresolved.is_empty() {
        return Err(BackendError::UnresolvedRuleReferences(unresolved));
    }

    log::debug!("Resolved {} rule(s) and {} action function(s)", rules.len(), actions.len());

    Ok(ir::Parser { prologue: prologue.clone(), epilogue: epilogue.clone(), rules, actions })
}

/// Rule ids must be unique and exactly one rule must be the start rule.
fn check_rules(grammar: &Grammar) -> BackendResult {
    let mut seen: HashMap<&str, ()> = HashMap::default();
    for rule in &grammar.rules {
        if seen.insert(rule.id.as_str(), ()).is_some() {
            return Err(BackendError::malformed(
                Location::Rule { rule: rule.id.clone() },
                NodeKind::Rule,
                "the rule id is defined more than once",
            ));
        }
    }

    let start_rules: Vec<_> =
        grammar.rules.iter().filter(|rule| rule.start).map(|rule| rule.id.as_str()).collect();
    match start_rules.as_slice() {
        [_] => Ok(()),
        [] => Err(BackendError::malformed(
            Location::Grammar,
            NodeKind::Grammar,
            "the grammar has no start rule",
        )),
        ids => Err(BackendError::malformed(
            Location::Grammar,
            NodeKind::Grammar,
            format!("the grammar has several start rules: {}", ids.join(", ")),
        )),
    }
}
