use std::fmt;

use fortpeg_cst::NodeKind;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum BackendError {
    #[error("Malformed {kind} in {location}: {reason}")]
    #[diagnostic(help("The grammar frontend produced a tree this translator cannot handle."))]
    MalformedGrammarNode { location: Location, kind: NodeKind, reason: String },
    #[error("The grammar contains {} unresolved rule reference(s)", .0.len())]
    UnresolvedRuleReferences(#[related] Vec<UnresolvedRuleReference>),
    #[error("Code generation error: {0}")]
    CodegenError(String),
}

impl BackendError {
    pub fn malformed(location: Location, kind: NodeKind, reason: impl Into<String>) -> Self {
        BackendError::MalformedGrammarNode { location, kind, reason: reason.into() }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("Rule `{rule}` (alternative {alternative}) refers to the undefined rule `{target}`")]
pub struct UnresolvedRuleReference {
    pub rule: String,
    pub alternative: usize,
    pub target: String,
}

/// Where in the grammar an error was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Grammar,
    Rule { rule: String },
    Alternative { rule: String, alternative: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Grammar => write!(f, "the grammar"),
            Location::Rule { rule } => write!(f, "rule `{rule}`"),
            Location::Alternative { rule, alternative } => {
                write!(f, "rule `{rule}`, alternative {alternative}")
            }
        }
    }
}

pub type BackendResult<T = ()> = Result<T, BackendError>;
