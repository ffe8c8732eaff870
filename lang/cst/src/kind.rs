use std::fmt;

/// The kinds of CST nodes, used to identify offending nodes in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Grammar,
    Rule,
    Choice,
    Sequence,
    Action,
    Pluck,
    Labeled,
    Annotated,
    Assertion,
    NegAssertion,
    Predicate,
    Literal,
    CharClass,
    Range,
    RuleRef,
    AnyChar,
    EndOfInput,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Grammar => "grammar",
            NodeKind::Rule => "rule",
            NodeKind::Choice => "choice",
            NodeKind::Sequence => "sequence",
            NodeKind::Action => "action",
            NodeKind::Pluck => "pluck",
            NodeKind::Labeled => "labeled expression",
            NodeKind::Annotated => "quantified expression",
            NodeKind::Assertion => "assertion",
            NodeKind::NegAssertion => "negative assertion",
            NodeKind::Predicate => "predicate",
            NodeKind::Literal => "string literal",
            NodeKind::CharClass => "character class",
            NodeKind::Range => "character range",
            NodeKind::RuleRef => "rule reference",
            NodeKind::AnyChar => "any character",
            NodeKind::EndOfInput => "end of input",
        };
        write!(f, "{name}")
    }
}
