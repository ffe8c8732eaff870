use serde_derive::{Deserialize, Serialize};

use crate::grammar::Choice;
use crate::kind::NodeKind;

// Sequence elements
//
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// `@e`: the value of `e` is part of the alternative's result.
    Pluck(Pluck),
    Labeled(Labeled),
    /// `&e`
    Assertion(Assertion),
    /// `!e`
    NegAssertion(Assertion),
}

impl Element {
    pub fn kind(&self) -> NodeKind {
        match self {
            Element::Pluck(_) => NodeKind::Pluck,
            Element::Labeled(_) => NodeKind::Labeled,
            Element::Assertion(_) => NodeKind::Assertion,
            Element::NegAssertion(_) => NodeKind::NegAssertion,
        }
    }

    /// An unlabeled, unquantified element.
    pub fn expr(expr: Expr) -> Self {
        Element::Labeled(Labeled { label: None, annotated: Annotated::new(expr) })
    }

    pub fn quantified(expr: Expr, qty: Quantifier) -> Self {
        Element::Labeled(Labeled { label: None, annotated: Annotated { expr, qty } })
    }

    pub fn labeled(label: &str, annotated: Annotated) -> Self {
        Element::Labeled(Labeled { label: Some(label.to_owned()), annotated })
    }

    pub fn pluck(label: Option<&str>, annotated: Annotated) -> Self {
        Element::Pluck(Pluck {
            labeled: Labeled { label: label.map(ToOwned::to_owned), annotated },
        })
    }

    pub fn assert(target: AssertionTarget) -> Self {
        Element::Assertion(Assertion { target })
    }

    pub fn assert_not(target: AssertionTarget) -> Self {
        Element::NegAssertion(Assertion { target })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pluck {
    pub labeled: Labeled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled {
    #[serde(default)]
    pub label: Option<String>,
    pub annotated: Annotated,
}

/// An expression together with its repetition quantifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotated {
    pub expr: Expr,
    #[serde(default)]
    pub qty: Quantifier,
}

impl Annotated {
    pub fn new(expr: Expr) -> Self {
        Annotated { expr, qty: Quantifier::One }
    }

    pub fn with(expr: Expr, qty: Quantifier) -> Self {
        Annotated { expr, qty }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// No quantifier
    #[default]
    One,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `|n|`
    Exact(u32),
    /// `|min..max|`, either bound may be omitted
    Range { min: Option<u32>, max: Option<u32> },
    /// `|n, sep|`
    Separated { count: u32, separator: Box<Expr> },
    /// `|min..max|` with bounds given as target-language expressions.
    ///
    /// Experimental: the bounds are evaluated once before the first repetition.
    Dynamic { min: Option<String>, max: Option<String> },
}

// Assertions
//
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub target: AssertionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionTarget {
    Predicate(Predicate),
    Element(Annotated),
}

/// A code-block condition such as `&{ return n > 0 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default)]
    pub params: Vec<PredicateParam>,
    #[serde(default)]
    pub return_type: String,
    pub code: String,
}

/// Binds the parameter `name` to the capture labeled `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateParam {
    pub name: String,
    pub source: String,
}

// Expressions
//
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Literal),
    Class(CharClass),
    RuleRef(RuleRef),
    /// `.`
    Any,
    /// `!.`
    End,
    /// A parenthesized sub-expression.
    Group(Choice),
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Class(_) => NodeKind::CharClass,
            Expr::RuleRef(_) => NodeKind::RuleRef,
            Expr::Any => NodeKind::AnyChar,
            Expr::End => NodeKind::EndOfInput,
            Expr::Group(_) => NodeKind::Choice,
        }
    }

    pub fn literal(value: &str) -> Self {
        Expr::Literal(Literal { value: value.to_owned() })
    }

    pub fn rule_ref(target: &str) -> Self {
        Expr::RuleRef(RuleRef { target: target.to_owned() })
    }

    pub fn class(items: Vec<ClassItem>) -> Self {
        Expr::Class(CharClass { items })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClass {
    pub items: Vec<ClassItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassItem {
    Char(char),
    Range(Range),
}

impl ClassItem {
    pub fn range(bottom: char, top: char) -> Self {
        ClassItem::Range(Range { bottom, top })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub bottom: char,
    pub top: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRef {
    pub target: String,
}
