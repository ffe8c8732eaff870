//! Matcher IR: the grammar after name and type resolution.
//! Control flow is still structured (sequences, choices, repetitions, lookaheads), so this
//! representation makes no assumptions about the control-flow primitives of the target language.

pub mod matchers;
pub mod names;
pub mod parser;

pub use matchers::*;
pub use names::{Ident, RuleNames, ValueType};
pub use parser::*;
