//! Concrete syntax tree of PEG grammar definitions.
//!
//! The tree is produced by an external grammar frontend and is never mutated by the translator.
//! Every node kind is a closed Rust type, so consumers match exhaustively over them.

mod action_types;
mod grammar;
mod kind;
mod terms;

pub use action_types::*;
pub use grammar::*;
pub use kind::*;
pub use terms::*;

pub type HashMap<K, V> = std::collections::HashMap<K, V, fxhash::FxBuildHasher>;
