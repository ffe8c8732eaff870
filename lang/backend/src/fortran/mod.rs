//! Syntax tree of the generated Fortran code.
//!
//! Only the constructs the generated parsers need are covered; user code from the grammar is
//! carried as opaque text.

mod decls;
mod exprs;
mod stmts;

pub use decls::*;
pub use exprs::*;
pub use stmts::*;
