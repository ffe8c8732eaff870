//! Translation of PEG grammars into standalone recursive-descent parsers written in Fortran.
//!
//! The translation runs in two stages: [`cst2ir`] resolves names, captures, result types and
//! semantic actions into the matcher IR, and [`ir2fortran`] lowers the IR's control flow into a
//! Fortran syntax tree, which is then printed.

pub mod cfg;
pub mod cst2ir;
pub mod fortran;
pub mod ir;
pub mod ir2fortran;
pub mod result;

use fortpeg_cst::{ActionTypes, Grammar};
use fortpeg_printer::Print;

pub use cfg::CodegenCfg;
pub use cst2ir::grammar_to_ir;
pub use ir2fortran::ir_to_fortran;

use result::BackendResult;

/// The output of a translation.
#[derive(Debug, Clone)]
pub struct Translation {
    /// The complete generated document, action functions included.
    pub source: String,
    /// The extracted action and predicate functions in emission order.
    pub actions: Vec<ir::ActionFn>,
}

/// Translate a grammar and its action-type table into Fortran source text.
///
/// Either the complete document is returned or an error; there is no partial output.
pub fn translate(
    grammar: &Grammar,
    action_types: &ActionTypes,
    cfg: &CodegenCfg,
) -> BackendResult<Translation> {
    let parser = grammar_to_ir(grammar, action_types)?;
    let module = ir_to_fortran(&parser, cfg)?;
    let source = tidy(&module.print_to_string(Some(&cfg.print_cfg())));
    let ir::Parser { actions, .. } = parser;
    Ok(Translation { source, actions })
}

/// Strip trailing whitespace, which the printer leaves on empty indented lines.
fn tidy(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
