//! Lowering of the matcher IR to Fortran.
//!
//! Backtracking is expressed with labeled `do` loops, `select case` dispatch and `block`
//! constructs; the generated code relies on the runtime module for the primitive matches.

mod matchers;
mod rules;
mod scope;

use fortpeg_cst::HashMap;

use crate::cfg::CodegenCfg;
use crate::fortran;
use crate::ir;
use crate::ir::names::is_valid_identifier;
use crate::result::{BackendError, BackendResult};

pub use matchers::ToFortran;
pub use scope::Scope;

// Names provided by the runtime module
//
//

pub const INPUT: &str = "input";
pub const CURSOR: &str = "cursor";
pub const ACCEPT_STRING: &str = "acceptString";
pub const ACCEPT_SET: &str = "acceptSet";
pub const ACCEPT_RANGE: &str = "acceptRange";
pub const ACCEPT_PERIOD: &str = "acceptPeriod";
pub const ACCEPT_EOF: &str = "acceptEOF";

/// Lower a resolved parser to a Fortran module.
pub fn ir_to_fortran(parser: &ir::Parser, cfg: &CodegenCfg) -> BackendResult<fortran::Module> {
    let ir::Parser { prologue, epilogue, rules, actions } = parser;
    let CodegenCfg { module_name, runtime_module, .. } = cfg;

    for name in [module_name, runtime_module] {
        if !is_valid_identifier(name) {
            return Err(BackendError::CodegenError(format!(
                "`{name}` is not a valid Fortran module name"
            )));
        }
    }
    if module_name.eq_ignore_ascii_case(runtime_module) {
        return Err(BackendError::CodegenError(format!(
            "The generated module and the runtime module are both named `{module_name}`"
        )));
    }

    // module procedures share one namespace, which is case-insensitive
    let mut seen: HashMap<String, ()> = HashMap::default();
    let names = rules.iter().map(|rule| &rule.name).chain(actions.iter().map(|action| &action.name));
    for name in names {
        if !is_valid_identifier(name) {
            return Err(BackendError::CodegenError(format!(
                "The generated name `{name}` is not a valid Fortran identifier"
            )));
        }
        if seen.insert(name.to_ascii_lowercase(), ()).is_some() {
            return Err(BackendError::CodegenError(format!(
                "The generated name `{name}` is used for more than one function"
            )));
        }
    }

    let mut functions = rules.iter().map(rules::rule_to_fortran).collect::<BackendResult<Vec<_>>>()?;
    functions.extend(actions.iter().map(rules::action_to_fortran));

    log::debug!("Emitting module `{module_name}` with {} function(s)", functions.len());

    Ok(fortran::Module {
        name: module_name.clone(),
        uses: vec![runtime_module.clone()],
        prologue: prologue.clone(),
        functions,
        epilogue: epilogue.clone(),
    })
}
