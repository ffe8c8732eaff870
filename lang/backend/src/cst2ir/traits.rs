use crate::result::BackendResult;

use super::ctx::{Emitted, Env, GenCtx};

/// Convert CST to IR (intermediate representation)
///
/// `ctx` describes where in the grammar the node is found, `env` holds the rule table and
/// action and predicate functions as well as unresolved references are collected in `out`.
pub trait ToIR {
    type Target;

    fn to_ir(&self, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> BackendResult<Self::Target>;
}
