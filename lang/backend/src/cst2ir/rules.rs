use fortpeg_cst as cst;
use fortpeg_cst::NodeKind;

use crate::ir;
use crate::ir::names::{self, RESULT_VAR};
use crate::result::{BackendError, BackendResult, Location};

use super::ctx::{Binding, Emitted, Env, GenCtx};
use super::elements::{Lowered, element_to_ir};
use super::traits::ToIR;

pub(super) fn rule_to_ir(rule: &cst::Rule, env: &Env, out: &mut Emitted) -> BackendResult<ir::RuleFn> {
    let cst::Rule { id, start, body } = rule;

    let Some(info) = env.rule(id) else {
        return Err(BackendError::CodegenError(format!("No generated name for rule `{id}`")));
    };

    log::debug!("Translating rule `{id}` into `{}`", info.function);

    let ctx = GenCtx::rule(id, info.base.clone(), *start);
    let alternatives = body.to_ir(&ctx, env, out)?;

    for (idx, alt) in alternatives.iter().enumerate() {
        // unresolved calls are typed as text; they are reported once the grammar is done
        if out.has_unresolved(id, idx) {
            continue;
        }
        if !alt.result_type.same_as(&info.result_type) {
            return Err(BackendError::malformed(
                Location::Alternative { rule: id.clone(), alternative: idx },
                NodeKind::Sequence,
                format!(
                    "the alternative produces a value of type `{}` but the rule produces `{}`",
                    alt.result_type, info.result_type
                ),
            ));
        }
    }

    Ok(ir::RuleFn {
        id: id.clone(),
        name: info.function.clone(),
        start: *start,
        result_type: info.result_type.clone(),
        body: ir::Choice { alternatives, result: Some(RESULT_VAR.to_owned()) },
    })
}

impl ToIR for cst::Choice {
    type Target = Vec<ir::Sequence>;

    fn to_ir(&self, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> BackendResult<Self::Target> {
        let cst::Choice { alternatives } = self;

        if alternatives.is_empty() {
            return Err(ctx.malformed(NodeKind::Choice, "a choice needs at least one alternative"));
        }

        alternatives
            .iter()
            .enumerate()
            .map(|(idx, alt)| {
                log::trace!("Translating alternative {idx} of `{}` at {:?}", ctx.rule, ctx.path);
                alt.to_ir(&ctx.alternative(idx), env, out)
            })
            .collect()
    }
}

impl ToIR for cst::Sequence {
    type Target = ir::Sequence;

    fn to_ir(&self, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> BackendResult<Self::Target> {
        let cst::Sequence { elements, action } = self;

        let ctx = ctx.sequence(predicate_sources(elements));

        let mut lowered = Vec::with_capacity(elements.len());
        let mut labels: Vec<Binding> = Vec::new();
        let mut rule_values: Vec<Binding> = Vec::new();
        let mut plucks: Vec<(String, ir::ValueType)> = Vec::new();

        for (pos, element) in elements.iter().enumerate() {
            let ctx = ctx.element(pos, &labels, &rule_values);
            let Lowered { element, label, rule, pluck } = element_to_ir(element, &ctx, env, out)?;

            if let Some(ir::Capture { var, ty, .. }) = &element.capture {
                if let Some(label) = label {
                    labels.push(Binding { label, var: var.clone(), ty: ty.clone() });
                }
                if let Some(rule) = rule {
                    rule_values.push(Binding { label: rule, var: var.clone(), ty: ty.clone() });
                }
                if pluck {
                    plucks.push((var.clone(), ty.clone()));
                }
            }
            lowered.push(element);
        }

        let (result, result_type) = match action {
            Some(action) => action_result(action, &labels, &ctx, env, out)?,
            None if !plucks.is_empty() => concat_result(&plucks, &ctx)?,
            None => {
                let captures: Vec<_> =
                    labels.iter().map(|binding| (binding.var.clone(), binding.ty.clone())).collect();
                concat_result(&captures, &ctx)?
            }
        };

        Ok(ir::Sequence { elements: lowered, result, result_type })
    }
}

/// The sources named by the parameters of the predicates directly inside a sequence.
fn predicate_sources(elements: &[cst::Element]) -> Vec<String> {
    elements
        .iter()
        .filter_map(|element| match element {
            cst::Element::Assertion(assertion) | cst::Element::NegAssertion(assertion) => {
                match &assertion.target {
                    cst::AssertionTarget::Predicate(predicate) => Some(&predicate.params),
                    cst::AssertionTarget::Element(_) => None,
                }
            }
            cst::Element::Labeled(_) | cst::Element::Pluck(_) => None,
        })
        .flatten()
        .map(|param| param.source.clone())
        .collect()
}

/// Extract the action into its own function, called with the labeled captures.
fn action_result(
    action: &cst::Action,
    labels: &[Binding],
    ctx: &GenCtx,
    env: &Env,
    out: &mut Emitted,
) -> BackendResult<(ir::AltResult, ir::ValueType)> {
    if ctx.is_nested() {
        return Err(ctx.malformed(
            NodeKind::Action,
            "semantic actions are only supported on the alternatives of a rule",
        ));
    }

    let result_type = names::result_type(&ctx.rule, ctx.alternative, env.action_types);
    let function = names::action_id(&ctx.base, ctx.alternative);

    let params = labels
        .iter()
        .map(|Binding { label, ty, .. }| ir::Param { name: label.clone(), ty: ty.clone() })
        .collect();
    let args = labels.iter().map(|binding| binding.var.clone()).collect();

    out.actions.push(ir::ActionFn {
        kind: ir::ActionKind::Action,
        name: function.clone(),
        params,
        result_type: result_type.clone(),
        code: action.code.clone(),
    });

    Ok((ir::AltResult::Action(ir::ActionCall { function, args }), result_type))
}

fn concat_result(
    captures: &[(String, ir::ValueType)],
    ctx: &GenCtx,
) -> BackendResult<(ir::AltResult, ir::ValueType)> {
    match captures {
        [] => Ok((ir::AltResult::Consumed, ir::ValueType::Text)),
        [(var, ty)] => Ok((ir::AltResult::Capture(var.clone()), ty.clone())),
        captures => {
            if let Some((var, ty)) = captures.iter().find(|(_, ty)| !ty.is_text()) {
                return Err(ctx.malformed(
                    NodeKind::Sequence,
                    format!("cannot concatenate `{var}` of type `{ty}` with other captured values"),
                ));
            }
            let vars = captures.iter().map(|(var, _)| var.clone()).collect();
            Ok((ir::AltResult::Concat(vars), ir::ValueType::Text))
        }
    }
}
