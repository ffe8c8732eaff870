use fortpeg_cst as cst;
use fortpeg_cst::NodeKind;

use crate::ir;
use crate::ir::names::{self, RESULT_VAR};
use crate::result::{BackendResult, UnresolvedRuleReference};

use super::ctx::{Emitted, Env, GenCtx};
use super::traits::ToIR;

/// A sequence element after resolution, with the label it binds.
pub(super) struct Lowered {
    pub element: ir::Element,
    pub label: Option<String>,
    /// Id of the rule whose captured value the element holds
    pub rule: Option<String>,
    pub pluck: bool,
}

pub(super) fn element_to_ir(
    element: &cst::Element,
    ctx: &GenCtx,
    env: &Env,
    out: &mut Emitted,
) -> BackendResult<Lowered> {
    match element {
        cst::Element::Pluck(cst::Pluck { labeled }) => labeled_to_ir(labeled, true, ctx, env, out),
        cst::Element::Labeled(labeled) => labeled_to_ir(labeled, false, ctx, env, out),
        cst::Element::Assertion(assertion) => {
            let matcher = assertion_to_ir(assertion, false, ctx, env, out)?;
            Ok(Lowered::uncaptured(matcher, false))
        }
        cst::Element::NegAssertion(assertion) => {
            let matcher = assertion_to_ir(assertion, true, ctx, env, out)?;
            Ok(Lowered::uncaptured(matcher, false))
        }
    }
}

impl Lowered {
    fn uncaptured(matcher: ir::Matcher, pluck: bool) -> Self {
        Lowered { element: ir::Element { matcher, capture: None }, label: None, rule: None, pluck }
    }
}

fn labeled_to_ir(
    labeled: &cst::Labeled,
    pluck: bool,
    ctx: &GenCtx,
    env: &Env,
    out: &mut Emitted,
) -> BackendResult<Lowered> {
    let cst::Labeled { label, annotated } = labeled;

    if let Some(label) = label {
        check_label(label, ctx, NodeKind::Labeled)?;
    }

    // a predicate later in the sequence may take the value of an unlabeled rule reference
    let predicate_source = match annotated {
        cst::Annotated { expr: cst::Expr::RuleRef(rule_ref), qty: cst::Quantifier::One } => {
            ctx.is_predicate_source(&rule_ref.target)
        }
        _ => false,
    };

    let captured = ctx.capturing && (pluck || label.is_some() || predicate_source);
    if !captured {
        let matcher = annotated.to_ir(ctx, env, out)?;
        return Ok(Lowered::uncaptured(matcher, pluck));
    }

    let var = names::capture_var(ctx.alternative, ctx.position);
    let mut rule = None;

    let (matcher, ty, source) = match annotated {
        cst::Annotated { expr: cst::Expr::RuleRef(rule_ref), qty: cst::Quantifier::One } => {
            let call = rule_call(rule_ref, ctx, env, out);
            let ty = call.result_type.clone();
            rule = Some(rule_ref.target.clone());
            (ir::Matcher::Call(call), ty, ir::CaptureSource::Value)
        }
        cst::Annotated { expr: cst::Expr::Group(choice), qty: cst::Quantifier::One } => {
            let mut path = ctx.path.clone();
            path.push((ctx.alternative, ctx.position));
            let group = group_to_ir(choice, ctx, env, out, Some(names::group_var(&path)))?;
            (ir::Matcher::Choice(group), ir::ValueType::Text, ir::CaptureSource::Value)
        }
        annotated => {
            let matcher = annotated.to_ir(ctx, env, out)?;
            (matcher, ir::ValueType::Text, ir::CaptureSource::Text)
        }
    };

    Ok(Lowered {
        element: ir::Element { matcher, capture: Some(ir::Capture { var, ty, source }) },
        label: label.clone(),
        rule,
        pluck,
    })
}

/// Labels become parameter names of the action and predicate functions.
fn check_label(label: &str, ctx: &GenCtx, kind: NodeKind) -> BackendResult {
    if !names::is_valid_identifier(label) {
        return Err(ctx.malformed(kind, format!("`{label}` is not a valid Fortran identifier")));
    }
    if label.eq_ignore_ascii_case(RESULT_VAR) {
        return Err(ctx.malformed(kind, format!("`{label}` is reserved for action results")));
    }
    if ctx.lookup_label(label).is_some() {
        return Err(ctx.malformed(
            kind,
            format!("`{label}` is bound more than once in the same alternative"),
        ));
    }
    Ok(())
}

fn assertion_to_ir(
    assertion: &cst::Assertion,
    negate: bool,
    ctx: &GenCtx,
    env: &Env,
    out: &mut Emitted,
) -> BackendResult<ir::Matcher> {
    let body = match &assertion.target {
        cst::AssertionTarget::Predicate(predicate) => {
            ir::LookaheadBody::Predicate(predicate.to_ir(ctx, env, out)?)
        }
        cst::AssertionTarget::Element(annotated) => {
            ir::LookaheadBody::Matcher(Box::new(annotated.to_ir(&ctx.lookahead(), env, out)?))
        }
    };
    Ok(ir::Matcher::Lookahead(ir::Lookahead { negate, body }))
}

/// Lower a parenthesized choice; `result` names the variable receiving its value, if any.
fn group_to_ir(
    choice: &cst::Choice,
    ctx: &GenCtx,
    env: &Env,
    out: &mut Emitted,
    result: Option<String>,
) -> BackendResult<ir::Choice> {
    let ctx = ctx.group();
    let alternatives = choice.to_ir(&ctx, env, out)?;

    if result.is_some() {
        if let Some(alt) = alternatives.iter().find(|alt| !alt.result_type.is_text()) {
            return Err(ctx.malformed(
                NodeKind::Choice,
                format!("a captured group must produce text, found `{}`", alt.result_type),
            ));
        }
    }

    Ok(ir::Choice { alternatives, result })
}

/// Calls of undefined rules are recorded and translated as if the rule produced text.
fn rule_call(rule_ref: &cst::RuleRef, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> ir::RuleCall {
    let cst::RuleRef { target } = rule_ref;

    match env.rule(target) {
        Some(info) => ir::RuleCall {
            rule: target.clone(),
            function: info.function.clone(),
            result_type: info.result_type.clone(),
        },
        None => {
            log::trace!("Unresolved reference to `{target}` in `{}`", ctx.rule);
            out.unresolved.push(UnresolvedRuleReference {
                rule: ctx.rule.clone(),
                alternative: ctx.rule_alternative,
                target: target.clone(),
            });
            ir::RuleCall {
                rule: target.clone(),
                function: String::new(),
                result_type: ir::ValueType::Text,
            }
        }
    }
}

impl ToIR for cst::Annotated {
    type Target = ir::Matcher;

    fn to_ir(&self, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> BackendResult<Self::Target> {
        use ir::Bound::Count;

        let cst::Annotated { expr, qty } = self;

        let body = expr.to_ir(ctx, env, out)?;

        let (min, max, separator) = match qty {
            cst::Quantifier::One => return Ok(body),
            cst::Quantifier::Optional => (Count(0), Some(Count(1)), None),
            cst::Quantifier::ZeroOrMore => (Count(0), None, None),
            cst::Quantifier::OneOrMore => (Count(1), None, None),
            cst::Quantifier::Exact(0) | cst::Quantifier::Separated { count: 0, .. } => {
                return Err(ctx.malformed(NodeKind::Annotated, "a repetition count must be positive"));
            }
            cst::Quantifier::Exact(n) => (Count(*n), Some(Count(*n)), None),
            cst::Quantifier::Range { min: None, max: None } => {
                return Err(ctx.malformed(NodeKind::Annotated, "a range needs at least one bound"));
            }
            cst::Quantifier::Range { max: Some(0), .. } => {
                return Err(ctx.malformed(
                    NodeKind::Annotated,
                    "the upper bound of a range must be positive",
                ));
            }
            cst::Quantifier::Range { min: Some(min), max: Some(max) } if min > max => {
                return Err(ctx.malformed(
                    NodeKind::Annotated,
                    format!("the range {min}..{max} is empty"),
                ));
            }
            cst::Quantifier::Range { min, max } => (Count(min.unwrap_or(0)), max.map(Count), None),
            cst::Quantifier::Separated { count, separator } => {
                let separator = separator.to_ir(&ctx.in_separator(), env, out)?;
                (Count(*count), Some(Count(*count)), Some(Box::new(separator)))
            }
            cst::Quantifier::Dynamic { min, max } => {
                let min = dynamic_bound(min.as_deref(), ctx)?.unwrap_or(Count(0));
                let max = dynamic_bound(max.as_deref(), ctx)?;
                (min, max, None)
            }
        };

        log::trace!("Repetition {min}..{max:?} in `{}`", ctx.rule);

        Ok(ir::Matcher::Repeat(ir::Repeat { body: Box::new(body), min, max, separator }))
    }
}

fn dynamic_bound(expr: Option<&str>, ctx: &GenCtx) -> BackendResult<Option<ir::Bound>> {
    match expr.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ctx.malformed(NodeKind::Annotated, "a repetition bound expression is empty")),
        Some(expr) => Ok(Some(ir::Bound::Expr(expr.to_owned()))),
    }
}

impl ToIR for cst::Expr {
    type Target = ir::Matcher;

    fn to_ir(&self, ctx: &GenCtx, env: &Env, out: &mut Emitted) -> BackendResult<Self::Target> {
        let matcher = match self {
            cst::Expr::Literal(cst::Literal { value }) => {
                ir::Matcher::Terminal(ir::Terminal::Literal(value.clone()))
            }
            cst::Expr::Class(class) => ir::Matcher::Terminal(class.to_ir(ctx, env, out)?),
            cst::Expr::RuleRef(rule_ref) => ir::Matcher::Call(rule_call(rule_ref, ctx, env, out)),
            cst::Expr::Any => ir::Matcher::Terminal(ir::Terminal::Any),
            cst::Expr::End => ir::Matcher::Terminal(ir::Terminal::End),
            cst::Expr::Group(choice) => ir::Matcher::Choice(group_to_ir(choice, ctx, env, out, None)?),
        };
        Ok(matcher)
    }
}

impl ToIR for cst::CharClass {
    type Target = ir::Terminal;

    /// Adjacent characters are tested together; ranges keep their position in the class.
    fn to_ir(&self, ctx: &GenCtx, _env: &Env, _out: &mut Emitted) -> BackendResult<Self::Target> {
        let cst::CharClass { items } = self;

        if items.is_empty() {
            return Err(ctx.malformed(NodeKind::CharClass, "a character class must not be empty"));
        }

        let mut tests: Vec<ir::ClassTest> = Vec::new();
        for item in items {
            match item {
                cst::ClassItem::Char(c) => {
                    if !c.is_ascii() {
                        return Err(ctx.malformed(
                            NodeKind::CharClass,
                            format!("`{c}` is not an ASCII character"),
                        ));
                    }
                    match tests.last_mut() {
                        Some(ir::ClassTest::Set(chars)) => chars.push(*c),
                        _ => tests.push(ir::ClassTest::Set(c.to_string())),
                    }
                }
                cst::ClassItem::Range(cst::Range { bottom, top }) => {
                    if !bottom.is_ascii() || !top.is_ascii() {
                        return Err(ctx.malformed(
                            NodeKind::Range,
                            format!("`{bottom}-{top}` is not an ASCII range"),
                        ));
                    }
                    if bottom > top {
                        return Err(ctx.malformed(
                            NodeKind::Range,
                            format!("the range `{bottom}-{top}` is empty"),
                        ));
                    }
                    tests.push(ir::ClassTest::Range(*bottom, *top));
                }
            }
        }

        Ok(ir::Terminal::Class(tests))
    }
}

impl ToIR for cst::Predicate {
    type Target = ir::ActionCall;

    /// Extract the predicate into its own function.
    ///
    /// A parameter source names a label or, failing that, a rule whose value was captured
    /// earlier in the same sequence.
    fn to_ir(&self, ctx: &GenCtx, _env: &Env, out: &mut Emitted) -> BackendResult<Self::Target> {
        let cst::Predicate { params, return_type, code } = self;

        if ctx.separator {
            return Err(ctx.malformed(
                NodeKind::Predicate,
                "predicates are not supported in repetition separators",
            ));
        }

        let return_type = return_type.trim();
        if !return_type.is_empty() && !return_type.eq_ignore_ascii_case("logical") {
            return Err(ctx.malformed(
                NodeKind::Predicate,
                format!("a predicate must return `logical`, not `{return_type}`"),
            ));
        }

        let mut fn_params: Vec<ir::Param> = Vec::with_capacity(params.len());
        let mut args = Vec::with_capacity(params.len());
        for cst::PredicateParam { name, source } in params {
            if !names::is_valid_identifier(name) || name.eq_ignore_ascii_case(RESULT_VAR) {
                return Err(ctx.malformed(
                    NodeKind::Predicate,
                    format!("`{name}` cannot be used as a parameter name"),
                ));
            }
            if fn_params.iter().any(|param| param.name.eq_ignore_ascii_case(name)) {
                return Err(ctx.malformed(
                    NodeKind::Predicate,
                    format!("the parameter `{name}` is declared more than once"),
                ));
            }
            let Some(binding) = ctx.lookup_label(source).or_else(|| ctx.lookup_rule_value(source))
            else {
                return Err(ctx.malformed(
                    NodeKind::Predicate,
                    format!(
                        "`{source}` is neither a label nor a rule referenced earlier in the same alternative"
                    ),
                ));
            };
            fn_params.push(ir::Param { name: name.clone(), ty: binding.ty.clone() });
            args.push(binding.var.clone());
        }

        let function = names::predicate_id(&ctx.base, out.next_predicate(&ctx.rule));

        out.actions.push(ir::ActionFn {
            kind: ir::ActionKind::Predicate,
            name: function.clone(),
            params: fn_params,
            result_type: ir::ValueType::declared("logical"),
            code: code.clone(),
        });

        Ok(ir::ActionCall { function, args })
    }
}
