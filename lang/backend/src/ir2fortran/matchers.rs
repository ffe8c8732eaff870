use crate::fortran::{BinOp, Block, Do, DoRange, Expr, If, SelectCase, Stmt};
use crate::ir;
use crate::ir::names::RESULT_VAR;
use crate::result::{BackendError, BackendResult};

use super::scope::{Scope, value_decl};
use super::{ACCEPT_EOF, ACCEPT_PERIOD, ACCEPT_RANGE, ACCEPT_SET, ACCEPT_STRING, CURSOR, INPUT};

/// Lower a matcher to statements which leave the cursor behind the match on success and run
/// `fail` otherwise.
///
/// `fail` must leave the current construct, so it only consists of assignments followed by a
/// labeled `exit` or `cycle`, or a `return`.
pub trait ToFortran {
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>>;
}

fn cursor() -> Expr {
    Expr::var(CURSOR)
}

/// `if (.not. cond) fail`
fn fail_unless(cond: Expr, fail: &[Stmt]) -> Stmt {
    Stmt::when(cond.not(), fail.to_vec())
}

/// `input(from:cursor - 1)`
fn consumed_since(from: &str) -> Expr {
    Expr::Substring {
        var: INPUT.to_owned(),
        lo: Box::new(Expr::var(from)),
        hi: Box::new(Expr::bin(BinOp::Sub, cursor(), Expr::Int(1))),
    }
}

fn prepend(stmts: Vec<Stmt>, fail: &[Stmt]) -> Vec<Stmt> {
    stmts.into_iter().chain(fail.iter().cloned()).collect()
}

impl ToFortran for ir::Matcher {
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        match self {
            ir::Matcher::Terminal(terminal) => terminal.to_fortran(fail, scope),
            ir::Matcher::Call(call) => {
                let var = scope.scratch(&call.result_type);
                Ok(vec![call_rule(call, &var, fail)?])
            }
            ir::Matcher::Choice(choice) => choice.to_fortran(fail, scope),
            ir::Matcher::Repeat(repeat) => repeat.to_fortran(fail, scope),
            ir::Matcher::Lookahead(lookahead) => lookahead.to_fortran(fail, scope),
        }
    }
}

fn call_rule(call: &ir::RuleCall, into: &str, fail: &[Stmt]) -> BackendResult<Stmt> {
    let ir::RuleCall { rule, function, .. } = call;
    if function.is_empty() {
        return Err(BackendError::CodegenError(format!("Call of the unresolved rule `{rule}`")));
    }
    Ok(fail_unless(Expr::call(function, vec![Expr::var(into)]), fail))
}

fn action_call(call: &ir::ActionCall) -> Expr {
    let ir::ActionCall { function, args } = call;
    Expr::call(function, args.iter().map(|arg| Expr::var(arg)).collect())
}

impl ToFortran for ir::Terminal {
    fn to_fortran(&self, fail: &[Stmt], _scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        let stmt = match self {
            ir::Terminal::Literal(value) => {
                fail_unless(Expr::call(ACCEPT_STRING, vec![Expr::Str(value.clone())]), fail)
            }
            ir::Terminal::Class(tests) => {
                let mut conds = tests.iter().map(class_test);
                let Some(first) = conds.next() else {
                    return Err(BackendError::CodegenError("Empty character class".to_owned()));
                };
                let else_ifs: Vec<_> = conds.map(|cond| (cond, vec![])).collect();
                if else_ifs.is_empty() {
                    fail_unless(first, fail)
                } else {
                    // the tests consume input, so at most one of them may run successfully
                    Stmt::If(If { cond: first, then: vec![], else_ifs, otherwise: Some(fail.to_vec()) })
                }
            }
            ir::Terminal::Any => fail_unless(Expr::call(ACCEPT_PERIOD, vec![]), fail),
            ir::Terminal::End => fail_unless(Expr::call(ACCEPT_EOF, vec![]), fail),
        };
        Ok(vec![stmt])
    }
}

fn class_test(test: &ir::ClassTest) -> Expr {
    match test {
        ir::ClassTest::Set(chars) => {
            let chars = chars.chars().map(|c| Expr::Str(c.to_string())).collect();
            Expr::call(ACCEPT_SET, vec![Expr::Array(chars)])
        }
        ir::ClassTest::Range(bottom, top) => Expr::call(
            ACCEPT_RANGE,
            vec![Expr::Str(bottom.to_string()), Expr::Str(top.to_string())],
        ),
    }
}

impl ToFortran for ir::Choice {
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        let (stmts, _save) = lower_choice(self, fail, scope)?;
        Ok(stmts)
    }
}

/// Lower an ordered choice; also returns the variable holding the cursor on entry.
///
/// ```text
/// save_k = cursor
/// alt_k: do i_k = 0, n
///     cursor = save_k
///     select case (i_k)
///     case (0)
///         <alternative 0, cycle alt_k on failure>
///         exit alt_k
///     ...
///     case default
///         <fail>
///     end select
/// end do alt_k
/// ```
pub fn lower_choice(
    choice: &ir::Choice,
    fail: &[Stmt],
    scope: &mut Scope,
) -> BackendResult<(Vec<Stmt>, String)> {
    let ir::Choice { alternatives, result } = choice;

    let k = scope.fresh();
    let save = scope.integer("save", k);
    if let Some(result) = result {
        if result != RESULT_VAR {
            scope.declare(result, &ir::ValueType::Text);
        }
    }

    let mut stmts = vec![Stmt::assign(&save, cursor())];

    // a single alternative needs no dispatch
    if let [alt] = alternatives.as_slice() {
        let fail = prepend(vec![Stmt::assign(CURSOR, Expr::var(&save))], fail);
        stmts.extend(lower_sequence(alt, &save, result.as_deref(), &fail, scope)?);
        return Ok((stmts, save));
    }

    let label = format!("alt_{k}");
    let idx = scope.integer("i", k);
    let next = [Stmt::cycle(&label)];

    let cases = alternatives
        .iter()
        .enumerate()
        .map(|(n, alt)| {
            let mut body = lower_sequence(alt, &save, result.as_deref(), &next, scope)?;
            body.push(Stmt::exit(&label));
            Ok((n as u32, body))
        })
        .collect::<BackendResult<Vec<_>>>()?;

    let select = Stmt::SelectCase(SelectCase {
        selector: Expr::var(&idx),
        cases,
        default: Some(fail.to_vec()),
    });

    stmts.push(Stmt::Do(Do {
        label: Some(label),
        range: Some(DoRange {
            var: idx,
            from: Expr::Int(0),
            to: Expr::Int(alternatives.len() as u32),
        }),
        body: vec![Stmt::assign(CURSOR, Expr::var(&save)), select],
    }));

    Ok((stmts, save))
}

/// Lower the elements of an alternative, followed by the assignment of its value to `result`.
///
/// Capture variables are local to a `block` wrapping the alternative.
fn lower_sequence(
    seq: &ir::Sequence,
    save: &str,
    result: Option<&str>,
    fail: &[Stmt],
    scope: &mut Scope,
) -> BackendResult<Vec<Stmt>> {
    let mut body = Vec::new();
    for element in &seq.elements {
        body.extend(element.to_fortran(fail, scope)?);
    }

    if let Some(result) = result {
        let value = match &seq.result {
            ir::AltResult::Consumed => consumed_since(save),
            ir::AltResult::Capture(var) => Expr::var(var),
            ir::AltResult::Concat(vars) => concat(vars),
            ir::AltResult::Action(call) => action_call(call),
        };
        body.push(Stmt::assign(result, value));
    }

    let decls: Vec<_> = seq.captures().map(|capture| value_decl(&capture.ty, &capture.var)).collect();
    if decls.is_empty() {
        Ok(body)
    } else {
        Ok(vec![Stmt::Block(Block { label: None, decls, body })])
    }
}

fn concat(vars: &[String]) -> Expr {
    let mut vars = vars.iter().map(|var| Expr::var(var));
    let first = vars.next().unwrap_or_else(|| Expr::Str(String::new()));
    vars.fold(first, |lhs, rhs| Expr::bin(BinOp::Concat, lhs, rhs))
}

impl ToFortran for ir::Element {
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        let ir::Element { matcher, capture } = self;

        let Some(ir::Capture { var, source, .. }) = capture else {
            return matcher.to_fortran(fail, scope);
        };

        match (source, matcher) {
            (ir::CaptureSource::Value, ir::Matcher::Call(call)) => Ok(vec![call_rule(call, var, fail)?]),
            (ir::CaptureSource::Value, ir::Matcher::Choice(choice)) if choice.result.is_some() => {
                let mut stmts = choice.to_fortran(fail, scope)?;
                if let Some(group) = &choice.result {
                    stmts.push(Stmt::assign(var, Expr::var(group)));
                }
                Ok(stmts)
            }
            _ => {
                let k = scope.fresh();
                let mark = scope.integer("mark", k);
                let mut stmts = vec![Stmt::assign(&mark, cursor())];
                stmts.extend(matcher.to_fortran(fail, scope)?);
                stmts.push(Stmt::assign(var, consumed_since(&mark)));
                Ok(stmts)
            }
        }
    }
}

fn bound(bound: &ir::Bound, var: &str) -> Expr {
    match bound {
        ir::Bound::Count(n) => Expr::Int(*n),
        ir::Bound::Expr(_) => Expr::var(var),
    }
}

impl ToFortran for ir::Repeat {
    /// ```text
    /// save_k = cursor
    /// count_k = 0
    /// rep_k: do
    ///     if (count_k >= max) exit rep_k
    ///     mark_k = cursor
    ///     <separator and body, restoring mark_k and leaving the loop on failure>
    ///     count_k = count_k + 1
    ///     if (cursor == mark_k) exit rep_k
    /// end do rep_k
    /// if (count_k < min) then
    ///     cursor = save_k
    ///     <fail>
    /// end if
    /// ```
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        let ir::Repeat { body, min, max, separator } = self;

        let k = scope.fresh();
        let label = format!("rep_{k}");
        let count = scope.integer("count", k);
        let mut stmts = Vec::new();

        // dynamic bounds are evaluated once, before the first repetition
        let lo = match min {
            ir::Bound::Expr(expr) => {
                let lo = scope.integer("lo", k);
                stmts.push(Stmt::assign(&lo, Expr::Verbatim(expr.clone())));
                lo
            }
            ir::Bound::Count(_) => String::new(),
        };
        let hi = match max {
            Some(ir::Bound::Expr(expr)) => {
                let hi = scope.integer("hi", k);
                stmts.push(Stmt::assign(&hi, Expr::Verbatim(expr.clone())));
                hi
            }
            _ => String::new(),
        };

        let save = if self.has_min() {
            let save = scope.integer("save", k);
            stmts.push(Stmt::assign(&save, cursor()));
            Some(save)
        } else {
            None
        };
        stmts.push(Stmt::assign(&count, Expr::Int(0)));

        let mark = scope.integer("mark", k);
        let stop = [Stmt::assign(CURSOR, Expr::var(&mark)), Stmt::exit(&label)];

        let mut loop_body = Vec::new();
        if let Some(max) = max {
            let reached = Expr::bin(BinOp::Ge, Expr::var(&count), bound(max, &hi));
            loop_body.push(Stmt::when(reached, vec![Stmt::exit(&label)]));
        }
        loop_body.push(Stmt::assign(&mark, cursor()));
        if let Some(separator) = separator {
            let not_first = Expr::bin(BinOp::Gt, Expr::var(&count), Expr::Int(0));
            loop_body.push(Stmt::when(not_first, separator.to_fortran(&stop, scope)?));
        }
        loop_body.extend(body.to_fortran(&stop, scope)?);
        loop_body.push(Stmt::assign(
            &count,
            Expr::bin(BinOp::Add, Expr::var(&count), Expr::Int(1)),
        ));
        if max.is_none() {
            // an iteration without progress would repeat forever
            let no_progress = Expr::bin(BinOp::Eq, cursor(), Expr::var(&mark));
            loop_body.push(Stmt::when(no_progress, vec![Stmt::exit(&label)]));
        }

        stmts.push(Stmt::Do(Do { label: Some(label), range: None, body: loop_body }));

        if let Some(save) = save {
            let too_few = Expr::bin(BinOp::Lt, Expr::var(&count), bound(min, &lo));
            let restore = prepend(vec![Stmt::assign(CURSOR, Expr::var(&save))], fail);
            stmts.push(Stmt::when(too_few, restore));
        }

        Ok(stmts)
    }
}

impl ToFortran for ir::Lookahead {
    /// ```text
    /// save_k = cursor
    /// ok_k = .false.
    /// look_k: block
    ///     <body, exit look_k on failure>
    ///     ok_k = .true.
    /// end block look_k
    /// cursor = save_k
    /// if (.not. ok_k) <fail>
    /// ```
    fn to_fortran(&self, fail: &[Stmt], scope: &mut Scope) -> BackendResult<Vec<Stmt>> {
        let ir::Lookahead { negate, body } = self;

        let body = match body {
            ir::LookaheadBody::Matcher(matcher) => matcher,
            // predicates never consume input
            ir::LookaheadBody::Predicate(call) => {
                let cond = action_call(call);
                let stmt = if *negate { Stmt::when(cond, fail.to_vec()) } else { fail_unless(cond, fail) };
                return Ok(vec![stmt]);
            }
        };

        let k = scope.fresh();
        let label = format!("look_{k}");
        let save = scope.integer("save", k);
        let ok = scope.logical("ok", k);

        let mut block_body = body.to_fortran(&[Stmt::exit(&label)], scope)?;
        block_body.push(Stmt::assign(&ok, Expr::Logical(true)));

        let matched = Expr::var(&ok);
        let check = if *negate { Stmt::when(matched, fail.to_vec()) } else { fail_unless(matched, fail) };

        Ok(vec![
            Stmt::assign(&save, cursor()),
            Stmt::assign(&ok, Expr::Logical(false)),
            Stmt::Block(Block { label: Some(label), decls: vec![], body: block_body }),
            Stmt::assign(CURSOR, Expr::var(&save)),
            check,
        ])
    }
}
