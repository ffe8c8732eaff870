use crate::fortran::{Body, Decl, Expr, Function, Stmt};
use crate::ir;
use crate::ir::names::RESULT_VAR;
use crate::result::BackendResult;

use super::matchers::lower_choice;
use super::scope::Scope;
use super::{ACCEPT_EOF, CURSOR};

const ACCEPT: &str = "accept";

/// ```text
/// recursive function peg_rule(res) result(accept)
///     <type>, intent(out) :: res
///     logical :: accept
///     accept = .false.
///     <choice, return on failure>
///     accept = .true.
/// end function peg_rule
/// ```
pub fn rule_to_fortran(rule: &ir::RuleFn) -> BackendResult<Function> {
    let ir::RuleFn { id, name, start, result_type, body } = rule;

    log::debug!("Lowering rule `{id}` to `{name}`");

    let mut scope = Scope::default();
    let (choice, entry) = lower_choice(body, &[Stmt::Return], &mut scope)?;

    let mut stmts = vec![Stmt::assign(ACCEPT, Expr::Logical(false))];
    stmts.extend(choice);
    if *start {
        let at_end = Expr::call(ACCEPT_EOF, vec![]).not();
        stmts.push(Stmt::when(at_end, vec![Stmt::assign(CURSOR, Expr::var(&entry)), Stmt::Return]));
    }
    stmts.push(Stmt::assign(ACCEPT, Expr::Logical(true)));

    let mut decls = vec![
        Decl::new(result_type.type_spec(), vec![RESULT_VAR.to_owned()]).with_attr("intent(out)"),
        Decl::new("logical", vec![ACCEPT.to_owned()]),
    ];
    decls.extend(scope.decls());

    Ok(Function {
        recursive: true,
        name: name.clone(),
        args: vec![RESULT_VAR.to_owned()],
        result: ACCEPT.to_owned(),
        decls,
        body: Body::Stmts(stmts),
    })
}

/// Wrap the opaque code of an action or predicate into a function of its captured values.
pub fn action_to_fortran(action: &ir::ActionFn) -> Function {
    let ir::ActionFn { kind: _, name, params, result_type, code } = action;

    let mut decls: Vec<Decl> = params
        .iter()
        .map(|ir::Param { name, ty }| {
            let ty = match ty {
                ir::ValueType::Text => "character(len=*)",
                ir::ValueType::Declared(ty) => ty.as_str(),
            };
            Decl::new(ty, vec![name.clone()]).with_attr("intent(in)")
        })
        .collect();
    decls.push(Decl::new(result_type.type_spec(), vec![RESULT_VAR.to_owned()]));

    Function {
        recursive: false,
        name: name.clone(),
        args: params.iter().map(|param| param.name.clone()).collect(),
        result: RESULT_VAR.to_owned(),
        decls,
        body: Body::Verbatim(code.clone()),
    }
}
