//! Backtracking structure of the lowered Fortran statements.
//!
//! The generated functions are walked as syntax trees: every `exit` and `cycle` must name an
//! enclosing construct, every choice loop must reset the cursor before trying an alternative,
//! every lookahead must give back the input it looked at and every `return` from a failing rule
//! must happen with the cursor restored.

use fortpeg_backend::fortran::{Assign, Block, Body, Do, Function, If, SelectCase, Stmt};
use fortpeg_backend::{CodegenCfg, grammar_to_ir, ir_to_fortran};
use fortpeg_cst::*;

fn lit(value: &str) -> Element {
    Element::expr(Expr::literal(value))
}

fn group(alternatives: Vec<Sequence>) -> Expr {
    Expr::Group(Choice::new(alternatives))
}

fn letters() -> Expr {
    Expr::class(vec![ClassItem::range('a', 'z'), ClassItem::Char('_')])
}

fn lower(grammar: &Grammar, action_types: &ActionTypes) -> Vec<Function> {
    let parser = match grammar_to_ir(grammar, action_types) {
        Ok(parser) => parser,
        Err(err) => panic!("Failed to lower the grammar: {err}"),
    };
    match ir_to_fortran(&parser, &CodegenCfg::default()) {
        Ok(module) => module.functions,
        Err(err) => panic!("Failed to lower the parser: {err}"),
    }
}

fn is_cursor_reset(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Assign(Assign { lhs, .. }) if lhs == "cursor")
}

/// The constructs enclosing the statement being checked.
struct Walker<'a> {
    function: &'a str,
    /// Labels of the open constructs, with whether they are loops
    open: Vec<(&'a str, bool)>,
    /// Every construct label of the function
    seen: Vec<&'a str>,
}

impl<'a> Walker<'a> {
    fn enter(&mut self, label: &'a str, is_loop: bool) {
        assert!(!self.seen.contains(&label), "Label `{label}` is used twice in {}", self.function);
        self.seen.push(label);
        self.open.push((label, is_loop));
    }

    /// `restored` tells whether the cursor was reset right before the first statement.
    fn check(&mut self, stmts: &'a [Stmt], restored: bool) {
        for (idx, stmt) in stmts.iter().enumerate() {
            let restored = if idx == 0 { restored } else { is_cursor_reset(&stmts[idx - 1]) };

            match stmt {
                Stmt::Assign(_) => {}
                Stmt::Return => {
                    assert!(restored, "`return` without restoring the cursor in {}", self.function)
                }
                Stmt::Exit(label) => {
                    let Some(label) = label.as_deref() else {
                        panic!("Unlabeled `exit` in {}", self.function)
                    };
                    assert!(
                        self.open.iter().any(|(open, _)| *open == label),
                        "`exit {label}` outside of `{label}` in {}",
                        self.function
                    );
                }
                Stmt::Cycle(label) => {
                    let Some(label) = label.as_deref() else {
                        panic!("Unlabeled `cycle` in {}", self.function)
                    };
                    assert!(
                        self.open.iter().any(|(open, is_loop)| *open == label && *is_loop),
                        "`cycle {label}` outside of the loop `{label}` in {}",
                        self.function
                    );
                }
                Stmt::If(If { then, else_ifs, otherwise, .. }) => {
                    self.check(then, false);
                    for (_, body) in else_ifs {
                        self.check(body, false);
                    }
                    if let Some(otherwise) = otherwise {
                        self.check(otherwise, false);
                    }
                }
                Stmt::Do(Do { label, range, body }) => {
                    let Some(label) = label.as_deref() else {
                        panic!("Unlabeled loop in {}", self.function)
                    };
                    if range.is_some() {
                        assert!(
                            body.first().is_some_and(is_cursor_reset),
                            "The alternatives of `{label}` start at different positions in {}",
                            self.function
                        );
                    }
                    self.enter(label, true);
                    self.check(body, false);
                    self.open.pop();
                }
                Stmt::SelectCase(SelectCase { cases, default, .. }) => {
                    for (_, body) in cases {
                        self.check(body, false);
                    }
                    if let Some(default) = default {
                        self.check(default, restored);
                    }
                }
                Stmt::Block(Block { label: None, body, .. }) => self.check(body, restored),
                Stmt::Block(Block { label: Some(label), body, .. }) => {
                    assert!(
                        stmts.get(idx + 1).is_some_and(is_cursor_reset),
                        "The lookahead `{label}` keeps the input it matched in {}",
                        self.function
                    );
                    self.enter(label, false);
                    self.check(body, false);
                    self.open.pop();
                }
            }
        }
    }
}

#[track_caller]
fn assert_backtracking(functions: &[Function]) {
    let mut rules = 0;
    for function in functions {
        let Body::Stmts(stmts) = &function.body else {
            continue;
        };
        rules += 1;
        let mut walker = Walker { function: &function.name, open: vec![], seen: vec![] };
        walker.check(stmts, false);
        assert!(walker.open.is_empty());
    }
    assert!(rules > 0, "No rule functions were generated");
}

#[test]
fn choices_and_groups() {
    let grammar = Grammar::new(vec![
        Rule::start(
            "stmt",
            Choice::new(vec![
                Sequence::new(vec![
                    Element::labeled("name", Annotated::new(Expr::rule_ref("ident"))),
                    lit("="),
                    Element::pluck(None, Annotated::new(group(vec![
                        Sequence::new(vec![Element::expr(Expr::rule_ref("ident"))]),
                        Sequence::new(vec![lit("("), Element::expr(Expr::rule_ref("ident")), lit(")")]),
                    ]))),
                ]),
                Sequence::new(vec![lit("print"), Element::expr(Expr::rule_ref("ident"))]),
                Sequence::new(vec![Element::expr(Expr::End)]),
            ]),
        ),
        Rule::new(
            "ident",
            Choice::single(Sequence::new(vec![Element::quantified(letters(), Quantifier::OneOrMore)])),
        ),
    ]);
    assert_backtracking(&lower(&grammar, &ActionTypes::new()));
}

#[test]
fn repetitions() {
    let grammar = Grammar::new(vec![Rule::start(
        "list",
        Choice::new(vec![
            Sequence::new(vec![
                lit("["),
                Element::quantified(
                    group(vec![Sequence::new(vec![lit("a")]), Sequence::new(vec![lit("b")])]),
                    Quantifier::Separated { count: 2, separator: Box::new(Expr::literal(",")) },
                ),
                Element::quantified(Expr::literal(" "), Quantifier::ZeroOrMore),
                lit("]"),
            ]),
            Sequence::new(vec![
                Element::labeled("word", Annotated::with(letters(), Quantifier::Range { min: Some(2), max: Some(4) })),
                Element::quantified(Expr::Any, Quantifier::Exact(3)),
                Element::quantified(Expr::literal("!"), Quantifier::Optional),
            ]),
            Sequence::new(vec![Element::quantified(
                Expr::literal("x"),
                Quantifier::Dynamic { min: Some("n".to_owned()), max: None },
            )]),
        ]),
    )]);
    assert_backtracking(&lower(&grammar, &ActionTypes::new()));
}

#[test]
fn lookaheads_predicates_and_actions() {
    let predicate = Predicate {
        params: vec![PredicateParam { name: "n".to_owned(), source: "num".to_owned() }],
        return_type: "logical".to_owned(),
        code: "res = n > 0".to_owned(),
    };
    let grammar = Grammar::new(vec![
        Rule::start(
            "expr",
            Choice::new(vec![
                Sequence::new(vec![
                    Element::assert_not(AssertionTarget::Element(Annotated::new(group(vec![
                        Sequence::new(vec![lit("-")]),
                        Sequence::new(vec![lit("+")]),
                    ])))),
                    Element::labeled("lhs", Annotated::new(Expr::rule_ref("num"))),
                    lit("+"),
                    Element::labeled("rhs", Annotated::new(Expr::rule_ref("expr"))),
                ])
                .with_action("res = lhs + rhs"),
                Sequence::new(vec![
                    Element::expr(Expr::rule_ref("num")),
                    Element::assert(AssertionTarget::Predicate(predicate)),
                    Element::assert(AssertionTarget::Element(Annotated::new(Expr::End))),
                ])
                .with_action("res = 0"),
            ]),
        ),
        Rule::new(
            "num",
            Choice::single(
                Sequence::new(vec![Element::quantified(
                    Expr::class(vec![ClassItem::range('0', '9')]),
                    Quantifier::OneOrMore,
                )])
                .with_action("read (res_text, *) res"),
            ),
        ),
    ]);
    let types = ActionTypes::new().with("expr", 0, "integer").with("expr", 1, "integer").with("num", 0, "integer");
    assert_backtracking(&lower(&grammar, &types));
}
