//! Checks of the generated Fortran text.

use fortpeg_backend::{CodegenCfg, Translation, translate};
use fortpeg_cst::*;
use fortpeg_printer::Print;

fn run(grammar: &Grammar, action_types: &ActionTypes) -> Translation {
    match translate(grammar, action_types, &CodegenCfg::default()) {
        Ok(translation) => translation,
        Err(err) => panic!("Translation failed: {err}"),
    }
}

/// Assert that `expected` occur as lines of `source`, in this order, ignoring indentation.
#[track_caller]
fn assert_lines(source: &str, expected: &[&str]) {
    let mut lines = source.lines().map(str::trim);
    for line in expected {
        assert!(lines.any(|l| l == *line), "Missing line `{line}` in:\n{source}");
    }
}

fn lit(value: &str) -> Element {
    Element::expr(Expr::literal(value))
}

fn start(alternatives: Vec<Sequence>) -> Grammar {
    Grammar::new(vec![Rule::start("start", Choice::new(alternatives))])
}

#[test]
fn module_skeleton() {
    let source = run(&start(vec![Sequence::new(vec![lit("a")])]), &ActionTypes::new()).source;

    let lines: Vec<&str> = source.lines().collect();
    assert_eq!(&lines[..4], &["module parser", "    use peg_runtime", "    implicit none", "contains"]);
    assert_eq!(lines.last(), Some(&"end module parser"));
    assert!(source.ends_with('\n'));
    assert!(source.lines().all(|line| line == line.trim_end()), "Trailing whitespace in:\n{source}");
}

#[test]
fn configured_module_names() {
    let cfg = CodegenCfg {
        module_name: "calc_parser".to_owned(),
        runtime_module: "calc_runtime".to_owned(),
        ..CodegenCfg::default()
    };
    let grammar = start(vec![Sequence::new(vec![lit("a")])]);
    let source = match translate(&grammar, &ActionTypes::new(), &cfg) {
        Ok(translation) => translation.source,
        Err(err) => panic!("{err}"),
    };
    assert_lines(&source, &["module calc_parser", "use calc_runtime", "end module calc_parser"]);
}

#[test]
fn rule_function_with_ordered_choice() {
    let source = run(
        &start(vec![Sequence::new(vec![lit("a")]), Sequence::new(vec![lit("b")])]),
        &ActionTypes::new(),
    )
    .source;

    assert_lines(
        &source,
        &[
            "recursive function peg_start(res) result(accept)",
            "character(len=:), allocatable, intent(out) :: res",
            "logical :: accept",
            "integer :: save_1, i_1",
            "accept = .false.",
            "save_1 = cursor",
            "alt_1: do i_1 = 0, 2",
            "cursor = save_1",
            "select case (i_1)",
            "case (0)",
            "if (.not. acceptString('a')) cycle alt_1",
            "res = input(save_1:cursor - 1)",
            "exit alt_1",
            "case (1)",
            "if (.not. acceptString('b')) cycle alt_1",
            "case default",
            "return",
            "end select",
            "end do alt_1",
            "if (.not. acceptEOF()) then",
            "cursor = save_1",
            "return",
            "end if",
            "accept = .true.",
            "end function peg_start",
        ],
    );
}

#[test]
fn single_alternative_restores_cursor_on_failure() {
    let source = run(&start(vec![Sequence::new(vec![lit("a"), lit("b")])]), &ActionTypes::new()).source;

    assert!(!source.contains("select case"));
    assert_lines(
        &source,
        &[
            "save_1 = cursor",
            "if (.not. acceptString('a')) then",
            "cursor = save_1",
            "return",
            "end if",
            "if (.not. acceptString('b')) then",
        ],
    );
}

#[test]
fn quotes_are_doubled() {
    let source = run(&start(vec![Sequence::new(vec![lit("it's")])]), &ActionTypes::new()).source;
    assert!(source.contains("acceptString('it''s')"), "{source}");
}

#[test]
fn character_class_tests() {
    let class = Expr::class(vec![ClassItem::Char('a'), ClassItem::Char('b'), ClassItem::range('0', '9')]);
    let source = run(&start(vec![Sequence::new(vec![Element::expr(class)])]), &ActionTypes::new()).source;

    assert_lines(
        &source,
        &[
            "if (acceptSet(['a', 'b'])) then",
            "else if (acceptRange('0', '9')) then",
            "else",
            "cursor = save_1",
            "return",
            "end if",
        ],
    );
}

#[test]
fn repetition_loop() {
    let element = Element::quantified(Expr::literal("a"), Quantifier::Range { min: Some(2), max: Some(4) });
    let source = run(&start(vec![Sequence::new(vec![element])]), &ActionTypes::new()).source;

    assert_lines(
        &source,
        &[
            "save_2 = cursor",
            "count_2 = 0",
            "rep_2: do",
            "if (count_2 >= 4) exit rep_2",
            "mark_2 = cursor",
            "if (.not. acceptString('a')) then",
            "cursor = mark_2",
            "exit rep_2",
            "end if",
            "count_2 = count_2 + 1",
            "end do rep_2",
            "if (count_2 < 2) then",
            "cursor = save_2",
        ],
    );
    // bounded loops always terminate
    assert!(!source.contains("if (cursor == mark_2) exit rep_2"));
}

#[test]
fn unbounded_repetition_stops_without_progress() {
    let element = Element::quantified(Expr::literal("a"), Quantifier::ZeroOrMore);
    let source = run(&start(vec![Sequence::new(vec![element])]), &ActionTypes::new()).source;

    assert_lines(&source, &["rep_2: do", "if (cursor == mark_2) exit rep_2", "end do rep_2"]);
    assert!(!source.contains("save_2"));
}

#[test]
fn dynamic_bounds_are_evaluated_once() {
    let qty = Quantifier::Dynamic { min: Some("n".to_owned()), max: Some("2 * n".to_owned()) };
    let element = Element::quantified(Expr::Any, qty);
    let source = run(&start(vec![Sequence::new(vec![element])]), &ActionTypes::new()).source;

    assert_lines(
        &source,
        &["lo_2 = (n)", "hi_2 = (2 * n)", "rep_2: do", "if (count_2 >= hi_2) exit rep_2", "if (count_2 < lo_2) then"],
    );
}

#[test]
fn negative_lookahead() {
    let element = Element::assert_not(AssertionTarget::Element(Annotated::new(Expr::literal("x"))));
    let source = run(&start(vec![Sequence::new(vec![element, Element::expr(Expr::Any)])]), &ActionTypes::new()).source;

    assert_lines(
        &source,
        &[
            "save_2 = cursor",
            "ok_2 = .false.",
            "look_2: block",
            "if (.not. acceptString('x')) exit look_2",
            "ok_2 = .true.",
            "end block look_2",
            "cursor = save_2",
            "if (ok_2) then",
            "if (.not. acceptPeriod()) then",
        ],
    );
}

#[test]
fn actions_become_functions() {
    let digits = Annotated::with(Expr::class(vec![ClassItem::range('0', '9')]), Quantifier::OneOrMore);
    let grammar = start(vec![Sequence::new(vec![Element::labeled("n", digits)]).with_action("read(n, *) res")]);
    let translation = run(&grammar, &ActionTypes::new().with("start", 0, "integer"));

    assert_eq!(translation.actions.len(), 1);
    assert_eq!(translation.actions[0].name, "action_start_0");
    assert_lines(
        &translation.source,
        &[
            "recursive function peg_start(res) result(accept)",
            "integer, intent(out) :: res",
            "block",
            "character(len=:), allocatable :: capture_0_0",
            "capture_0_0 = input(mark_2:cursor - 1)",
            "res = action_start_0(capture_0_0)",
            "end block",
            "end function peg_start",
            "function action_start_0(n) result(res)",
            "character(len=*), intent(in) :: n",
            "integer :: res",
            "read(n, *) res",
            "end function action_start_0",
        ],
    );
}

#[test]
fn rule_values_are_passed_to_actions() {
    let grammar = Grammar::new(vec![
        Rule::start(
            "sum",
            Choice::single(
                Sequence::new(vec![
                    Element::labeled("a", Annotated::new(Expr::rule_ref("num"))),
                    lit("+"),
                    Element::labeled("b", Annotated::new(Expr::rule_ref("num"))),
                ])
                .with_action("res = a + b"),
            ),
        ),
        Rule::new(
            "num",
            Choice::single(Sequence::new(vec![Element::expr(Expr::literal("1"))]).with_action("res = 1")),
        ),
    ]);
    let types = ActionTypes::new().with("sum", 0, "integer").with("num", 0, "integer");
    let source = run(&grammar, &types).source;

    assert_lines(
        &source,
        &[
            "integer :: capture_0_0",
            "integer :: capture_0_2",
            "if (.not. peg_num(capture_0_0)) then",
            "if (.not. peg_num(capture_0_2)) then",
            "res = action_sum_0(capture_0_0, capture_0_2)",
            "function action_sum_0(a, b) result(res)",
            "integer, intent(in) :: a",
            "integer, intent(in) :: b",
            "res = a + b",
        ],
    );
}

#[test]
fn predicates_become_logical_functions() {
    let predicate = Predicate {
        params: vec![PredicateParam { name: "word".to_owned(), source: "w".to_owned() }],
        return_type: String::new(),
        code: "res = len(word) > 2".to_owned(),
    };
    let grammar = start(vec![Sequence::new(vec![
        Element::labeled("w", Annotated::with(Expr::class(vec![ClassItem::range('a', 'z')]), Quantifier::OneOrMore)),
        Element::assert(AssertionTarget::Predicate(predicate)),
    ])]);
    let translation = run(&grammar, &ActionTypes::new());

    assert_eq!(translation.actions.len(), 1);
    let name = translation.actions[0].name.clone();
    assert!(name.starts_with("pred_start"), "{name}");
    assert_lines(
        &translation.source,
        &[
            &format!("if (.not. {name}(capture_0_0)) then"),
            &format!("function {name}(word) result(res)"),
            "character(len=*), intent(in) :: word",
            "logical :: res",
            "res = len(word) > 2",
        ],
    );
}

#[test]
fn prologue_and_epilogue_are_verbatim() {
    let mut grammar = start(vec![Sequence::new(vec![lit("a")])]);
    grammar.prologue = Some("! generated\n".to_owned());
    grammar.epilogue = Some("    function helper() result(res)\n        integer :: res\n        res = 0\n    end function helper\n".to_owned());
    let source = run(&grammar, &ActionTypes::new()).source;

    let lines: Vec<&str> = source.lines().collect();
    assert_eq!(lines[0], "! generated");
    assert_lines(&source, &["module parser", "end function peg_start", "function helper() result(res)", "end module parser"]);
    assert!(source.contains("\nfunction helper() result(res)\n    integer :: res\n"), "{source}");
}

#[test]
fn sanitized_rule_names() {
    let grammar = Grammar::new(vec![
        Rule::start("Main-Rule", Choice::single(Sequence::new(vec![Element::expr(Expr::rule_ref("main_rule"))]))),
        Rule::new("main_rule", Choice::single(Sequence::new(vec![lit("x")]))),
    ]);
    let source = run(&grammar, &ActionTypes::new()).source;

    assert_lines(
        &source,
        &[
            "recursive function peg_main_rule(res) result(accept)",
            "if (.not. peg_main_rule_1(scratch_2)) then",
            "end function peg_main_rule",
            "recursive function peg_main_rule_1(res) result(accept)",
        ],
    );
}

#[test]
fn ir_is_printed_in_peg_notation() {
    let grammar = start(vec![
        Sequence::new(vec![Element::quantified(Expr::literal("a"), Quantifier::ZeroOrMore)]),
        Sequence::new(vec![lit("b")]),
    ]);
    let parser = match fortpeg_backend::grammar_to_ir(&grammar, &ActionTypes::new()) {
        Ok(parser) => parser,
        Err(err) => panic!("{err}"),
    };
    let printed = parser.print_to_string(None);

    assert_lines(
        &printed,
        &["start start (peg_start) : character(len=:), allocatable", "<- \"a\"*", "/ \"b\""],
    );
}

#[test]
fn action_code_with_unicode_whitespace() {
    let grammar = start(vec![Sequence::new(vec![lit("x")]).with_action(" res = 'x'\n\u{a0}res = 'y'")]);
    let source = run(&grammar, &ActionTypes::new()).source;
    assert!(source.contains(" res = 'x'\n"), "{source}");
    assert!(source.contains("\u{a0}res = 'y'\n"), "{source}");
}

#[test]
fn predicate_names_are_unique_across_rules() {
    let predicate = || {
        Element::assert(AssertionTarget::Predicate(Predicate {
            params: vec![],
            return_type: String::new(),
            code: "res = .true.".to_owned(),
        }))
    };
    let group = Choice::single(Sequence::new(vec![predicate(), lit("b")]));
    let grammar = Grammar::new(vec![
        Rule::start(
            "r",
            Choice::single(Sequence::new(vec![
                lit("a"),
                Element::expr(Expr::Group(group)),
                Element::expr(Expr::rule_ref("r_0_1")),
            ])),
        ),
        Rule::new("r_0_1", Choice::single(Sequence::new(vec![predicate(), lit("c")]))),
    ]);
    let translation = run(&grammar, &ActionTypes::new());

    let names: Vec<&str> = translation.actions.iter().map(|action| action.name.as_str()).collect();
    assert_eq!(names, vec!["pred_r_0", "pred_r_0_1_0"]);
    assert_lines(&translation.source, &["function pred_r_0() result(res)", "function pred_r_0_1_0() result(res)"]);
}
