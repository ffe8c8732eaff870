use fortpeg_printer::theme::ThemeExt;
use fortpeg_printer::tokens::*;
use fortpeg_printer::{Alloc, Builder, DocAllocator, Print, PrintCfg};

use super::matchers::Choice;
use super::names::ValueType;

/// A complete parser: one function per rule plus the extracted actions and predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parser {
    pub prologue: Option<String>,
    pub epilogue: Option<String>,
    /// Rule functions in source order
    pub rules: Vec<RuleFn>,
    /// Action and predicate functions in extraction order
    pub actions: Vec<ActionFn>,
}

impl Parser {
    pub fn start_rule(&self) -> Option<&RuleFn> {
        self.rules.iter().find(|rule| rule.start)
    }

    pub fn rule(&self, id: &str) -> Option<&RuleFn> {
        self.rules.iter().find(|rule| rule.id == id)
    }
}

impl Print for Parser {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Parser { prologue: _, epilogue: _, rules, actions } = self;

        let sep = alloc.hardline().append(alloc.hardline());
        let rules = rules.iter().map(|rule| rule.print(cfg, alloc));
        let actions = actions.iter().map(|action| action.print(cfg, alloc));

        alloc.intersperse(rules.chain(actions), sep).append(alloc.hardline())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFn {
    /// The rule id as written in the grammar
    pub id: String,
    /// Name of the generated function
    pub name: String,
    pub start: bool,
    pub result_type: ValueType,
    pub body: Choice,
}

impl Print for RuleFn {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let RuleFn { id, name, start, result_type, body } = self;

        let head = if *start { alloc.keyword(START).append(alloc.space()) } else { alloc.nil() };
        let head = head
            .append(alloc.rule(id))
            .append(alloc.space())
            .append(alloc.comment(name).parens())
            .append(alloc.space())
            .append(COLON)
            .append(alloc.space())
            .append(alloc.typ(result_type.type_spec()));

        let alternatives = body.alternatives.iter().enumerate().map(|(idx, alt)| {
            let op = if idx == 0 { DEFINES } else { SLASH };
            alloc.text(op).append(alloc.space()).append(alt.print(cfg, alloc))
        });

        head.append(
            alloc.hardline().append(alloc.intersperse(alternatives, alloc.hardline())).nest(cfg.indent),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Action,
    Predicate,
}

/// A function wrapping the opaque code of a semantic action or predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFn {
    pub kind: ActionKind,
    pub name: String,
    pub params: Vec<Param>,
    pub result_type: ValueType,
    /// Opaque target-language code assigning the function result `res`.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
}

impl Print for ActionFn {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let ActionFn { kind, name, params, result_type, code } = self;

        let keyword = match kind {
            ActionKind::Action => "action",
            ActionKind::Predicate => "predicate",
        };

        let params = params.iter().map(|Param { name, ty }| {
            alloc
                .text(name)
                .append(alloc.space())
                .append(COLON)
                .append(alloc.space())
                .append(alloc.typ(ty.type_spec()))
        });
        let params = alloc.intersperse(params, alloc.text(COMMA).append(alloc.space())).parens();

        let code = alloc
            .intersperse(code.trim().lines().map(|line| alloc.text(line.trim_end())), alloc.hardline());

        alloc
            .keyword(keyword)
            .append(alloc.space())
            .append(alloc.text(name))
            .append(params)
            .append(alloc.space())
            .append(COLON)
            .append(alloc.space())
            .append(alloc.typ(result_type.type_spec()))
            .append(alloc.space())
            .append(alloc.text("{"))
            .append(alloc.hardline().append(code).nest(cfg.indent))
            .append(alloc.hardline())
            .append(alloc.text("}"))
    }
}
