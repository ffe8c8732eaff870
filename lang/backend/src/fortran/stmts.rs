use fortpeg_printer::theme::ThemeExt;
use fortpeg_printer::tokens::*;
use fortpeg_printer::{Alloc, Builder, DocAllocator, Print, PrintCfg};

use super::decls::Decl;
use super::exprs::Expr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign(Assign),
    If(If),
    Do(Do),
    SelectCase(SelectCase),
    Block(Block),
    /// `exit [label]`
    Exit(Option<String>),
    /// `cycle [label]`
    Cycle(Option<String>),
    Return,
}

impl Stmt {
    pub fn assign(lhs: &str, rhs: Expr) -> Self {
        Stmt::Assign(Assign { lhs: lhs.to_owned(), rhs })
    }

    /// `if (cond) then; body; end if`
    pub fn when(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::If(If { cond, then: body, else_ifs: vec![], otherwise: None })
    }

    pub fn exit(label: &str) -> Self {
        Stmt::Exit(Some(label.to_owned()))
    }

    pub fn cycle(label: &str) -> Self {
        Stmt::Cycle(Some(label.to_owned()))
    }

    /// Statements that fit into a logical `if` statement.
    fn is_simple(&self) -> bool {
        matches!(self, Stmt::Assign(_) | Stmt::Exit(_) | Stmt::Cycle(_) | Stmt::Return)
    }
}

impl Print for Stmt {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Stmt::Assign(assign) => assign.print(cfg, alloc),
            Stmt::If(if_) => if_.print(cfg, alloc),
            Stmt::Do(do_) => do_.print(cfg, alloc),
            Stmt::SelectCase(select) => select.print(cfg, alloc),
            Stmt::Block(block) => block.print(cfg, alloc),
            Stmt::Exit(label) => with_label(alloc.keyword(EXIT), label.as_deref(), alloc),
            Stmt::Cycle(label) => with_label(alloc.keyword(CYCLE), label.as_deref(), alloc),
            Stmt::Return => alloc.keyword(RETURN),
        }
    }
}

fn with_label<'a>(doc: Builder<'a>, label: Option<&'a str>, alloc: &'a Alloc<'a>) -> Builder<'a> {
    match label {
        Some(label) => doc.append(alloc.space()).append(alloc.text(label)),
        None => doc,
    }
}

/// Print statements on consecutive lines, indented relative to the enclosing construct.
pub fn print_body<'a>(body: &'a [Stmt], cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
    if body.is_empty() {
        return alloc.nil();
    }
    let stmts = body.iter().map(|stmt| stmt.print(cfg, alloc));
    alloc.hardline().append(alloc.intersperse(stmts, alloc.hardline())).nest(cfg.indent)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub lhs: String,
    pub rhs: Expr,
}

impl Print for Assign {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Assign { lhs, rhs } = self;
        alloc.text(lhs).append(" = ").append(rhs.print(cfg, alloc))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub cond: Expr,
    pub then: Vec<Stmt>,
    pub else_ifs: Vec<(Expr, Vec<Stmt>)>,
    pub otherwise: Option<Vec<Stmt>>,
}

impl Print for If {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let If { cond, then, else_ifs, otherwise } = self;

        let head = |keyword: Builder<'a>, cond: &'a Expr| {
            keyword.append(alloc.space()).append(cond.print(cfg, alloc).parens())
        };

        // if (cond) stmt
        if let ([stmt], [], None) = (then.as_slice(), else_ifs.as_slice(), otherwise) {
            if stmt.is_simple() {
                return head(alloc.keyword(IF), cond)
                    .append(alloc.space())
                    .append(stmt.print(cfg, alloc));
            }
        }

        let mut doc = head(alloc.keyword(IF), cond)
            .append(alloc.space())
            .append(alloc.keyword(THEN))
            .append(print_body(then, cfg, alloc));

        for (cond, body) in else_ifs {
            let keyword = alloc.keyword(ELSE).append(alloc.space()).append(alloc.keyword(IF));
            doc = doc
                .append(alloc.hardline())
                .append(head(keyword, cond))
                .append(alloc.space())
                .append(alloc.keyword(THEN))
                .append(print_body(body, cfg, alloc));
        }

        if let Some(body) = otherwise {
            doc = doc
                .append(alloc.hardline())
                .append(alloc.keyword(ELSE))
                .append(print_body(body, cfg, alloc));
        }

        doc.append(alloc.hardline()).append(end(IF, None, alloc))
    }
}

fn end<'a>(construct: &'a str, label: Option<&'a str>, alloc: &'a Alloc<'a>) -> Builder<'a> {
    let doc = alloc.keyword(END).append(alloc.space()).append(alloc.keyword(construct));
    with_label(doc, label, alloc)
}

fn labeled<'a>(label: Option<&'a str>, alloc: &'a Alloc<'a>) -> Builder<'a> {
    match label {
        Some(label) => alloc.text(label).append(COLON).append(alloc.space()),
        None => alloc.nil(),
    }
}

/// A `do` loop, counting if `range` is given and endless otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Do {
    pub label: Option<String>,
    pub range: Option<DoRange>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoRange {
    pub var: String,
    pub from: Expr,
    pub to: Expr,
}

impl Print for Do {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Do { label, range, body } = self;

        let mut doc = labeled(label.as_deref(), alloc).append(alloc.keyword(DO));
        if let Some(DoRange { var, from, to }) = range {
            doc = doc
                .append(alloc.space())
                .append(alloc.text(var))
                .append(" = ")
                .append(from.print(cfg, alloc))
                .append(", ")
                .append(to.print(cfg, alloc));
        }

        doc.append(print_body(body, cfg, alloc))
            .append(alloc.hardline())
            .append(end(DO, label.as_deref(), alloc))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCase {
    pub selector: Expr,
    pub cases: Vec<(u32, Vec<Stmt>)>,
    pub default: Option<Vec<Stmt>>,
}

impl Print for SelectCase {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let SelectCase { selector, cases, default } = self;

        let cases = cases.iter().map(|(value, body)| {
            alloc
                .keyword(CASE)
                .append(alloc.space())
                .append(alloc.text(value.to_string()).parens())
                .append(print_body(body, cfg, alloc))
        });
        let default = default
            .iter()
            .map(|body| alloc.keyword(CASE_DEFAULT).append(print_body(body, cfg, alloc)));

        alloc
            .keyword(SELECT_CASE)
            .append(alloc.space())
            .append(selector.print(cfg, alloc).parens())
            .append(alloc.hardline())
            .append(alloc.intersperse(cases.chain(default), alloc.hardline()))
            .append(alloc.hardline())
            .append(end(SELECT, None, alloc))
    }
}

/// A `block` construct with its own local declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub label: Option<String>,
    pub decls: Vec<Decl>,
    pub body: Vec<Stmt>,
}

impl Print for Block {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Block { label, decls, body } = self;

        let decls = if decls.is_empty() {
            alloc.nil()
        } else {
            let decls = decls.iter().map(|decl| decl.print(cfg, alloc));
            alloc.hardline().append(alloc.intersperse(decls, alloc.hardline())).nest(cfg.indent)
        };

        labeled(label.as_deref(), alloc)
            .append(alloc.keyword(BLOCK))
            .append(decls)
            .append(print_body(body, cfg, alloc))
            .append(alloc.hardline())
            .append(end(BLOCK, label.as_deref(), alloc))
    }
}
