use fortpeg_printer::theme::ThemeExt;
use fortpeg_printer::tokens::*;
use fortpeg_printer::util::ContinuationExt;
use fortpeg_printer::{Alloc, Builder, DocAllocator, Print, PrintCfg};

use super::stmts::{Stmt, print_body};

/// A Fortran module containing the generated procedures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub uses: Vec<String>,
    /// Emitted verbatim in front of the module
    pub prologue: Option<String>,
    pub functions: Vec<Function>,
    /// Emitted verbatim at the end of the `contains` section
    pub epilogue: Option<String>,
}

impl Print for Module {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Module { name, uses, prologue, functions, epilogue } = self;

        // Prologue
        //
        //

        let prologue = match prologue {
            Some(code) if !code.trim().is_empty() => {
                print_verbatim(code, alloc).append(alloc.hardline()).append(alloc.hardline())
            }
            _ => alloc.nil(),
        };

        // Specification part
        //
        //

        let uses = uses.iter().map(|module| {
            alloc.keyword(USE).append(alloc.space()).append(alloc.text(module)).append(alloc.hardline())
        });
        let spec = alloc.concat(uses).append(alloc.keyword(IMPLICIT_NONE));

        // Contains part
        //
        //

        let sep = alloc.hardline().append(alloc.hardline());
        let functions = alloc.intersperse(functions.iter().map(|f| f.print(cfg, alloc)), sep);

        let epilogue = match epilogue {
            Some(code) if !code.trim().is_empty() => {
                alloc.hardline().append(alloc.hardline()).append(print_verbatim(code, alloc))
            }
            _ => alloc.nil(),
        };

        prologue
            .append(alloc.keyword(MODULE))
            .append(alloc.space())
            .append(alloc.text(name))
            .append(alloc.hardline().append(spec).nest(cfg.indent))
            .append(alloc.hardline())
            .append(alloc.keyword(CONTAINS))
            .append(alloc.hardline().append(alloc.hardline()).append(functions).nest(cfg.indent))
            .append(epilogue)
            .append(alloc.hardline())
            .append(alloc.hardline())
            .append(alloc.keyword(END))
            .append(alloc.space())
            .append(alloc.keyword(MODULE))
            .append(alloc.space())
            .append(alloc.text(name))
            .append(alloc.hardline())
    }
}

/// A function `name(args) result(result)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub recursive: bool,
    pub name: String,
    pub args: Vec<String>,
    pub result: String,
    pub decls: Vec<Decl>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Stmts(Vec<Stmt>),
    /// Opaque code from the grammar
    Verbatim(String),
}

impl Print for Function {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Function { recursive, name, args, result, decls, body } = self;

        let head = if *recursive {
            alloc.keyword(RECURSIVE).append(alloc.space())
        } else {
            alloc.nil()
        };

        let args = alloc.continued(args.iter().map(|arg| alloc.text(arg)), COMMA).nest(cfg.indent);
        let head = head
            .append(alloc.keyword(FUNCTION))
            .append(alloc.space())
            .append(alloc.text(name))
            .append(args.parens())
            .append(alloc.space())
            .append(alloc.keyword(RESULT))
            .append(alloc.text(result).parens());

        let decls = decls.iter().map(|decl| alloc.hardline().append(decl.print(cfg, alloc)));
        let decls = alloc.concat(decls).nest(cfg.indent);

        let body = match body {
            Body::Stmts(stmts) => print_body(stmts, cfg, alloc),
            Body::Verbatim(code) if code.trim().is_empty() => alloc.nil(),
            Body::Verbatim(code) => alloc.hardline().append(print_verbatim(code, alloc)).nest(cfg.indent),
        };

        head.append(decls)
            .append(body)
            .append(alloc.hardline())
            .append(alloc.keyword(END))
            .append(alloc.space())
            .append(alloc.keyword(FUNCTION))
            .append(alloc.space())
            .append(alloc.text(name))
    }
}

/// A type declaration statement `type, attrs :: names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    /// The type specification, possibly including attributes like `allocatable`
    pub ty: String,
    pub attrs: Vec<String>,
    pub names: Vec<String>,
}

impl Decl {
    pub fn new(ty: &str, names: Vec<String>) -> Self {
        Decl { ty: ty.to_owned(), attrs: vec![], names }
    }

    pub fn with_attr(mut self, attr: &str) -> Self {
        self.attrs.push(attr.to_owned());
        self
    }
}

impl Print for Decl {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Decl { ty, attrs, names } = self;

        let spec = attrs
            .iter()
            .fold(alloc.typ(ty), |doc, attr| doc.append(", ").append(alloc.text(attr)));
        let names = alloc.continued(names.iter().map(|name| alloc.text(name)), COMMA).nest(cfg.indent);

        spec.append(" :: ").append(names)
    }
}

/// Print opaque code with its common indentation removed.
fn print_verbatim<'a>(code: &'a str, alloc: &'a Alloc<'a>) -> Builder<'a> {
    alloc.intersperse(dedent(code).into_iter().map(|line| alloc.text(line)), alloc.hardline())
}

/// Remove leading and trailing blank lines and the indentation shared by all other lines.
///
/// Only spaces and tabs count as indentation; other whitespace belongs to the user's code.
pub fn dedent(code: &str) -> Vec<&str> {
    let lines: Vec<&str> = code.lines().map(str::trim_end).collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return vec![];
    };
    let lines = &lines[first..=last];

    let indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines.iter().map(|line| if line.is_empty() { *line } else { &line[indent..] }).collect()
}
