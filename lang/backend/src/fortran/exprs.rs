use fortpeg_printer::theme::ThemeExt;
use fortpeg_printer::tokens::*;
use fortpeg_printer::util::ContinuationExt;
use fortpeg_printer::{Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg};

/// Character constants longer than this are split into concatenated pieces, so that continuation
/// lines can be inserted between them.
const MAX_CHUNK_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Int(u32),
    Logical(bool),
    /// A character constant
    Str(String),
    Call(Call),
    /// `var(lo:hi)`
    Substring { var: String, lo: Box<Expr>, hi: Box<Expr> },
    /// An array constructor `[a, b]`
    Array(Vec<Expr>),
    Not(Box<Expr>),
    BinOp { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
    /// Opaque code from the grammar, always parenthesized.
    Verbatim(String),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_owned())
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call(Call { name: name.to_owned(), args })
    }

    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Add,
    Sub,
    Concat,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Lt => "<",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Concat => CONCAT,
        }
    }

    /// Fortran binds `+`/`-` tighter than `//`, which binds tighter than the relations.
    fn precedence(self) -> Precedence {
        match self {
            BinOp::Eq | BinOp::Gt | BinOp::Ge | BinOp::Lt => 2,
            BinOp::Concat => 3,
            BinOp::Add | BinOp::Sub => 4,
        }
    }
}

const PREC_NOT: Precedence = 1;
/// Operands of `.not.` are parenthesized unless they are atoms.
const PREC_ATOM: Precedence = 5;

impl Print for Expr {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Expr::Var(name) => alloc.text(name),
            Expr::Int(n) => alloc.text(n.to_string()),
            Expr::Logical(true) => alloc.keyword(TRUE),
            Expr::Logical(false) => alloc.keyword(FALSE),
            Expr::Str(value) => print_string(value, cfg, alloc),
            Expr::Call(call) => call.print(cfg, alloc),
            Expr::Substring { var, lo, hi } => alloc.text(var).append(
                lo.print(cfg, alloc).append(COLON).append(hi.print(cfg, alloc)).parens(),
            ),
            Expr::Array(items) => alloc
                .continued(items.iter().map(|item| item.print(cfg, alloc)), COMMA)
                .nest(cfg.indent)
                .brackets(),
            Expr::Not(expr) => {
                let doc = alloc
                    .keyword(NOT)
                    .append(alloc.space())
                    .append(expr.print_prec(cfg, alloc, PREC_ATOM));
                if prec > PREC_NOT { doc.parens() } else { doc }
            }
            Expr::BinOp { op, lhs, rhs } => {
                let op_prec = op.precedence();
                let doc = lhs
                    .print_prec(cfg, alloc, op_prec)
                    .append(alloc.space())
                    .append(op.symbol())
                    .append(alloc.space())
                    .append(rhs.print_prec(cfg, alloc, op_prec + 1));
                if prec > op_prec { doc.parens() } else { doc }
            }
            Expr::Verbatim(code) => alloc.text(code.trim()).parens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Print for Call {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Call { name, args } = self;

        let args = alloc.continued(args.iter().map(|arg| arg.print(cfg, alloc)), COMMA);
        alloc.text(name).append(args.nest(cfg.indent).parens())
    }
}

/// A piece of a character constant.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// Printable characters, quoted
    Quoted(String),
    /// A control character, written as `achar(code)`
    Code(u32),
}

/// Split `value` into quoted chunks and `achar` calls for control characters.
fn pieces(value: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0;

    for c in value.chars() {
        if c.is_ascii_control() {
            if !chunk.is_empty() {
                pieces.push(Piece::Quoted(std::mem::take(&mut chunk)));
                chunk_len = 0;
            }
            pieces.push(Piece::Code(c as u32));
            continue;
        }
        if chunk_len == MAX_CHUNK_LEN {
            pieces.push(Piece::Quoted(std::mem::take(&mut chunk)));
            chunk_len = 0;
        }
        if c == '\'' {
            chunk.push_str("''");
        } else {
            chunk.push(c);
        }
        chunk_len += 1;
    }

    if !chunk.is_empty() || pieces.is_empty() {
        pieces.push(Piece::Quoted(chunk));
    }

    pieces
}

fn print_string<'a>(value: &str, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
    let docs = pieces(value).into_iter().map(|piece| match piece {
        Piece::Quoted(text) => alloc.literal(format!("'{text}'")),
        Piece::Code(code) => alloc.text(format!("achar({code})")),
    });
    alloc.continued(docs, " //").nest(cfg.indent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(expr: &Expr) -> String {
        expr.print_to_string(None)
    }

    #[test]
    fn test_quote_is_doubled() {
        assert_eq!(print(&Expr::Str("it's".to_owned())), "'it''s'");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(print(&Expr::Str(String::new())), "''");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(print(&Expr::Str("a\nb".to_owned())), "'a' // achar(10) // 'b'");
        assert_eq!(print(&Expr::Str("\t".to_owned())), "achar(9)");
    }

    #[test]
    fn test_non_ascii_is_kept() {
        assert_eq!(print(&Expr::Str("ñ".to_owned())), "'ñ'");
    }

    #[test]
    fn test_long_string_is_split() {
        let value = "x".repeat(100);
        let pieces = pieces(&value);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[2], Piece::Quoted("x".repeat(20)));
    }

    #[test]
    fn test_long_string_uses_continuation_lines() {
        let cfg = PrintCfg { width: 60, indent: 4 };
        let printed = Expr::Str("y".repeat(100)).print_to_string(Some(&cfg));
        assert!(printed.lines().count() > 1);
        for line in printed.lines().take(printed.lines().count() - 1) {
            assert!(line.ends_with("// &"), "{line}");
        }
    }

    #[test]
    fn test_precedence() {
        let sum = Expr::bin(BinOp::Sub, Expr::var("cursor"), Expr::Int(1));
        let cmp = Expr::bin(BinOp::Lt, Expr::var("count_1"), Expr::Int(2));
        assert_eq!(print(&cmp.not()), ".not. (count_1 < 2)");

        let substring =
            Expr::Substring { var: "input".to_owned(), lo: Box::new(Expr::var("save_1")), hi: Box::new(sum) };
        assert_eq!(print(&substring), "input(save_1:cursor - 1)");

        let nested = Expr::bin(
            BinOp::Sub,
            Expr::var("a"),
            Expr::bin(BinOp::Sub, Expr::var("b"), Expr::var("c")),
        );
        assert_eq!(print(&nested), "a - (b - c)");
    }

    #[test]
    fn test_call() {
        let call = Expr::call(
            "acceptSet",
            vec![Expr::Array(vec![Expr::Str("a".to_owned()), Expr::Str("'".to_owned())])],
        );
        assert_eq!(print(&call), "acceptSet(['a', ''''])");
    }
}
