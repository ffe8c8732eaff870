use fortpeg_printer::theme::ThemeExt;
use fortpeg_printer::tokens::*;
use fortpeg_printer::{Alloc, Builder, DocAllocator, Print, PrintCfg};

use super::names::ValueType;

/// An ordered choice between alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub alternatives: Vec<Sequence>,
    /// The variable receiving the value of the alternative that succeeded.
    ///
    /// `None` when nobody observes the value, e.g. for groups that are not captured.
    pub result: Option<String>,
}

impl Print for Choice {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Choice { alternatives, result: _ } = self;

        let sep = alloc.space().append(SLASH).append(alloc.space());
        alloc.intersperse(alternatives.iter().map(|alt| alt.print(cfg, alloc)), sep).parens()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub elements: Vec<Element>,
    pub result: AltResult,
    pub result_type: ValueType,
}

impl Sequence {
    /// The capture variables introduced by this sequence, in element order.
    pub fn captures(&self) -> impl Iterator<Item = &Capture> {
        self.elements.iter().filter_map(|element| element.capture.as_ref())
    }
}

impl Print for Sequence {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Sequence { elements, result, result_type: _ } = self;

        let elements = if elements.is_empty() {
            alloc.text("()")
        } else {
            alloc.intersperse(elements.iter().map(|element| element.print(cfg, alloc)), alloc.space())
        };

        match result {
            AltResult::Consumed => elements,
            _ => elements
                .append(alloc.space())
                .append(FAT_ARROW)
                .append(alloc.space())
                .append(result.print(cfg, alloc)),
        }
    }
}

/// How the value of an alternative is computed once all its elements matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltResult {
    /// The text consumed by the alternative.
    Consumed,
    /// The value of a single plucked capture.
    Capture(String),
    /// The concatenation of several plucked text captures.
    Concat(Vec<String>),
    /// The value returned by a semantic action.
    Action(ActionCall),
}

impl Print for AltResult {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            AltResult::Consumed => alloc.text("$"),
            AltResult::Capture(var) => alloc.text(var),
            AltResult::Concat(vars) => {
                let sep = alloc.space().append(CONCAT).append(alloc.space());
                alloc.intersperse(vars.iter().map(|var| alloc.text(var)), sep)
            }
            AltResult::Action(call) => call.print(cfg, alloc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub matcher: Matcher,
    pub capture: Option<Capture>,
}

impl Print for Element {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Element { matcher, capture } = self;

        match capture {
            Some(Capture { var, .. }) => {
                alloc.text(var).append(COLON).append(matcher.print(cfg, alloc))
            }
            None => matcher.print(cfg, alloc),
        }
    }
}

/// A local variable receiving the value of a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub var: String,
    pub ty: ValueType,
    pub source: CaptureSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// The value produced by a rule call or a group.
    Value,
    /// The substring consumed by the element.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Terminal(Terminal),
    Call(RuleCall),
    Choice(Choice),
    Repeat(Repeat),
    Lookahead(Lookahead),
}

impl Print for Matcher {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Matcher::Terminal(terminal) => terminal.print(cfg, alloc),
            Matcher::Call(call) => call.print(cfg, alloc),
            Matcher::Choice(choice) => choice.print(cfg, alloc),
            Matcher::Repeat(repeat) => repeat.print(cfg, alloc),
            Matcher::Lookahead(lookahead) => lookahead.print(cfg, alloc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Literal(String),
    Class(Vec<ClassTest>),
    Any,
    End,
}

impl Print for Terminal {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Terminal::Literal(value) => alloc.literal(format!("{value:?}")),
            Terminal::Class(tests) => {
                let tests: String = tests.iter().map(ClassTest::to_peg).collect();
                alloc.literal(format!("[{tests}]"))
            }
            Terminal::Any => alloc.text(DOT),
            Terminal::End => alloc.text(BANG).append(DOT),
        }
    }
}

/// One test of a character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassTest {
    /// Any of the given characters.
    Set(String),
    Range(char, char),
}

impl ClassTest {
    fn to_peg(&self) -> String {
        match self {
            ClassTest::Set(chars) => chars.escape_default().to_string(),
            ClassTest::Range(bottom, top) => {
                format!("{}-{}", bottom.escape_default(), top.escape_default())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCall {
    /// Id of the called rule
    pub rule: String,
    pub function: String,
    pub result_type: ValueType,
}

impl Print for RuleCall {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.rule(&self.rule)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub body: Box<Matcher>,
    pub min: Bound,
    /// `None` means unbounded.
    pub max: Option<Bound>,
    /// Matched between two repetitions of the body.
    pub separator: Option<Box<Matcher>>,
}

impl Repeat {
    /// Whether the number of repetitions needs to be checked after the loop.
    pub fn has_min(&self) -> bool {
        !matches!(self.min, Bound::Count(0))
    }
}

impl Print for Repeat {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Repeat { body, min, max, separator } = self;

        let body = match **body {
            Matcher::Lookahead(_) | Matcher::Repeat(_) => body.print(cfg, alloc).parens(),
            _ => body.print(cfg, alloc),
        };

        let qty = match (min, max, separator) {
            (Bound::Count(0), Some(Bound::Count(1)), None) => alloc.text(QUESTION_MARK),
            (Bound::Count(0), None, None) => alloc.text(STAR),
            (Bound::Count(1), None, None) => alloc.text(PLUS),
            (min, Some(max), None) if min == max => alloc.text(PIPE).append(min.to_string()).append(PIPE),
            (min, max, None) => alloc
                .text(PIPE)
                .append(min.to_string())
                .append(DOT_DOT)
                .append(max.as_ref().map(Bound::to_string).unwrap_or_default())
                .append(PIPE),
            (min, _, Some(separator)) => alloc
                .text(PIPE)
                .append(min.to_string())
                .append(COMMA)
                .append(alloc.space())
                .append(separator.print(cfg, alloc))
                .append(PIPE),
        };

        body.append(qty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Count(u32),
    /// An integer expression of the target language, evaluated once before the first repetition.
    Expr(String),
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Count(n) => write!(f, "{n}"),
            Bound::Expr(expr) => write!(f, "{{{expr}}}"),
        }
    }
}

/// A zero-width check of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookahead {
    pub negate: bool,
    pub body: LookaheadBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookaheadBody {
    /// A matcher whose input is given back afterwards.
    Matcher(Box<Matcher>),
    /// A semantic predicate, which never looks at the input.
    Predicate(ActionCall),
}

impl Print for Lookahead {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Lookahead { negate, body } = self;
        let op = if *negate { BANG } else { AMPERSAND };
        let body = match body {
            LookaheadBody::Matcher(matcher) => matcher.print(cfg, alloc),
            LookaheadBody::Predicate(call) => call.print(cfg, alloc).braces(),
        };
        alloc.text(op).append(body)
    }
}

/// A call of an extracted action or predicate function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    pub function: String,
    pub args: Vec<String>,
}

impl Print for ActionCall {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let ActionCall { function, args } = self;

        let sep = alloc.text(COMMA).append(alloc.space());
        alloc
            .text(function)
            .append(alloc.intersperse(args.iter().map(|arg| alloc.text(arg)), sep).parens())
    }
}
