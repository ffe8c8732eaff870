use pretty::DocAllocator;
use pretty::termcolor::{Color, ColorSpec};

use super::types::*;

const KEYWORD: Color = Color::Magenta;
const TYPE: Color = Color::Red;
const COMMENT: Color = Color::Cyan;
const LITERAL: Color = Color::Green;
const RULE: Color = Color::Blue;

pub trait ThemeExt<'a> {
    fn keyword(&'a self, text: &'a str) -> Builder<'a>;
    fn typ(&'a self, text: &'a str) -> Builder<'a>;
    fn comment(&'a self, text: &'a str) -> Builder<'a>;
    fn literal(&'a self, text: String) -> Builder<'a>;
    fn rule(&'a self, text: &'a str) -> Builder<'a>;
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn keyword(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Keyword)
    }

    fn typ(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Type)
    }

    fn comment(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Comment)
    }

    fn literal(&'a self, text: String) -> Builder<'a> {
        self.text(text).annotate(Anno::Literal)
    }

    fn rule(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Rule)
    }
}

impl Anno {
    pub fn color(&self) -> Color {
        match self {
            Anno::Keyword => KEYWORD,
            Anno::Type => TYPE,
            Anno::Comment => COMMENT,
            Anno::Literal => LITERAL,
            Anno::Rule => RULE,
        }
    }

    /// Keywords are bold in addition to their color.
    pub fn spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(self.color())).set_bold(matches!(self, Anno::Keyword));
        spec
    }
}
