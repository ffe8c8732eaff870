use pretty::DocAllocator;

use super::types::*;

pub trait ContinuationExt<'a> {
    /// A line break that renders as a single space when the enclosing group fits on one line
    /// and as a Fortran continuation (`&` followed by a newline) otherwise.
    fn continuation(&'a self) -> Builder<'a>;

    /// Separate the given documents by `sep`, allowing a continuation after each separator.
    fn continued<I>(&'a self, docs: I, sep: &'a str) -> Builder<'a>
    where
        I: IntoIterator<Item = Builder<'a>>;
}

impl<'a> ContinuationExt<'a> for Alloc<'a> {
    fn continuation(&'a self) -> Builder<'a> {
        self.text(" &").append(self.hardline()).flat_alt(self.space())
    }

    fn continued<I>(&'a self, docs: I, sep: &'a str) -> Builder<'a>
    where
        I: IntoIterator<Item = Builder<'a>>,
    {
        self.intersperse(docs, self.text(sep).append(self.continuation())).group()
    }
}
