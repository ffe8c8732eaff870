use std::io;

use pretty::termcolor::{ColorSpec, WriteColor};

use crate::types::*;

/// Renders annotated documents with the colors of the theme.
///
/// Nested annotations restore the color of the enclosing one when they end.
pub struct RenderTermcolor<W> {
    specs: Vec<ColorSpec>,
    upstream: W,
}

impl<W> RenderTermcolor<W> {
    pub fn new(upstream: W) -> RenderTermcolor<W> {
        RenderTermcolor { specs: Vec::new(), upstream }
    }
}

impl<W> pretty::Render for RenderTermcolor<W>
where
    W: io::Write,
{
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.upstream.write(s.as_bytes())
    }

    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.upstream.write_all(s.as_bytes())
    }

    fn fail_doc(&self) -> Self::Error {
        io::Error::other("Document failed to render")
    }
}

impl<W> pretty::RenderAnnotated<'_, Anno> for RenderTermcolor<W>
where
    W: WriteColor,
{
    fn push_annotation(&mut self, anno: &Anno) -> Result<(), Self::Error> {
        let spec = anno.spec();
        self.upstream.set_color(&spec)?;
        self.specs.push(spec);
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        self.specs.pop();
        match self.specs.last() {
            Some(previous) => self.upstream.set_color(previous),
            None => self.upstream.reset(),
        }
    }
}
