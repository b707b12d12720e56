//! Indentation-aware line emitter shared by every page.

use std::io::{self, Write};

const INDENT: &str = "\t";

/// Writes lines prefixed with one tab per indent level.
///
/// `indent` and `unindent` must balance; unindenting below zero is a bug in
/// the caller and panics.
pub struct HtmlWriter<'w> {
    out: &'w mut dyn Write,
    depth: usize,
}

impl<'w> HtmlWriter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out, depth: 0 }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(INDENT.as_bytes())?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn unindent(&mut self) {
        assert!(self.depth > 0, "unindent without matching indent");
        self.depth -= 1;
    }

    /// Run `f` one level deeper.
    pub fn nested<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.indent();
        let result = f(self);
        self.unindent();
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flush the underlying stream. The page must be back at depth zero.
    pub fn finish(self) -> io::Result<()> {
        assert_eq!(self.depth, 0, "unbalanced indentation at end of page");
        self.out.flush()
    }
}
