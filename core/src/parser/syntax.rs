// Source positions shared by the tokenizer, the parser and diagnostics.

use core::{fmt, ops::Range};

/// Byte range `[start, end)` into the formula source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.0.start.min(b.0.start), a.0.end.max(b.0.end))
    }
    pub fn start(&self) -> usize {
        self.0.start
    }
    pub fn end(&self) -> usize {
        self.0.end
    }
    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.0.start..self.0.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start, self.0.end)
    }
}
