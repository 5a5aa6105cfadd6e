//! Source positions shared by tokens and syntax nodes.

use std::fmt;

/// A contiguous region of source text.
///
/// Offsets count characters (not bytes) from the start of the decoded source,
/// `start` inclusive and `end` exclusive. `line` is the 1-based line the span
/// starts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        debug_assert!(start <= end, "span start {} is past its end {}", start, end);
        Self { start, end, line }
    }

    /// Zero-width span at `pos`.
    pub fn empty(pos: usize, line: usize) -> Self {
        Self::new(pos, pos, line)
    }

    /// Smallest span covering both `self` and `other`, keeping the line of
    /// whichever starts first.
    pub fn to(self, other: Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} (line {})", self.start, self.end, self.line)
    }
}
