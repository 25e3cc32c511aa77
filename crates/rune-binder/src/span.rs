//! Source locations

use std::fmt;

/// Source location of an AST node: byte range plus 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl Span {
    /// Create a span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both spans
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: self.column.min(other.column),
        }
    }

    /// Sort key used when reporting diagnostics
    pub fn position(&self) -> (u32, u32, usize) {
        (self.line, self.column, self.start)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let a = Span::new(4, 8, 2, 5);
        let b = Span::new(10, 12, 2, 11);
        let merged = a.merge(&b);
        assert_eq!(merged, Span::new(4, 12, 2, 5));
        assert_eq!(merged.len(), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Span::new(0, 1, 3, 7)), "3:7");
    }
}
