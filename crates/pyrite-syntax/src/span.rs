//! Source location tracking for tokens and AST nodes.
//!
//! Every token and AST node carries a [`Span`]. Lines and columns are
//! 1-indexed; columns count characters from the start of the line.
//!
//! # Examples
//!
//! ```
//! use pyrite_syntax::span::{LineCol, Span};
//!
//! let left = Span::new(0, 1, 1, 1, 1, 2);
//! let right = Span::new(4, 5, 1, 5, 1, 6);
//! let merged = Span::merge(left, right);
//!
//! assert_eq!(merged.start_pos(), LineCol::new(1, 1));
//! assert_eq!(merged.end_pos(), LineCol::new(1, 6));
//! ```

use std::fmt;

/// A source range: byte offsets plus line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start (0-indexed)
    pub start: usize,

    /// Byte offset of the span end (exclusive)
    pub end: usize,

    /// Line number of the span start (1-indexed)
    pub start_line: usize,

    /// Column number of the span start (1-indexed)
    pub start_col: usize,

    /// Line number of the span end (1-indexed)
    pub end_line: usize,

    /// Column just past the span end (1-indexed)
    pub end_col: usize,
}

impl Span {
    /// Creates a span from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Creates a span covering `left` through `right`.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            start_line: left.start_line,
            start_col: left.start_col,
            end_line: right.end_line,
            end_col: right.end_col,
        }
    }

    /// Creates a zero-length span, used for synthesized tokens.
    #[must_use]
    pub const fn point(offset: usize, line: usize, col: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span has zero length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the start position.
    #[must_use]
    pub const fn start_pos(&self) -> LineCol {
        LineCol::new(self.start_line, self.start_col)
    }

    /// Returns the end position.
    #[must_use]
    pub const fn end_pos(&self) -> LineCol {
        LineCol::new(self.end_line, self.end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A line and column position in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub col: usize,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Types that know where they came from in the source.
pub trait Spanned {
    /// Returns the source span of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}
