//! Source locations attached to syntax nodes and diagnostics.
//!
//! The region checker never reads source text; it only carries these spans
//! so that a failed check can point back at the construct that caused it.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("file#{_0}")]
pub struct FileId(pub u32);

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("{start}..{end}")]
pub struct Span {
    /// Inclusive start offset
    pub start: u32,
    /// Exclusive end offset
    pub end: u32,
}

impl Span {
    /// Creates a span covering `start..end`.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the span as a `usize` range for slicing source text.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Smallest span containing both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns `true` if the span has no width.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A span together with the file it belongs to.
///
/// Every syntax node in `cr-ast` carries one, and every region-check error
/// reports the `FileSpan` of the construct it failed on.
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("{file}@{span}")]
pub struct FileSpan {
    /// File containing the span
    pub file: FileId,
    /// Byte range inside the file
    pub span: Span,
}

impl FileSpan {
    /// Creates a file span.
    #[must_use]
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Span with no width at the start of `file`, for synthesized nodes.
    #[must_use]
    pub fn detached(file: FileId) -> Self {
        Self::new(file, Span::default())
    }

    /// Returns the byte range of the span.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }
}
