//! Byte-offset spans into source text.

use serde::Serialize;

/// A byte range into the analyzed source.
///
/// `end` is exclusive when slicing the covered text ([`TextSpan::text`],
/// [`TextSpan::len`]) and inclusive for cursor lookups ([`TextSpan::contains`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
}

impl TextSpan {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        TextSpan { start, end }
    }

    /// Zero-width span at `offset`.
    #[inline]
    pub const fn at(offset: u32) -> Self {
        TextSpan {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside this span.
    ///
    /// The end bound is inclusive so that a cursor sitting right after the
    /// last character of a token or a closing brace still counts as inside.
    #[inline]
    pub const fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether `other` lies entirely within this span.
    #[inline]
    pub const fn covers(self, other: TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both.
    #[inline]
    pub fn join(self, other: TextSpan) -> TextSpan {
        TextSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the source text covered by this span.
    pub fn text(self, source: &str) -> &str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}
