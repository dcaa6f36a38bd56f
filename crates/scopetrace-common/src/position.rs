//! Byte offset to line/column mapping.
//!
//! Scopes, bindings and occurrences carry byte offsets. Reports and the CLI
//! show 0-indexed lines and character columns; `LineMap` converts.

use memchr::memchr2_iter;
use serde::Serialize;

use crate::TextSpan;

/// 0-indexed line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    /// Counted in `char`s from the start of the line.
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Offsets at which each line of a source begins.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let starts = std::iter::once(0)
            .chain(
                memchr2_iter(b'\n', b'\r', bytes)
                    .filter(|&i| bytes[i] == b'\n' || bytes.get(i + 1) != Some(&b'\n'))
                    .map(|i| (i + 1) as u32),
            )
            .collect();
        LineMap { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.starts.get(line).copied()
    }

    /// Index of the line containing `offset`.
    pub fn line_of(&self, offset: u32) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Offsets past the end of `source` clamp to its end.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let offset = offset.min(source.len() as u32);
        let line = self.line_of(offset);
        let start = self.starts[line] as usize;
        let character = source
            .get(start..offset as usize)
            .map_or(0, |text| text.chars().count());
        Position::new(line as u32, character as u32)
    }

    pub fn span_positions(&self, span: TextSpan, source: &str) -> (Position, Position) {
        (
            self.offset_to_position(span.start, source),
            self.offset_to_position(span.end, source),
        )
    }
}
