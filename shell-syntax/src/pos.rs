// This file is part of shell-syntax.
// Copyright (C) 2026 The shell-syntax authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Byte-offset positions and the line index used to derive them.
//!
//! Positions are values, not handles: a [`Pos`] carries its `(offset, line,
//! column)` triple directly rather than pointing back into a shared table.
//! [`LineIndex`] exists only to *compute* that triple from a bare byte
//! offset while scanning; once a [`Pos`] is built it stands on its own.

use std::cmp::Ordering;
use std::fmt;

/// A position in shell source, in bytes (not runes).
///
/// `offset` is the zero-based byte offset from the start of the source.
/// `line` and `column` are both 1-based. There is a sentinel
/// [`Pos::UNKNOWN`] for nodes whose end position was never determined.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Pos {
    offset: usize,
    line: u32,
    column: u32,
}

impl Default for Pos {
    /// Defaults to [`Pos::UNKNOWN`], so tree nodes built without a real
    /// source position (e.g. [`Word::default`] before a heredoc body is
    /// scanned) are trivially distinguishable from a real one.
    fn default() -> Self {
        Pos::UNKNOWN
    }
}

impl Pos {
    /// Sentinel position used when a node's end is not known.
    pub const UNKNOWN: Pos = Pos {
        offset: usize::MAX,
        line: 0,
        column: 0,
    };

    /// Creates a position directly from its components.
    ///
    /// `line` and `column` must be at least 1 unless this is meant to be
    /// [`Pos::UNKNOWN`]; callers normally obtain a `Pos` from
    /// [`LineIndex::pos_at`] instead of constructing one by hand.
    #[must_use]
    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Pos {
            offset,
            line,
            column,
        }
    }

    /// The zero-based byte offset into the source.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// The 1-based line number.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// The 1-based column number, in bytes.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }

    /// True if this is the [`Pos::UNKNOWN`] sentinel.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.offset == usize::MAX
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "?:?")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Maps byte offsets to `(line, column)` pairs for one source buffer.
///
/// Built once per input and shared by reference between the lexer (which
/// advances it as it scans) and anything that later needs to turn a raw
/// offset back into a [`Pos`].
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the first character of each line, 0-based, sorted.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds an index over `source`.
    #[must_use]
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, &b) in source.iter().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex { line_starts }
    }

    /// Computes the [`Pos`] for `offset`.
    ///
    /// `offset` may equal the source length (one-past-the-end positions are
    /// legal, e.g. for an empty `end`).
    #[must_use]
    pub fn pos_at(&self, offset: usize) -> Pos {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        Pos::new(offset, (line_idx + 1) as u32, (offset - line_start + 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let idx = LineIndex::new(b"abc\ndef\n");
        assert_eq!(idx.pos_at(0), Pos::new(0, 1, 1));
        assert_eq!(idx.pos_at(2), Pos::new(2, 1, 3));
    }

    #[test]
    fn crosses_newlines() {
        let idx = LineIndex::new(b"abc\ndef\nghi");
        assert_eq!(idx.pos_at(4), Pos::new(4, 2, 1));
        assert_eq!(idx.pos_at(6), Pos::new(6, 2, 3));
        assert_eq!(idx.pos_at(8), Pos::new(8, 3, 1));
    }

    #[test]
    fn end_of_input_is_legal() {
        let idx = LineIndex::new(b"abc");
        assert_eq!(idx.pos_at(3), Pos::new(3, 1, 4));
    }

    #[test]
    fn unknown_sentinel_displays_placeholder() {
        assert_eq!(Pos::UNKNOWN.to_string(), "?:?");
        assert!(Pos::UNKNOWN.is_unknown());
    }

    #[test]
    fn ordering_follows_offset() {
        let idx = LineIndex::new(b"abc\ndef\n");
        assert!(idx.pos_at(1) < idx.pos_at(5));
    }
}
