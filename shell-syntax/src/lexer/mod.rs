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

//! The byte-level lexer.
//!
//! The lexer owns the cursor into the source buffer and a stack of
//! [`Mode`]s that determines how the next bytes are classified. Most modes
//! are entered and left entirely within one of the lexer's own
//! word-assembly methods (quoting and expansion nest lexically, so the
//! lexer can push before recursing and pop on return); the handful of modes
//! that depend on where the *parser* is in the grammar -- `Test`, `Arithm`,
//! `ArithmCmdLetCompact`, the `HeredocWord` delimiter -- are pushed and
//! popped by [`crate::parser`] at the exact syntactic points that need them.
//!
//! This crate does not evaluate shell code, so the lexer records quoted and
//! escaped text as raw source bytes rather than decoding it: a `$'...'`
//! word part keeps the text between the quotes, not the C-escape-expanded
//! string an interpreter would compute.

mod heredoc;
mod op;
mod word;

pub use heredoc::HereDocBody;
pub use op::{is_blank, OperatorMatch};

use crate::pos::{LineIndex, Pos};
use crate::token::LangVariant;
use thiserror::Error;

/// The closed set of lexer quoting/context modes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Normal,
    SingleQuoted,
    DollarSingleQuoted,
    DoubleQuoted,
    DollarDoubleQuoted,
    /// Nestable; `depth` counts how many backquote layers deep we are, so
    /// escape handling can apply the doubling rule for nested backquotes.
    Backquote { depth: u32 },
    /// The several positions inside `${...}`.
    ParamExp(ParamExpMode),
    Arithm,
    /// Arithmetic inside `let ARG`, where unquoted blanks terminate the
    /// expression instead of being part of it.
    ArithmCmdLetCompact,
    /// Inside `[[ ... ]]`.
    Test,
    /// The right-hand side of `=~`.
    TestRegex,
    /// The operator word after `<<`/`<<-`.
    HeredocWord,
    /// Between the heredoc operator's newline and the terminator line.
    HeredocBody { tabs: bool },
}

/// Sub-positions inside `${...}`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamExpMode {
    /// Immediately after `${`.
    Start,
    /// Inside an index `[...]`.
    Index,
    /// Inside a slice `:off` offset.
    SliceOffset,
    /// Inside a slice `:len` length.
    SliceLength,
    /// Inside a `/pat/rep` replace pattern.
    ReplacePattern,
    /// Inside a `/pat/rep` replace replacement.
    ReplaceReplacement,
    /// The trailing word after an operator like `:-`/`:+`.
    OperatorWord,
}

/// A lexical error.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected end of input while in {0:?} mode")]
    UnexpectedEof(Mode),
    #[error("invalid byte in quoted context")]
    InvalidByte,
}

/// The byte-level scanner. See the [module documentation](self).
pub struct Lexer<'s> {
    pub(crate) bytes: &'s [u8],
    pub(crate) pos: usize,
    pub(crate) lines: LineIndex,
    modes: Vec<Mode>,
    pub(crate) variant: LangVariant,
}

impl<'s> Lexer<'s> {
    /// Creates a lexer over `bytes`, starting in [`Mode::Normal`].
    #[must_use]
    pub fn new(bytes: &'s [u8], variant: LangVariant) -> Self {
        Lexer {
            bytes,
            pos: 0,
            lines: LineIndex::new(bytes),
            modes: vec![Mode::Normal],
            variant,
        }
    }

    /// The current byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Computes the [`Pos`] for an offset previously obtained from this
    /// lexer.
    #[must_use]
    pub fn pos_at(&self, offset: usize) -> Pos {
        self.lines.pos_at(offset)
    }

    /// The [`Pos`] of the current cursor position.
    #[must_use]
    pub fn here(&self) -> Pos {
        self.pos_at(self.pos)
    }

    /// The mode on top of the stack.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        self.modes.last().expect("mode stack is never empty")
    }

    /// Pushes a new mode. Every push must be matched by a [`Self::pop_mode`]
    /// before the lexer reaches end of input, or parsing ends in an
    /// `UnexpectedEof` error.
    pub fn push_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    /// Pops the innermost mode.
    ///
    /// # Panics
    ///
    /// If called when only the initial `Normal` mode remains -- this is a
    /// parser bug (an unbalanced push/pop), not a user-facing parse error.
    pub fn pop_mode(&mut self) -> Mode {
        assert!(self.modes.len() > 1, "pop_mode called with empty mode stack");
        self.modes.pop().unwrap()
    }

    /// True if the cursor is at end of input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Returns the byte at the cursor without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Returns the byte `n` positions ahead of the cursor without consuming
    /// anything.
    #[must_use]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    /// Consumes and returns the byte at the cursor.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes the byte at the cursor if it equals `b`.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a fixed literal prefix if present.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Collapses a `\<newline>` or `\<CR><newline>` line continuation at
    /// the cursor. Returns `true` if one was consumed. Only legal outside
    /// `SingleQuoted` and heredoc bodies; callers only invoke this from
    /// modes where it applies.
    pub fn eat_line_continuation(&mut self) -> bool {
        if self.peek() != Some(b'\\') {
            return false;
        }
        if self.peek_at(1) == Some(b'\n') {
            self.pos += 2;
            return true;
        }
        if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') {
            self.pos += 3;
            return true;
        }
        false
    }

    /// Skips any number of line continuations at the cursor.
    pub fn skip_line_continuations(&mut self) {
        while self.eat_line_continuation() {}
    }

    /// True if `c` is a blank (whitespace other than newline).
    #[must_use]
    pub fn is_blank_byte(b: u8) -> bool {
        b != b'\n' && (b as char).is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_stack_starts_with_normal() {
        let lx = Lexer::new(b"", LangVariant::Posix);
        assert_eq!(*lx.mode(), Mode::Normal);
    }

    #[test]
    fn push_pop_round_trips() {
        let mut lx = Lexer::new(b"", LangVariant::Posix);
        lx.push_mode(Mode::DoubleQuoted);
        assert_eq!(*lx.mode(), Mode::DoubleQuoted);
        assert_eq!(lx.pop_mode(), Mode::DoubleQuoted);
        assert_eq!(*lx.mode(), Mode::Normal);
    }

    #[test]
    fn line_continuation_is_collapsed() {
        let mut lx = Lexer::new(b"\\\nfoo", LangVariant::Posix);
        assert!(lx.eat_line_continuation());
        assert_eq!(lx.offset(), 2);
        assert!(!lx.eat_line_continuation());
    }

    #[test]
    fn crlf_line_continuation_is_collapsed() {
        let mut lx = Lexer::new(b"\\\r\nfoo", LangVariant::Bash);
        assert!(lx.eat_line_continuation());
        assert_eq!(lx.offset(), 3);
    }
}
