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

//! The purely lexical (recursion-free) part of word assembly: scanning the
//! raw content of `'...'`, `$'...'`, and plain literal runs.
//!
//! Everything that can nest arbitrary grammar -- `"..."`, `${...}`,
//! `$(...)`, `` `...` ``, `$((...))` -- needs to recurse back into the
//! grammar (a command substitution contains statements; a parameter
//! expansion's slice contains an arithmetic expression), so those live in
//! [`crate::parser`] instead, which calls the scanners here for their
//! purely-textual pieces.

use super::{Lexer, LexError, Mode};

impl Lexer<'_> {
    /// Scans the content of a `'...'` after the opening quote has been
    /// consumed. Every byte up to the closing `'` is literal, including
    /// newlines.
    pub fn lex_single_quoted(&mut self) -> Result<String, LexError> {
        self.push_mode(Mode::SingleQuoted);
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(LexError::UnexpectedEof(self.pop_mode())),
                Some(b'\'') => {
                    let text = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                    self.bump();
                    self.pop_mode();
                    return Ok(text);
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Scans the content of a `$'...'` after `$'` has been consumed.
    /// `\'`, `\\`, and the other C-escape introducers are recognized only
    /// in the sense that a backslash always escapes the following byte --
    /// this crate does not decode the escape into its final character.
    pub fn lex_dollar_single_quoted(&mut self) -> Result<String, LexError> {
        self.push_mode(Mode::DollarSingleQuoted);
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(LexError::UnexpectedEof(self.pop_mode())),
                Some(b'\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(LexError::UnexpectedEof(self.pop_mode()));
                    }
                }
                Some(b'\'') => {
                    let text = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                    self.bump();
                    self.pop_mode();
                    return Ok(text);
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Scans a maximal run of plain literal bytes starting at the cursor,
    /// stopping before any byte in `stop_extra`, before an unescaped `blank`
    /// (if `stop_on_blank`), before a quote/dollar/backquote introducer, or
    /// at end of input. Line continuations are collapsed and contribute no
    /// bytes to the returned text but do advance the cursor.
    ///
    /// Returns `None` (consuming nothing) if the very next byte already
    /// stops the run, so callers can tell "no literal run here" from "an
    /// empty literal run".
    pub fn lex_literal_run(&mut self, stop_extra: &[u8], stop_on_blank: bool) -> Option<String> {
        let mut out = String::new();
        loop {
            if self.skip_line_continuations_here() {
                continue;
            }
            let Some(b) = self.peek() else { break };
            if b == b'\n' || b == b'\'' || b == b'"' || b == b'$' || b == b'`' {
                break;
            }
            if stop_on_blank && Self::is_blank_byte(b) {
                break;
            }
            if stop_extra.contains(&b) {
                break;
            }
            if b == b'\\' {
                // An escape outside quotes: the following byte is literal,
                // the backslash itself is dropped.
                self.bump();
                match self.bump() {
                    Some(c) => out.push(c as char),
                    None => break,
                }
                continue;
            }
            out.push(b as char);
            self.bump();
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// Like [`Self::eat_line_continuation`] but usable mid-loop without
    /// borrowing issues in callers matching on `self.peek()`.
    fn skip_line_continuations_here(&mut self) -> bool {
        self.eat_line_continuation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LangVariant;

    #[test]
    fn single_quoted_stops_at_closing_quote() {
        // The caller consumes the opening quote before calling in.
        let mut lx = Lexer::new(b"hello'rest", LangVariant::Posix);
        assert_eq!(lx.lex_single_quoted().unwrap(), "hello");
        assert_eq!(lx.offset(), 6);
    }

    #[test]
    fn single_quoted_keeps_newlines_literal() {
        let mut lx = Lexer::new(b"a\nb'", LangVariant::Posix);
        assert_eq!(lx.lex_single_quoted().unwrap(), "a\nb");
    }

    #[test]
    fn dollar_single_quoted_respects_escaped_quote() {
        let mut lx = Lexer::new(br"a\'b'", LangVariant::Bash);
        assert_eq!(lx.lex_dollar_single_quoted().unwrap(), r"a\'b");
    }

    #[test]
    fn literal_run_stops_before_dollar() {
        let mut lx = Lexer::new(b"foo$bar", LangVariant::Posix);
        assert_eq!(lx.lex_literal_run(&[], true).as_deref(), Some("foo"));
        assert_eq!(lx.offset(), 3);
    }

    #[test]
    fn literal_run_collapses_line_continuation() {
        let mut lx = Lexer::new(b"fo\\\no", LangVariant::Posix);
        assert_eq!(lx.lex_literal_run(&[], true).as_deref(), Some("foo"));
    }

    #[test]
    fn literal_run_none_when_immediately_stopped() {
        let mut lx = Lexer::new(b"$foo", LangVariant::Posix);
        assert_eq!(lx.lex_literal_run(&[], true), None);
    }
}
