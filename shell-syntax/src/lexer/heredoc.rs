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

//! Here-document body scanning.
//!
//! The parser calls [`Lexer::lex_heredoc_body`] once per pending heredoc, in
//! the order the operators appeared, after it reaches the logical newline
//! that ends the command line the operator was on. This is the one place the
//! lexer runs ahead of the parser's next-token request: it consumes raw
//! bytes directly, without going through the mode-stack token loop, because a
//! heredoc body is not shell grammar -- it is text, up to a terminator line.

use super::{LexError, Lexer, Mode};

/// Outcome of scanning one heredoc body.
pub struct HereDocBody {
    /// The body text, `<<-`-detabbed if requested, with `$`/`` ` ``
    /// expansion-bearing parts *not* decoded (this crate records raw bytes;
    /// an unquoted delimiter still yields raw text here, since expansion is
    /// out of scope).
    pub text: String,
}

impl Lexer<'_> {
    /// Scans a heredoc body starting at the cursor (which must be positioned
    /// just after the newline that ended the operator's line) up to and
    /// including a line that, once any `<<-` leading tabs are stripped,
    /// equals `delimiter` exactly.
    ///
    /// `quoted` is whether the delimiter word carried any quoting; this only
    /// affects whether `$`/`` ` `` would retain meaning in an evaluating
    /// implementation; since this crate does not expand, `quoted` is still
    /// threaded through so callers can tag the resulting [`crate::syntax::HereDoc`]
    /// correctly for round-tripping, but has no effect on the text collected
    /// here.
    pub fn lex_heredoc_body(&mut self, delimiter: &str, dash: bool) -> Result<HereDocBody, LexError> {
        self.push_mode(Mode::HeredocBody { tabs: dash });
        let mut out = String::new();
        loop {
            let line_start = self.pos;
            if dash {
                while self.peek() == Some(b'\t') {
                    self.bump();
                }
            }
            let content_start = self.pos;
            while !matches!(self.peek(), None | Some(b'\n')) {
                self.bump();
            }
            let line = String::from_utf8_lossy(&self.bytes[content_start..self.pos]).into_owned();
            let had_newline = self.eat(b'\n');

            if line == delimiter {
                self.pop_mode();
                return Ok(HereDocBody { text: out });
            }

            if !dash {
                out.push_str(&String::from_utf8_lossy(&self.bytes[line_start..self.pos.min(self.bytes.len())]));
            } else {
                out.push_str(&line);
                if had_newline {
                    out.push('\n');
                }
            }
            if !had_newline {
                self.pop_mode();
                return Err(LexError::UnexpectedEof(Mode::HeredocBody { tabs: dash }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LangVariant;

    #[test]
    fn collects_body_up_to_delimiter() {
        let mut lx = Lexer::new(b"bar\nbaz\nEOF\nrest", LangVariant::Posix);
        let body = lx.lex_heredoc_body("EOF", false).unwrap();
        assert_eq!(body.text, "bar\nbaz\n");
        assert_eq!(&lx.bytes[lx.offset()..], b"rest");
    }

    #[test]
    fn dash_strips_leading_tabs_from_body_and_terminator() {
        let mut lx = Lexer::new(b"\t\tbar\n\tEOF\n", LangVariant::Bash);
        let body = lx.lex_heredoc_body("EOF", true).unwrap();
        assert_eq!(body.text, "bar\n");
    }

    #[test]
    fn unterminated_is_an_error() {
        let mut lx = Lexer::new(b"bar\nbaz", LangVariant::Posix);
        assert!(lx.lex_heredoc_body("EOF", false).is_err());
    }

    #[test]
    fn empty_body_matches_immediate_delimiter() {
        let mut lx = Lexer::new(b"EOF\n", LangVariant::Posix);
        let body = lx.lex_heredoc_body("EOF", false).unwrap();
        assert_eq!(body.text, "");
    }
}
