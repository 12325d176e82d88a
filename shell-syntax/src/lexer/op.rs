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

//! Generic longest-match operator recognition.
//!
//! The lexer does not hardcode which punctuation sequences count as
//! operators in a given mode -- that depends on where the parser is in the
//! grammar (a `<` means something different inside `[[ ]]` than inside a
//! simple command). Instead [`super::Lexer::match_operator`] takes the
//! candidate spellings from the caller and performs a longest-prefix match,
//! so one small routine backs every `*Op` enum in [`crate::token`].

use super::Lexer;
use crate::pos::Pos;

/// Returns true if `c` is a blank character (whitespace other than
/// newline). Locale-independent: this crate does not consult `LC_CTYPE`.
#[must_use]
pub fn is_blank(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

/// A recognized operator lexeme.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OperatorMatch {
    pub text: &'static str,
    pub pos: Pos,
    pub end: Pos,
}

impl Lexer<'_> {
    /// Tries each of `candidates` against the cursor, preferring the
    /// longest match, and consumes it on success.
    ///
    /// `candidates` need not be pre-sorted; this function sorts a local
    /// copy by descending length so e.g. `>>` is preferred over `>` when
    /// both are offered.
    pub fn match_operator(&mut self, candidates: &[&'static str]) -> Option<OperatorMatch> {
        let mut sorted: Vec<&'static str> = candidates.to_vec();
        sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let start = self.pos;
        for cand in sorted {
            if self.bytes[self.pos..].starts_with(cand.as_bytes()) {
                self.pos += cand.len();
                let pos = self.pos_at(start);
                let end = self.pos_at(self.pos);
                return Some(OperatorMatch { text: cand, pos, end });
            }
        }
        None
    }

    /// Like [`Self::match_operator`] but only peeks; does not consume.
    #[must_use]
    pub fn peek_operator(&self, candidates: &[&'static str]) -> Option<&'static str> {
        let mut sorted: Vec<&'static str> = candidates.to_vec();
        sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
        sorted
            .into_iter()
            .find(|cand| self.bytes[self.pos..].starts_with(cand.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LangVariant;

    #[test]
    fn prefers_longest_match() {
        let mut lx = Lexer::new(b">>foo", LangVariant::Posix);
        let m = lx.match_operator(&[">", ">>", ">|"]).unwrap();
        assert_eq!(m.text, ">>");
        assert_eq!(lx.offset(), 2);
    }

    #[test]
    fn no_match_leaves_cursor_untouched() {
        let mut lx = Lexer::new(b"foo", LangVariant::Posix);
        assert!(lx.match_operator(&["<", ">"]).is_none());
        assert_eq!(lx.offset(), 0);
    }
}
