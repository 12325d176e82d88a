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

//! `fmt::Display` for the syntax tree: a non-configurable, best-effort
//! textual reconstruction used for error messages and quick debugging. Built
//! on top of the fully configurable [`crate::printer::Printer`] with its
//! default options, since hand-rolling a second tree-walker here would just
//! be two copies of the same logic drifting apart.

use std::fmt;

use crate::printer::Printer;
use crate::syntax::{Command, File, Stmt, Word};

fn reconstruct<'a>(node: impl Into<crate::printer::Printable<'a>>) -> String {
    let mut buf = Vec::new();
    // The printer only fails on a `Write` error, which a `Vec<u8>` sink
    // never produces.
    Printer::new().print(&mut buf, node).expect("printing to a Vec<u8> cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&reconstruct(self))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(reconstruct(self).trim_end_matches('\n'))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&reconstruct(self))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&reconstruct(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::token::LangVariant;

    #[test]
    fn stmt_display_matches_default_printer_minus_trailing_newline() {
        let file = Parser::new(b"foo bar", LangVariant::Posix).parse_file("").unwrap();
        assert_eq!(file.statements[0].to_string(), "foo bar");
    }

    #[test]
    fn word_display_reconstructs_quoting() {
        let file = Parser::new(b"echo 'a b'", LangVariant::Posix).parse_file("").unwrap();
        let Some(Command::Call(call)) = file.statements[0].command.as_ref() else {
            panic!("expected a call");
        };
        assert_eq!(call.words[1].to_string(), "'a b'");
    }
}
