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

//! `[[ ... ]]` test-expression printing.

use std::io;

use crate::printer::Printer;
use crate::syntax::{TestExpr, TestExprKind, TestRhs};

impl Printer {
    pub(crate) fn print_test_expr<W: io::Write>(&mut self, w: &mut W, expr: &TestExpr) -> io::Result<()> {
        match &expr.kind {
            TestExprKind::Word(word) => self.print_word(w, word),
            TestExprKind::Unary(op, word) => {
                self.write_str(w, op.as_str())?;
                self.write_str(w, " ")?;
                self.print_word(w, word)
            }
            TestExprKind::Binary(op, lhs, rhs) => {
                self.print_word(w, lhs)?;
                self.write_str(w, " ")?;
                self.write_str(w, op.as_str())?;
                self.write_str(w, " ")?;
                match rhs {
                    TestRhs::Word(word) | TestRhs::Regex(word) => self.print_word(w, word),
                }
            }
            TestExprKind::Not(inner) => {
                self.write_str(w, "! ")?;
                self.print_test_expr(w, inner)
            }
            TestExprKind::And(lhs, rhs) => {
                self.print_test_expr(w, lhs)?;
                self.write_str(w, " && ")?;
                self.print_test_expr(w, rhs)
            }
            TestExprKind::Or(lhs, rhs) => {
                self.print_test_expr(w, lhs)?;
                self.write_str(w, " || ")?;
                self.print_test_expr(w, rhs)
            }
            TestExprKind::Paren(inner) => {
                self.write_str(w, "(")?;
                self.print_test_expr(w, inner)?;
                self.write_str(w, ")")
            }
        }
    }
}
