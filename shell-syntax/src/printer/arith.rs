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

//! Arithmetic expression printing, shared by `$((...))`, `((...))`, `let`,
//! and C-style `for ((;;))`.

use std::io;

use crate::printer::Printer;
use crate::syntax::{ArithmExpr, ArithmExprKind};
use crate::token::BinaryArithOp;

impl Printer {
    pub(crate) fn print_arithm<W: io::Write>(&mut self, w: &mut W, expr: &ArithmExpr) -> io::Result<()> {
        match &expr.kind {
            ArithmExprKind::Literal(word) => self.print_word(w, word),
            ArithmExprKind::Paren(inner) => {
                if inner.is_literal() {
                    // A parenthesized bare literal carries no meaning a
                    // reader would miss; drop the redundant parens.
                    self.print_arithm(w, inner)
                } else {
                    self.write_str(w, "(")?;
                    self.print_arithm(w, inner)?;
                    self.write_str(w, ")")
                }
            }
            ArithmExprKind::UnaryPre(op, inner) => {
                self.write_str(w, op.as_str())?;
                self.print_arithm(w, inner)
            }
            ArithmExprKind::UnaryPost(op, inner) => {
                self.print_arithm(w, inner)?;
                self.write_str(w, op.as_str())
            }
            ArithmExprKind::Binary(op, lhs, rhs) => {
                self.print_arithm(w, lhs)?;
                if *op == BinaryArithOp::Comma {
                    self.write_str(w, op.as_str())?;
                    self.write_str(w, " ")?;
                } else {
                    self.write_str(w, " ")?;
                    self.write_str(w, op.as_str())?;
                    self.write_str(w, " ")?;
                }
                self.print_arithm(w, rhs)
            }
            ArithmExprKind::Ternary(cond, then, els) => {
                self.print_arithm(w, cond)?;
                self.write_str(w, " ? ")?;
                self.print_arithm(w, then)?;
                self.write_str(w, " : ")?;
                self.print_arithm(w, els)
            }
        }
    }

    /// `let`'s compact form: each operand is a standalone arithmetic
    /// expression, space-separated, with no space around its own operators
    /// collapsed (the expressions print exactly as [`Printer::print_arithm`]
    /// would for any other arithmetic context).
    pub(crate) fn print_arithm_list<W: io::Write>(&mut self, w: &mut W, exprs: &[ArithmExpr]) -> io::Result<()> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write_str(w, " ")?;
            }
            self.print_arithm(w, expr)?;
        }
        Ok(())
    }
}
