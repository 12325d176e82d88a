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

//! `[[ ... ]]` test-expression parsing.

use super::error::{ErrorCode, Result};
use super::Parser;
use crate::lexer::Mode;
use crate::syntax::{TestExpr, TestExprKind, TestRhs};
use crate::token::{BinaryTestOp, UnaryTestOp};

const UNARY_CANDIDATES: &[&str] = &[
    "-e", "-f", "-d", "-c", "-b", "-p", "-S", "-L", "-g", "-u", "-r", "-w", "-x", "-s", "-t", "-z",
    "-n", "-v", "-R", "-o",
];

fn unary_op(s: &str) -> UnaryTestOp {
    use UnaryTestOp::*;
    match s {
        "-e" => ExistsFile,
        "-f" => IsRegularFile,
        "-d" => IsDirectory,
        "-c" => IsCharDevice,
        "-b" => IsBlockDevice,
        "-p" => IsPipe,
        "-S" => IsSocket,
        "-L" => IsSymlink,
        "-g" => HasSetgid,
        "-u" => HasSticky,
        "-r" => IsReadable,
        "-w" => IsWritable,
        "-x" => IsExecutable,
        "-s" => IsNonEmpty,
        "-t" => IsTty,
        "-z" => IsZeroLength,
        "-n" => IsNonZeroLength,
        "-v" => IsSet,
        "-R" => IsRef,
        "-o" => IsShellOption,
        _ => unreachable!(),
    }
}

const BINARY_CANDIDATES: &[&str] = &[
    "==", "!=", "=~", "<=", ">=", "<", ">", "=", "-eq", "-ne", "-lt", "-le", "-gt", "-ge", "-nt", "-ot", "-ef",
];

fn binary_op(s: &str) -> BinaryTestOp {
    use BinaryTestOp::*;
    match s {
        "==" | "=" => StrEq,
        "!=" => StrNe,
        "=~" => RegexMatch,
        "<" => StrLt,
        ">" => StrGt,
        "-eq" => NumEq,
        "-ne" => NumNe,
        "-lt" => NumLt,
        "-le" => NumLe,
        "-gt" => NumGt,
        "-ge" => NumGe,
        "-nt" => NewerThan,
        "-ot" => OlderThan,
        "-ef" => SameFile,
        _ => unreachable!(),
    }
}

impl Parser<'_> {
    /// Parses the body of `[[ ... ]]`, stopping right before the closing
    /// `]]` (which the caller consumes).
    pub(crate) fn test_expr(&mut self) -> Result<TestExpr> {
        self.lexer.push_mode(Mode::Test);
        let result = self.test_or_expr();
        self.lexer.pop_mode();
        result
    }

    fn test_or_expr(&mut self) -> Result<TestExpr> {
        let mut lhs = self.test_and_expr()?;
        loop {
            self.skip_test_blanks();
            if !self.eat_test_op("||") {
                break;
            }
            let rhs = self.test_and_expr()?;
            let end = rhs.end;
            lhs = TestExpr {
                pos: lhs.pos,
                end,
                kind: TestExprKind::Or(Box::new(lhs), Box::new(rhs)),
            };
        }
        Ok(lhs)
    }

    fn test_and_expr(&mut self) -> Result<TestExpr> {
        let mut lhs = self.test_unary_expr()?;
        loop {
            self.skip_test_blanks();
            if !self.eat_test_op("&&") {
                break;
            }
            let rhs = self.test_unary_expr()?;
            let end = rhs.end;
            lhs = TestExpr {
                pos: lhs.pos,
                end,
                kind: TestExprKind::And(Box::new(lhs), Box::new(rhs)),
            };
        }
        Ok(lhs)
    }

    fn test_unary_expr(&mut self) -> Result<TestExpr> {
        self.skip_test_blanks();
        let pos = self.lexer.here();

        if self.eat_test_op("!") {
            let inner = self.test_unary_expr()?;
            let end = inner.end;
            return Ok(TestExpr {
                pos,
                end,
                kind: TestExprKind::Not(Box::new(inner)),
            });
        }

        if self.eat_test_op("(") {
            let inner = self.test_or_expr()?;
            self.skip_test_blanks();
            if !self.eat_test_op(")") {
                return Err(self.error(ErrorCode::UnterminatedTest));
            }
            let end = self.lexer.here();
            return Ok(TestExpr {
                pos,
                end,
                kind: TestExprKind::Paren(Box::new(inner)),
            });
        }

        if let Some(op_text) = self.lexer.peek_operator(UNARY_CANDIDATES) {
            // Only a unary test if followed by a blank and an operand, not
            // e.g. a `-o` belonging to `set -o` appearing as a bare word.
            let save = self.lexer.pos;
            self.lexer.match_operator(&[op_text]);
            if matches!(self.lexer.peek(), Some(b) if crate::lexer::Lexer::is_blank_byte(b)) {
                self.skip_test_blanks();
                let operand = self.test_operand_word()?;
                let end = operand.end;
                return Ok(TestExpr {
                    pos,
                    end,
                    kind: TestExprKind::Unary(unary_op(op_text), operand),
                });
            }
            self.lexer.pos = save;
        }

        let lhs = self.test_operand_word()?;
        self.skip_test_blanks();
        if let Some(op_text) = self.lexer.peek_operator(BINARY_CANDIDATES) {
            self.lexer.match_operator(&[op_text]);
            let op = binary_op(op_text);
            self.skip_test_blanks();
            let rhs = if op == BinaryTestOp::RegexMatch {
                self.lexer.push_mode(Mode::TestRegex);
                let w = self.test_regex_operand()?;
                self.lexer.pop_mode();
                TestRhs::Regex(w)
            } else {
                TestRhs::Word(self.test_operand_word()?)
            };
            let end = match &rhs {
                TestRhs::Word(w) | TestRhs::Regex(w) => w.end,
            };
            return Ok(TestExpr {
                pos: lhs.pos,
                end,
                kind: TestExprKind::Binary(op, lhs, rhs),
            });
        }

        let end = lhs.end;
        Ok(TestExpr {
            pos: lhs.pos,
            end,
            kind: TestExprKind::Word(lhs),
        })
    }

    fn eat_test_op(&mut self, s: &'static str) -> bool {
        self.lexer.match_operator(&[s]).is_some()
    }

    fn skip_test_blanks(&mut self) {
        loop {
            self.lexer.skip_line_continuations();
            match self.lexer.peek() {
                Some(b) if crate::lexer::Lexer::is_blank_byte(b) => {
                    self.lexer.bump();
                }
                _ => break,
            }
        }
    }

    /// True if the upcoming bytes (after skipping blanks) are the closing
    /// `]]` -- the test-expression loop checks this before each operand so
    /// it never tries to lex a word out of the closer.
    pub(crate) fn at_test_close(&mut self) -> bool {
        self.skip_test_blanks();
        self.lexer.bytes[self.lexer.pos..].starts_with(b"]]")
    }
}
