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

//! Arithmetic expression parsing: precedence climbing over the operator
//! ladder.

use super::error::{Error, ErrorCode, Result};
use super::Parser;
use crate::lexer::Mode;
use crate::syntax::{ArithmExpr, ArithmExprKind};
use crate::token::{BinaryArithOp, UnaryArithOp};

/// Precedence classes, lowest to highest. Larger
/// numbers bind tighter.
const PREC_COMMA: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_TERNARY: u8 = 3;
const PREC_OR: u8 = 4;
const PREC_XOR: u8 = 5;
const PREC_AND: u8 = 6;
const PREC_BIT_OR: u8 = 7;
const PREC_BIT_XOR: u8 = 8;
const PREC_BIT_AND: u8 = 9;
const PREC_EQ: u8 = 10;
const PREC_REL: u8 = 11;
const PREC_SHIFT: u8 = 12;
const PREC_ADD: u8 = 13;
const PREC_MUL: u8 = 14;
const PREC_POW: u8 = 15;

fn binary_op_info(op: BinaryArithOp) -> (u8, bool) {
    use BinaryArithOp::*;
    match op {
        Comma => (PREC_COMMA, false),
        Assign | AddAssign | SubAssign | MulAssign | DivAssign | RemAssign | PowAssign | ShlAssign
        | ShrAssign | BitAndAssign | BitOrAssign | BitXorAssign | AndAssign | OrAssign | XorAssign => {
            (PREC_ASSIGN, true)
        }
        Or => (PREC_OR, false),
        Xor => (PREC_XOR, false),
        And => (PREC_AND, false),
        BitOr => (PREC_BIT_OR, false),
        BitXor => (PREC_BIT_XOR, false),
        BitAnd => (PREC_BIT_AND, false),
        Eq | Ne => (PREC_EQ, false),
        Lt | Gt | Le | Ge => (PREC_REL, false),
        Shl | Shr => (PREC_SHIFT, false),
        Add | Sub => (PREC_ADD, false),
        Mul | Div | Rem => (PREC_MUL, false),
        Pow => (PREC_POW, true),
        Cond | Else => (PREC_TERNARY, true),
    }
}

/// Every spelling a binary arithmetic operator can start with, longest
/// first where it matters (`crate::lexer::op::match_operator` sorts for us).
const BINARY_CANDIDATES: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "!=", "<=", ">=", "<", ">", "<<", ">>", "&&", "||", "^^",
    "&", "|", "^", ",", "?", ":", "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", "&=",
    "|=", "^=", "&&=", "||=", "^^=",
];

const UNARY_PREFIX_CANDIDATES: &[&str] = &["++", "--", "+", "-", "!", "~"];
const POSTFIX_CANDIDATES: &[&str] = &["++", "--"];

fn spelling_to_binary_op(variant_is_zsh: bool, s: &str) -> Option<BinaryArithOp> {
    use BinaryArithOp::*;
    Some(match s {
        "+" => Add,
        "-" => Sub,
        "*" => Mul,
        "/" => Div,
        "%" => Rem,
        "**" => Pow,
        "==" => Eq,
        "!=" => Ne,
        "<" => Lt,
        ">" => Gt,
        "<=" => Le,
        ">=" => Ge,
        "<<" => Shl,
        ">>" => Shr,
        "&" => BitAnd,
        "|" => BitOr,
        "^" => BitXor,
        "&&" => And,
        "||" => Or,
        "^^" if variant_is_zsh => Xor,
        "," => Comma,
        "?" => Cond,
        ":" => Else,
        "=" => Assign,
        "+=" => AddAssign,
        "-=" => SubAssign,
        "*=" => MulAssign,
        "/=" => DivAssign,
        "%=" => RemAssign,
        "**=" => PowAssign,
        "<<=" => ShlAssign,
        ">>=" => ShrAssign,
        "&=" => BitAndAssign,
        "|=" => BitOrAssign,
        "^=" => BitXorAssign,
        "&&=" if variant_is_zsh => AndAssign,
        "||=" if variant_is_zsh => OrAssign,
        "^^=" if variant_is_zsh => XorAssign,
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parses a full arithmetic expression, stopping at whatever the
    /// enclosing construct delimits it with (`))`, a single `)`, a blank in
    /// `ArithmCmdLetCompact` mode, ...). The caller is responsible for
    /// pushing/popping `Mode::Arithm` (or `ArithmCmdLetCompact`) around the
    /// call, since mode transitions are the parser's
    /// job, not the lexer's.
    pub(crate) fn arithm_expr(&mut self, min_prec: u8) -> Result<ArithmExpr> {
        self.skip_arith_blanks();
        let mut lhs = self.arithm_unary()?;

        loop {
            self.skip_arith_blanks();
            if self.arith_stop_here() {
                break;
            }
            let start = self.lexer.offset();
            let Some(m) = self.lexer.match_operator(BINARY_CANDIDATES) else {
                break;
            };
            let is_zsh = self.variant == crate::token::LangVariant::Zsh;
            let Some(op) = spelling_to_binary_op(is_zsh, m.text) else {
                self.lexer.pos = start;
                break;
            };
            let (prec, right_assoc) = binary_op_info(op);
            if prec < min_prec {
                self.lexer.pos = start;
                break;
            }

            if op == BinaryArithOp::Cond {
                self.skip_arith_blanks();
                let then_branch = self.arithm_expr(PREC_ASSIGN)?;
                self.skip_arith_blanks();
                self.expect_arith_byte(b':')?;
                self.skip_arith_blanks();
                let else_branch = self.arithm_expr(PREC_TERNARY)?;
                let end = else_branch.end;
                lhs = ArithmExpr {
                    pos: lhs.pos,
                    end,
                    kind: ArithmExprKind::Ternary(Box::new(lhs), Box::new(then_branch), Box::new(else_branch)),
                };
                continue;
            }

            let next_min = if right_assoc { prec } else { prec + 1 };
            self.skip_arith_blanks();
            let rhs = self.arithm_expr(next_min)?;
            let end = rhs.end;
            lhs = ArithmExpr {
                pos: lhs.pos,
                end,
                kind: ArithmExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
            };
        }

        Ok(lhs)
    }

    fn arithm_unary(&mut self) -> Result<ArithmExpr> {
        self.skip_arith_blanks();
        let pos = self.lexer.here();
        if let Some(m) = self.lexer.match_operator(UNARY_PREFIX_CANDIDATES) {
            let op = match m.text {
                "++" => UnaryArithOp::PreInc,
                "--" => UnaryArithOp::PreDec,
                "+" => UnaryArithOp::Plus,
                "-" => UnaryArithOp::Minus,
                "!" => UnaryArithOp::Not,
                "~" => UnaryArithOp::BitNot,
                _ => unreachable!(),
            };
            let operand = self.arithm_unary()?;
            let end = operand.end;
            return Ok(ArithmExpr {
                pos,
                end,
                kind: ArithmExprKind::UnaryPre(op, Box::new(operand)),
            });
        }
        self.arithm_postfix()
    }

    fn arithm_postfix(&mut self) -> Result<ArithmExpr> {
        let mut expr = self.arithm_primary()?;
        loop {
            if let Some(m) = self.lexer.match_operator(POSTFIX_CANDIDATES) {
                let op = if m.text == "++" { UnaryArithOp::PostInc } else { UnaryArithOp::PostDec };
                let end = m.end;
                expr = ArithmExpr {
                    pos: expr.pos,
                    end,
                    kind: ArithmExprKind::UnaryPost(op, Box::new(expr)),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn arithm_primary(&mut self) -> Result<ArithmExpr> {
        self.skip_arith_blanks();
        let pos = self.lexer.here();
        if self.lexer.eat(b'(') {
            let inner = self.arithm_expr(PREC_COMMA)?;
            self.skip_arith_blanks();
            self.expect_arith_byte(b')')?;
            let end = self.lexer.here();
            return Ok(ArithmExpr {
                pos,
                end,
                kind: ArithmExprKind::Paren(Box::new(inner)),
            });
        }

        let word = self.arith_operand_word()?;
        let end = word.end;
        Ok(ArithmExpr {
            pos,
            end,
            kind: ArithmExprKind::Literal(word),
        })
    }

    fn expect_arith_byte(&mut self, b: u8) -> Result<()> {
        if self.lexer.eat(b) {
            Ok(())
        } else {
            Err(self.error(ErrorCode::UnterminatedArithm))
        }
    }

    pub(crate) fn skip_arith_blanks(&mut self) {
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

    /// True if the cursor is at a byte that ends the arithmetic expression
    /// entirely rather than continuing it with a binary operator: `)`
    /// closing an enclosing paren, EOF, or (in `ArithmCmdLetCompact`) a
    /// blank.
    fn arith_stop_here(&self) -> bool {
        match self.lexer.peek() {
            None => true,
            Some(b) if self.arith_terminators.contains(&b) => true,
            Some(b')') if self.arith_terminators.is_empty() => true,
            Some(b) if *self.lexer.mode() == Mode::ArithmCmdLetCompact && crate::lexer::Lexer::is_blank_byte(b) => true,
            _ => false,
        }
    }

    pub(crate) fn error(&self, code: ErrorCode) -> Error {
        Error {
            filename: self.filename.clone(),
            pos: self.lexer.here(),
            code,
        }
    }
}
