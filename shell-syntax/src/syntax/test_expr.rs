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

//! `[[ ... ]]` test-expression nodes.

use crate::pos::Pos;
use crate::syntax::Word;
use crate::token::{BinaryTestOp, UnaryTestOp};

/// One test-expression node, with its source span.
#[derive(Clone, Debug)]
pub struct TestExpr {
    pub pos: Pos,
    pub end: Pos,
    pub kind: TestExprKind,
}

/// The closed set of test-expression shapes. Unary/binary operands are
/// plain [`Word`]s; `Not`, `And`, `Or` and `Paren` combine whole `TestExpr`s.
#[derive(Clone, Debug)]
pub enum TestExprKind {
    /// A bare word, true iff it expands to a non-empty string.
    Word(Word),
    Unary(UnaryTestOp, Word),
    Binary(BinaryTestOp, Word, TestRhs),
    Not(Box<TestExpr>),
    And(Box<TestExpr>, Box<TestExpr>),
    Or(Box<TestExpr>, Box<TestExpr>),
    Paren(Box<TestExpr>),
}

/// The right-hand side of a [`TestExprKind::Binary`].
///
/// `=~`'s right-hand side is lexed in the `TestRegex` mode, which changes
/// tokenization (it extends up to the matching `]]` rather than stopping at
/// the next blank), so it is kept distinct from an ordinary word operand
/// even though both carry a [`Word`].
#[derive(Clone, Debug)]
pub enum TestRhs {
    Word(Word),
    Regex(Word),
}
