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

//! Parser and printer core for POSIX shell and its dialects.
//!
//! This crate turns shell source bytes into a [syntax tree](syntax) and can
//! re-emit source from that tree in one of several canonical styles. It
//! supports five [dialects](token::LangVariant): POSIX, Bash, mksh (the
//! MirBSD Korn shell), zsh, and the Bats testing extension.
//!
//! The pipeline is `bytes -> lexer -> parser -> tree`, and separately
//! `tree -> printer -> bytes`:
//!
//! - [`lexer`] is a hand-written, context-dependent byte scanner whose token
//!   classification depends on a quoting-state stack.
//! - [`parser`] is a recursive-descent consumer of lexer tokens that builds
//!   the [`syntax`] tree, coordinating mode transitions and the deferred
//!   heredoc queue.
//! - [`printer`] walks a tree and re-emits source bytes under a configurable
//!   set of style options.
//!
//! This crate does not evaluate shell code, expand words, resolve paths, run
//! subprocesses, or implement any builtin. It does not recover from syntax
//! errors: the first parse error aborts parsing. It does not preserve every
//! byte of the input, only its meaning (and, optionally, comments and some
//! padding).
//!
//! ```
//! use shell_syntax::parser::Parser;
//! use shell_syntax::token::LangVariant;
//!
//! let tree = Parser::new(b"foo; bar", LangVariant::Posix)
//!     .parse_file("example.sh")
//!     .unwrap();
//! assert_eq!(tree.statements.len(), 2);
//! ```

pub mod brace_expand;
mod display;
pub mod lexer;
pub mod parser;
pub mod pos;
pub mod printer;
pub mod quote;
pub mod syntax;
pub mod token;
