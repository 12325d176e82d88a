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

//! Structured parse errors.

use crate::pos::Pos;
use crate::token::LangVariant;
use std::fmt;
use thiserror::Error;

/// A dialect-gated construct, named for [`ErrorCode::FeatureNotInLang`]
/// messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Feature {
    pub name: &'static str,
    /// Human-readable description of which dialects accept it, used
    /// verbatim in the error message (the wording: `"a <owner>
    /// feature"`).
    pub owner: &'static str,
    pub allowed: &'static [LangVariant],
}

impl Feature {
    #[must_use]
    pub const fn allows(&self, variant: LangVariant) -> bool {
        let mut i = 0;
        while i < self.allowed.len() {
            // `matches!`/`PartialEq::eq` are not `const fn` across our MSRV,
            // so compare the discriminant by hand.
            if self.allowed[i] as u8 == variant as u8 {
                return true;
            }
            i += 1;
        }
        false
    }
}

/// The lookup table of every dialect-gated construct. [`crate::parser::Parser::require_feature`]
/// is the single call site that consults it.
pub static FEATURES: &[Feature] = &[
    Feature {
        name: "C-style for",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "[[ ]]",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh, LangVariant::Bats],
    },
    Feature {
        name: "arrays",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "parameter slicing",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "herestring",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "process substitution",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "declare/typeset and friends",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "extended glob",
        owner: "bash/mksh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Bats],
    },
    Feature {
        name: "mksh reply-var command substitution",
        owner: "mksh",
        allowed: &[LangVariant::MirBSDKorn],
    },
    Feature {
        name: "mksh temp-file command substitution",
        owner: "mksh",
        allowed: &[LangVariant::MirBSDKorn],
    },
    Feature {
        name: "zsh temp-file process substitution",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "zsh ${+foo} is-set flag",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "zsh subscript flags",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "zsh modifiers",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "zsh multi-name function declaration",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "zsh anonymous function",
        owner: "zsh",
        allowed: &[LangVariant::Zsh],
    },
    Feature {
        name: "coprocess",
        owner: "bash/mksh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Bats],
    },
    Feature {
        name: "time clause",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh, LangVariant::Bats],
    },
    Feature {
        name: "let clause",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh],
    },
    Feature {
        name: "select clause",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh, LangVariant::Bats],
    },
    Feature {
        name: "@test",
        owner: "bats",
        allowed: &[LangVariant::Bats],
    },
    Feature {
        name: "$'...'",
        owner: "bash/mksh/zsh",
        allowed: &[LangVariant::Bash, LangVariant::MirBSDKorn, LangVariant::Zsh, LangVariant::Bats],
    },
    Feature {
        name: "$\"...\"",
        owner: "bash",
        allowed: &[LangVariant::Bash, LangVariant::Bats],
    },
];

/// Stable parse-error codes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ErrorCode {
    #[error("invalid byte sequence in a quoted context")]
    LexicalError,
    #[error("unexpected token {found:?}{}", expected.map(|e| format!(", expected {e}")).unwrap_or_default())]
    UnexpectedToken { found: String, expected: Option<&'static str> },
    #[error("expected {0}")]
    ExpectedToken(&'static str),
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unterminated heredoc (delimiter {0:?} not found)")]
    UnterminatedHeredoc(String),
    #[error("unterminated {0}")]
    UnterminatedSubst(&'static str),
    #[error("unterminated arithmetic expression")]
    UnterminatedArithm,
    #[error("unterminated test expression")]
    UnterminatedTest,
    #[error("unterminated process substitution")]
    UnterminatedProcSubst,
    #[error("unterminated extended glob")]
    UnterminatedExtGlob,
    #[error("invalid parameter expansion")]
    InvalidParamExpansion,
    #[error("'{0}' must be followed by a statement list")]
    ReservedWordRequiresList(&'static str),
    #[error("{feature} is a {owner} feature; tried parsing as {tried}")]
    FeatureNotInLang {
        feature: &'static str,
        owner: &'static str,
        tried: LangVariant,
    },
    #[error("invalid name {0:?}")]
    InvalidName(String),
    #[error("invalid redirect")]
    InvalidRedirect,
    #[error("bad assignment")]
    BadAssignment,
    #[error("bad coproc syntax")]
    BadCoprocSyntax,
    #[error("arithmetic literal too large")]
    NumericOverflow,
}

/// A parse error with the position it occurred at.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub struct Error {
    pub filename: String,
    pub pos: Pos,
    pub code: ErrorCode,
}

impl Error {
    /// Whether this error means "ran out of input", rather than a genuine
    /// syntax mistake -- the signal [`crate::parser::Parser::interactive`]
    /// uses to tell "read another line and retry" apart from "report this
    /// to the caller and stop".
    ///
    /// `Unterminated*` codes are unconditionally incomplete: the lexer only
    /// raises them once it has already hit the end of the buffer looking
    /// for a closing quote/delimiter/paren. `ExpectedToken` and
    /// `UnexpectedToken`, though, fire for ordinary mid-input mistakes too
    /// (a stray `)`, a misspelled keyword), so those only count when the
    /// reported position sits at the very end of `input_len` bytes -- e.g.
    /// `if foo` with no `then` yet, where the parser ran out of bytes
    /// looking for the next reserved word rather than rejecting one it saw.
    #[must_use]
    pub fn is_incomplete(&self, input_len: usize) -> bool {
        match &self.code {
            ErrorCode::UnterminatedQuote
            | ErrorCode::UnterminatedHeredoc(_)
            | ErrorCode::UnterminatedSubst(_)
            | ErrorCode::UnterminatedArithm
            | ErrorCode::UnterminatedTest
            | ErrorCode::UnterminatedProcSubst
            | ErrorCode::UnterminatedExtGlob => true,
            ErrorCode::ExpectedToken(_) => self.pos.offset() >= input_len,
            ErrorCode::UnexpectedToken { found, .. } => found == "end of input" || self.pos.offset() >= input_len,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filename.is_empty() {
            write!(f, "{}: {}", self.pos, self.code)
        } else {
            write!(f, "{}:{}: {}", self.filename, self.pos, self.code)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error from [`crate::parser::Parser::interactive`]: either the reader
/// itself failed, or a complete line turned out not to parse.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InteractiveError {
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_omits_empty_filename() {
        let err = Error {
            filename: String::new(),
            pos: Pos::new(5, 1, 6),
            code: ErrorCode::UnterminatedQuote,
        };
        assert_eq!(err.to_string(), "1:6: unterminated quote");
    }

    #[test]
    fn display_includes_filename_when_present() {
        let err = Error {
            filename: "script.sh".to_owned(),
            pos: Pos::new(0, 1, 1),
            code: ErrorCode::FeatureNotInLang {
                feature: "[[ ]]",
                owner: "bash/mksh/zsh",
                tried: LangVariant::Posix,
            },
        };
        assert_eq!(
            err.to_string(),
            "script.sh:1:1: [[ ]] is a bash/mksh/zsh feature; tried parsing as POSIX"
        );
    }

    #[test]
    fn unterminated_heredoc_is_incomplete() {
        let err = Error { filename: String::new(), pos: Pos::new(0, 1, 1), code: ErrorCode::UnterminatedHeredoc("EOF".to_owned()) };
        assert!(err.is_incomplete(0));
    }

    #[test]
    fn unexpected_token_at_real_eof_is_incomplete() {
        let err = Error {
            filename: String::new(),
            pos: Pos::new(7, 1, 8),
            code: ErrorCode::UnexpectedToken { found: "end of input".to_owned(), expected: None },
        };
        assert!(err.is_incomplete(7));
    }

    #[test]
    fn unexpected_token_mid_input_is_not_incomplete() {
        let err = Error {
            filename: String::new(),
            pos: Pos::new(3, 1, 4),
            code: ErrorCode::UnexpectedToken { found: ")".to_owned(), expected: None },
        };
        assert!(!err.is_incomplete(10));
    }

    #[test]
    fn expected_token_at_real_eof_is_incomplete() {
        let err = Error { filename: String::new(), pos: Pos::new(6, 1, 7), code: ErrorCode::ExpectedToken("then") };
        assert!(err.is_incomplete(6));
    }

    #[test]
    fn expected_token_mid_input_is_not_incomplete() {
        let err = Error { filename: String::new(), pos: Pos::new(2, 1, 3), code: ErrorCode::ExpectedToken("then") };
        assert!(!err.is_incomplete(10));
    }

    #[test]
    fn feature_table_gates_posix_away_from_double_bracket() {
        let f = FEATURES.iter().find(|f| f.name == "[[ ]]").unwrap();
        assert!(!f.allows(LangVariant::Posix));
        assert!(f.allows(LangVariant::Bash));
    }
}
