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

//! The closed set of token and operator kinds shared by the lexer, parser
//! and printer, plus the [`LangVariant`] dialect selector.

use strum::Display as StrumDisplay;

/// Selects which shell dialect the parser accepts.
///
/// Every dialect-only construct is gated behind a check against this value
/// (see [`crate::parser::require_feature`]); attempting to parse a
/// disallowed construct under the wrong variant is a
/// [`FeatureNotInLang`](crate::parser::ErrorCode::FeatureNotInLang) error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, StrumDisplay)]
pub enum LangVariant {
    /// Plain POSIX shell.
    #[strum(to_string = "POSIX")]
    Posix,
    /// Bash.
    #[strum(to_string = "Bash")]
    Bash,
    /// mksh, the MirBSD Korn shell.
    #[strum(to_string = "mksh")]
    MirBSDKorn,
    /// zsh.
    #[strum(to_string = "zsh")]
    Zsh,
    /// The Bats testing extension (layered on top of Bash).
    #[strum(to_string = "Bats")]
    Bats,
}

impl LangVariant {
    /// True if this variant is Bash or a Bash-derived dialect (Bats).
    #[must_use]
    pub const fn is_bash_like(self) -> bool {
        matches!(self, LangVariant::Bash | LangVariant::Bats)
    }
}

/// Internal token kinds the parser consumes in addition to the concrete
/// operator and literal tokens.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, StrumDisplay)]
pub enum TokenKind {
    /// End of input.
    #[strum(to_string = "EOF")]
    Eof,
    /// A logical newline (after line-continuation collapse).
    #[strum(to_string = "newline")]
    Newl,
    /// A literal fragment that can be continued by more literal fragments
    /// without a word break.
    #[strum(to_string = "literal")]
    Lit,
    /// A literal fragment known to be a complete word.
    #[strum(to_string = "literal word")]
    LitWord,
    /// An operator token (see the various `*Op` enums in this module).
    #[strum(to_string = "operator")]
    Operator,
}

macro_rules! spelled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $spelling:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// The canonical printable spelling of this operator.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $spelling, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

spelled_enum! {
    /// Redirection operators.
    pub enum RedirOp {
        Less => "<",
        Great => ">",
        DGreat => ">>",
        LessLess => "<<",
        LessLessDash => "<<-",
        LessLessLess => "<<<",
        LessAnd => "<&",
        GreatAnd => ">&",
        LessGreat => "<>",
        Clobber => ">|",
        AndGreat => "&>",
        AndDGreat => "&>>",
        PipeLineOnlyGreat => ">!",
        PipeLineOnlyDGreat => ">>!",
        DGreatPipe => ">>|",
        AndGreatPipe => "&>|",
        AndGreatBang => "&>!",
        AndDGreatPipe => "&>>|",
        AndDGreatBang => "&>>!",
    }
}

spelled_enum! {
    /// Process-substitution introducers.
    pub enum ProcSubstOp {
        /// `<(...)`
        In => "<(",
        /// `>(...)`
        Out => ">(",
        /// zsh `=(...)`, a temp-file variant of `In`.
        InTempFile => "=(",
    }
}

spelled_enum! {
    /// Extended-glob qualifiers (Bash/mksh `shopt -s extglob`).
    pub enum GlobOp {
        /// `?(...)`
        ZeroOrOne => "?(",
        /// `*(...)`
        Any => "*(",
        /// `+(...)`
        OneOrMore => "+(",
        /// `@(...)`
        Exactly => "@(",
        /// `!(...)`
        Not => "!(",
    }
}

spelled_enum! {
    /// Operators joining commands into a pipeline or list.
    pub enum BinaryCmdOp {
        AndStmt => "&&",
        OrStmt => "||",
        Pipe => "|",
        /// mksh coprocess pipe.
        PipeAll => "|&",
    }
}

spelled_enum! {
    /// `case` pattern-list terminators.
    pub enum CaseOp {
        /// `;;`
        Break => ";;",
        /// Bash `;&` (fallthrough).
        Fallthrough => ";&",
        /// Bash `;;&` (continue testing further patterns).
        Continue => ";;&",
    }
}

/// Parameter-expansion operators.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParamOp {
    /// `-` or `:-`
    Default { colon: bool },
    /// `=` or `:=`
    Assign { colon: bool },
    /// `?` or `:?`
    Error { colon: bool },
    /// `+` or `:+`
    Alternative { colon: bool },
    /// `#` (smallest prefix removal)
    TrimShortestPrefix,
    /// `##` (largest prefix removal)
    TrimLongestPrefix,
    /// `%` (smallest suffix removal)
    TrimShortestSuffix,
    /// `%%` (largest suffix removal)
    TrimLongestSuffix,
    /// Bash/zsh `^` (uppercase first match)
    UppercaseFirst,
    /// Bash/zsh `^^` (uppercase all matches)
    UppercaseAll,
    /// Bash/zsh `,` (lowercase first match)
    LowercaseFirst,
    /// Bash/zsh `,,` (lowercase all matches)
    LowercaseAll,
    /// Bash `@Q @E @P @A @a @K @k` and friends
    AtOperator(char),
    /// zsh `:#pattern` (remove if matching, a.k.a. `MatchEmpty`)
    MatchEmpty,
}

impl ParamOp {
    /// The canonical printable spelling (without the leading `:` flag,
    /// which callers emit separately).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ParamOp::Default { .. } => "-",
            ParamOp::Assign { .. } => "=",
            ParamOp::Error { .. } => "?",
            ParamOp::Alternative { .. } => "+",
            ParamOp::TrimShortestPrefix => "#",
            ParamOp::TrimLongestPrefix => "##",
            ParamOp::TrimShortestSuffix => "%",
            ParamOp::TrimLongestSuffix => "%%",
            ParamOp::UppercaseFirst => "^",
            ParamOp::UppercaseAll => "^^",
            ParamOp::LowercaseFirst => ",",
            ParamOp::LowercaseAll => ",,",
            ParamOp::AtOperator(_) => "@",
            ParamOp::MatchEmpty => ":#",
        }
    }

    /// Whether this operator carries the `:` (null-is-unset) flag.
    #[must_use]
    pub const fn colon(self) -> bool {
        match self {
            ParamOp::Default { colon }
            | ParamOp::Assign { colon }
            | ParamOp::Error { colon }
            | ParamOp::Alternative { colon } => colon,
            _ => false,
        }
    }
}

spelled_enum! {
    /// Unary arithmetic operators.
    pub enum UnaryArithOp {
        Plus => "+",
        Minus => "-",
        Not => "!",
        BitNot => "~",
        PreInc => "++",
        PreDec => "--",
        PostInc => "++",
        PostDec => "--",
    }
}

spelled_enum! {
    /// Binary (and assignment) arithmetic operators.
    pub enum BinaryArithOp {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Rem => "%",
        Pow => "**",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Gt => ">",
        Le => "<=",
        Ge => ">=",
        Shl => "<<",
        Shr => ">>",
        BitAnd => "&",
        BitOr => "|",
        BitXor => "^",
        And => "&&",
        Or => "||",
        /// zsh-only logical xor.
        Xor => "^^",
        Comma => ",",
        Cond => "?",
        Else => ":",
        Assign => "=",
        AddAssign => "+=",
        SubAssign => "-=",
        MulAssign => "*=",
        DivAssign => "/=",
        RemAssign => "%=",
        PowAssign => "**=",
        ShlAssign => "<<=",
        ShrAssign => ">>=",
        BitAndAssign => "&=",
        BitOrAssign => "|=",
        BitXorAssign => "^=",
        AndAssign => "&&=",
        OrAssign => "||=",
        XorAssign => "^^=",
    }
}

spelled_enum! {
    /// Unary test operators.
    pub enum UnaryTestOp {
        ExistsFile => "-e",
        IsRegularFile => "-f",
        IsDirectory => "-d",
        IsCharDevice => "-c",
        IsBlockDevice => "-b",
        IsPipe => "-p",
        IsSocket => "-S",
        IsSymlink => "-L",
        HasSetgid => "-g",
        HasSticky => "-u",
        IsReadable => "-r",
        IsWritable => "-w",
        IsExecutable => "-x",
        IsNonEmpty => "-s",
        IsTty => "-t",
        IsZeroLength => "-z",
        IsNonZeroLength => "-n",
        IsSet => "-v",
        IsRef => "-R",
        Not => "!",
        /// Bash `-o optname`
        IsShellOption => "-o",
    }
}

spelled_enum! {
    /// Binary test operators.
    pub enum BinaryTestOp {
        StrEq => "==",
        StrNe => "!=",
        /// `=~`, whose RHS is lexed in the `TestRegex` mode.
        RegexMatch => "=~",
        StrLt => "<",
        StrGt => ">",
        NumEq => "-eq",
        NumNe => "-ne",
        NumLt => "-lt",
        NumLe => "-le",
        NumGt => "-gt",
        NumGe => "-ge",
        NewerThan => "-nt",
        OlderThan => "-ot",
        SameFile => "-ef",
        And => "&&",
        Or => "||",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redir_spellings_round_trip() {
        assert_eq!(RedirOp::DGreat.as_str(), ">>");
        assert_eq!(RedirOp::LessLessDash.to_string(), "<<-");
    }

    #[test]
    fn lang_variant_displays_human_name() {
        assert_eq!(LangVariant::MirBSDKorn.to_string(), "mksh");
        assert!(LangVariant::Bats.is_bash_like());
        assert!(!LangVariant::Posix.is_bash_like());
    }

    #[test]
    fn param_op_colon_flag() {
        assert!(ParamOp::Default { colon: true }.colon());
        assert!(!ParamOp::TrimLongestSuffix.colon());
    }
}
