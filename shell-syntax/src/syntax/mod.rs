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

//! The shell syntax tree.
//!
//! [`File`] is the root. It owns a forest of [`Stmt`]s; every node in the
//! forest owns its children, and every node exposes a start
//! ([`Pos`](crate::pos::Pos)) and end position so callers can slice the
//! original source for any subtree. Nothing mutates a node once the parser
//! has built it; the [`printer`](crate::printer) module only reads trees.
//!
//! The variant lists below are closed: adding a new shell construct means
//! adding a new variant here, in the lexer, and in the parser together, not
//! reusing an existing one in a surprising way.

mod arith;
mod test_expr;
mod walk;

pub use arith::{ArithmExpr, ArithmExprKind};
pub use test_expr::{TestExpr, TestExprKind, TestRhs};
pub use walk::{walk, Node};

use crate::pos::Pos;
use crate::token::{BinaryCmdOp, CaseOp, GlobOp, LangVariant, ParamOp, ProcSubstOp, RedirOp};

/// The root of a parsed shell script.
#[derive(Clone, Debug)]
pub struct File {
    /// The filename the source was read from (empty if unknown).
    pub filename: String,
    /// The dialect this file was parsed under.
    pub language: LangVariant,
    /// Top-level statements, in order.
    pub statements: Vec<Stmt>,
    /// Comments that trail the last statement with nothing syntactic left to
    /// attach to.
    pub trailing_comments: Vec<Comment>,
}

/// A `#`-introduced line comment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    /// Position of the `#`.
    pub pos: Pos,
    /// Comment text, excluding the `#` and the terminating newline.
    pub text: String,
}

/// How a [`Stmt`] was terminated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Terminator {
    /// No explicit terminator (end of list, or followed by `&&`/`||`/`|`).
    None,
    /// `;`
    Semicolon,
    /// `&`
    Background,
    /// mksh `|&` coprocess.
    Coproc,
}

/// A command optionally preceded by `!`, with its assignments, redirections
/// and terminator.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub pos: Pos,
    pub end: Pos,
    /// `!` negation.
    pub negated: bool,
    /// The command, or `None` for an assignment-only prefix statement (e.g.
    /// `FOO=bar BAR=baz` with no command word).
    pub command: Option<Command>,
    /// Assignments preceding the command. Only meaningful when `command` is
    /// `None` or a [`Command::Call`]/[`Command::DeclClause`].
    pub assigns: Vec<Assign>,
    /// Redirections attached to this statement, normalized into a flat list
    /// regardless of where they appeared among the command's words.
    pub redirects: Vec<Redirect>,
    pub terminator: Terminator,
    /// Comments attached to this statement as "leading" (appeared on their
    /// own line before it).
    pub comments: Vec<Comment>,
    /// A comment on the same line as (and after) this statement.
    pub inline_comment: Option<Comment>,
}

/// The closed set of command variants.
#[derive(Clone, Debug)]
pub enum Command {
    Call(Call),
    Subshell(Subshell),
    Block(Block),
    If(IfClause),
    While(Loop),
    Until(Loop),
    For(ForClause),
    Select(SelectClause),
    Case(CaseClause),
    Binary(BinaryCmd),
    FuncDecl(FuncDecl),
    TestClause(TestClause),
    DeclClause(DeclClause),
    TimeClause(TimeClause),
    CoprocClause(CoprocClause),
    LetClause(LetClause),
    ArithmCmd(ArithmCmd),
    TestDecl(TestDecl),
}

/// A simple command: assignments live on the enclosing [`Stmt`], so a `Call`
/// is just the name and arguments.
#[derive(Clone, Debug, Default)]
pub struct Call {
    pub words: Vec<Word>,
}

/// `( ... )`: runs its body in a subshell.
#[derive(Clone, Debug)]
pub struct Subshell {
    pub body: Vec<Stmt>,
}

/// `{ ...; }`: runs its body in the current shell.
#[derive(Clone, Debug)]
pub struct Block {
    pub body: Vec<Stmt>,
}

/// `if ... then ... [elif ...] [else ...] fi`.
#[derive(Clone, Debug)]
pub struct IfClause {
    pub cond: Vec<Stmt>,
    pub body: Vec<Stmt>,
    pub elifs: Vec<Elif>,
    pub else_body: Option<Vec<Stmt>>,
}

/// One `elif` arm of an [`IfClause`].
#[derive(Clone, Debug)]
pub struct Elif {
    pub cond: Vec<Stmt>,
    pub body: Vec<Stmt>,
}

/// `while`/`until ... do ... done`. `While` and `Until` share this shape and
/// differ only in which [`Command`] variant wraps them.
#[derive(Clone, Debug)]
pub struct Loop {
    pub cond: Vec<Stmt>,
    pub body: Vec<Stmt>,
}

/// `for NAME [in WORDS]; do ... done`, or Bash/zsh C-style
/// `for (( init; cond; post )); do ... done`.
#[derive(Clone, Debug)]
pub struct ForClause {
    pub kind: ForKind,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub enum ForKind {
    /// Word iteration. `words` is `None` when `in WORDS` was omitted
    /// (iterating over `"$@"` by default).
    Words {
        name: String,
        name_pos: Pos,
        words: Option<Vec<Word>>,
    },
    /// Bash/mksh/zsh C-style `for ((...))`.
    CStyle {
        init: Option<ArithmExpr>,
        cond: Option<ArithmExpr>,
        post: Option<ArithmExpr>,
    },
}

/// Bash/mksh/zsh `select NAME [in WORDS]; do ... done`.
#[derive(Clone, Debug)]
pub struct SelectClause {
    pub name: String,
    pub name_pos: Pos,
    pub words: Option<Vec<Word>>,
    pub body: Vec<Stmt>,
}

/// `case SUBJECT in ... esac`.
#[derive(Clone, Debug)]
pub struct CaseClause {
    pub subject: Word,
    pub items: Vec<CaseItem>,
}

/// One `pattern[|pattern...]) body ;;` arm of a [`CaseClause`].
#[derive(Clone, Debug)]
pub struct CaseItem {
    pub patterns: Vec<Word>,
    pub body: Vec<Stmt>,
    /// The terminator operator, or `None` for the last item when it has no
    /// explicit `;;`/`;&`/`;;&`.
    pub terminator: Option<CaseOp>,
    pub has_open_paren: bool,
}

/// `X op Y` where `op` is `&&`, `||`, `|`, or mksh `|&`.
#[derive(Clone, Debug)]
pub struct BinaryCmd {
    pub op: BinaryCmdOp,
    pub lhs: Box<Stmt>,
    pub rhs: Box<Stmt>,
}

/// A function definition, in any of the POSIX/Bash/zsh spellings.
#[derive(Clone, Debug)]
pub struct FuncDecl {
    /// zsh allows `function a b { ... }` to define several names at once;
    /// every other dialect has exactly one.
    pub names: Vec<String>,
    pub name_pos: Pos,
    /// Whether `()` followed the name(s).
    pub has_parens: bool,
    pub style: FuncStyle,
    pub body: Box<Stmt>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FuncStyle {
    /// POSIX `name() compound-command`.
    Posix,
    /// Bash/mksh/zsh `function name [()] compound-command`.
    Keyword,
    /// zsh anonymous `() { ... }` / `function () { ... }`.
    Anonymous,
}

/// Bash/mksh/zsh `[[ ... ]]`.
#[derive(Clone, Debug)]
pub struct TestClause {
    pub expr: TestExpr,
}

/// `declare`/`typeset`/`export`/`readonly`/`nameref`/`local` and dialect
/// variants.
#[derive(Clone, Debug)]
pub struct DeclClause {
    pub variant: DeclVariant,
    pub args: Vec<DeclArg>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeclVariant {
    Declare,
    Typeset,
    Export,
    Readonly,
    Nameref,
    Local,
}

#[derive(Clone, Debug)]
pub enum DeclArg {
    Assign(Assign),
    Word(Word),
}

/// Bash `time [-p] pipeline`.
#[derive(Clone, Debug)]
pub struct TimeClause {
    /// Whether `-p` (POSIX output format) was given.
    pub posix: bool,
    /// `None` for the degenerate `time` with no command (rare but legal).
    pub command: Option<Box<Stmt>>,
}

/// Bash `coproc [NAME] command`.
#[derive(Clone, Debug)]
pub struct CoprocClause {
    pub name: Option<String>,
    pub body: Box<Stmt>,
}

/// Bash/mksh/zsh `let expr [expr...]`.
#[derive(Clone, Debug)]
pub struct LetClause {
    pub exprs: Vec<ArithmExpr>,
}

/// `(( ... ))`.
#[derive(Clone, Debug)]
pub struct ArithmCmd {
    pub expr: ArithmExpr,
}

/// Bats `@test "description" { ... }`.
#[derive(Clone, Debug)]
pub struct TestDecl {
    pub description: Word,
    pub body: Box<Stmt>,
}

/// A `NAME=value` or `NAME=(word...)` assignment.
#[derive(Clone, Debug)]
pub struct Assign {
    pub pos: Pos,
    pub end: Pos,
    pub name: String,
    pub name_pos: Pos,
    /// Bash/mksh/zsh `NAME+=value` appends instead of replacing.
    pub append: bool,
    pub value: AssignValue,
}

#[derive(Clone, Debug)]
pub enum AssignValue {
    Scalar(Word),
    /// Bash/mksh/zsh `NAME=(word...)`.
    Array(Vec<Word>),
}

/// A redirection: `[fd]op target`, or `[fd]<<[-]delim` plus its body.
#[derive(Clone, Debug)]
pub struct Redirect {
    pub pos: Pos,
    pub end: Pos,
    pub fd: Option<FdSpec>,
    pub op: RedirOp,
    pub target: RedirTarget,
}

#[derive(Clone, Debug)]
pub enum FdSpec {
    Number(u32),
    /// Bash `{name}` automatic-fd-allocation form.
    VarName(String),
}

#[derive(Clone, Debug)]
pub enum RedirTarget {
    Word(Word),
    HereDoc(HereDoc),
}

/// A here-document body, attached to the [`Redirect`] that introduced it,
/// not to the command.
#[derive(Clone, Debug)]
pub struct HereDoc {
    pub delimiter: Word,
    /// `<<-`: strip leading tabs from the body and terminator line.
    pub dash: bool,
    /// Whether the delimiter word was quoted, which disables `$`/`` ` ``
    /// expansion in the body and switches the terminator match to literal
    /// text comparison.
    pub quoted: bool,
    /// The body, filled in once the parser reaches the next logical
    /// newline; empty until then.
    pub body: Word,
}

/// A shell word: an ordered sequence of [`WordPart`]s.
#[derive(Clone, Debug, Default)]
pub struct Word {
    pub pos: Pos,
    pub end: Pos,
    pub parts: Vec<WordPart>,
}

impl Word {
    /// If this word is exactly one unquoted [`WordPart::Lit`], returns its
    /// text. Callers that need an unexpanded name (an assignment target, a
    /// case pattern used as a plain string, ...) ask for this instead of
    /// matching on `parts` themselves.
    #[must_use]
    pub fn as_lit(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Lit(s)] => Some(s),
            _ => None,
        }
    }

    /// True if every part is a [`WordPart::Lit`] (still not expansion-free
    /// in general, since a literal word can still need brace expansion).
    #[must_use]
    pub fn is_all_lit(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, WordPart::Lit(_)))
    }
}

/// The variants a [`Word`] can be built from.
#[derive(Clone, Debug)]
pub enum WordPart {
    /// Unquoted literal bytes.
    Lit(String),
    /// `'...'`
    SglQuoted(String),
    /// `$'...'`, which permits C-style escapes; `raw` is the text between
    /// the quotes before escape processing (this crate does not evaluate
    /// expansions, so the decoded value is not carried here).
    DollarSglQuoted(String),
    /// `"..."`
    DblQuoted(Text),
    /// `$"..."` (gettext form).
    DollarDblQuoted(Text),
    /// `$NAME`, `${...}`.
    ParamExp(ParamExpansion),
    /// `$(...)`, backquoted, or mksh `${ ...; }` / `${| ...; }`.
    CmdSubst(CmdSubst),
    /// `$((...))` or the deprecated `$[...]`.
    ArithmExp(ArithmExp),
    /// `?(...) *(...) +(...) @(...) !(...)` (Bash/mksh extglob).
    ExtGlob(ExtGlobPart),
    /// `<(...)`, `>(...)`, zsh `=(...)`.
    ProcSubst(ProcSubstPart),
    /// `~` or `~NAME` tilde prefix.
    Tilde(String),
    /// Placeholder sink for the output of the separate brace-expansion
    /// step. The parser never constructs this
    /// variant: `{a,b,c}`/`{x..y}` are parsed as ordinary [`WordPart::Lit`]
    /// text, and [`crate::brace_expand::split`] later turns one `Word`
    /// into several by operating on that literal text directly. The
    /// variant exists so downstream tooling has a typed place to put an
    /// already-split alternative if it wants to keep the split lazy.
    BraceExp(BraceExpPart),
}

/// See [`WordPart::BraceExp`].
#[derive(Clone, Debug)]
pub struct BraceExpPart {
    pub alternatives: Vec<Word>,
}

/// A sequence of [`TextUnit`]s: the content of a double-quoted string or of
/// a parameter-expansion operand where tildes and nested quotes are not
/// recognized but expansions still are.
#[derive(Clone, Debug, Default)]
pub struct Text(pub Vec<TextUnit>);

#[derive(Clone, Debug)]
pub enum TextUnit {
    Lit(String),
    /// A `\x` escape that retains meaning inside double quotes (`\$`,
    /// `` \` ``, `\"`, `\\`, and, in Bash-like dialects, `\newline`).
    Backslashed(char),
    ParamExp(ParamExpansion),
    CmdSubst(CmdSubst),
    ArithmExp(ArithmExp),
}

/// `$NAME` or the many `${...}` forms.
#[derive(Clone, Debug)]
pub struct ParamExpansion {
    pub pos: Pos,
    pub end: Pos,
    /// `true` for the bare `$NAME` form (no braces, no modifiers allowed).
    pub simple: bool,
    pub name: ParamName,
    /// `${#NAME}` length-of flag.
    pub length: bool,
    /// zsh `${!NAME}` indirection flag.
    pub excl: bool,
    /// zsh `${+NAME}` is-set flag.
    pub plus: bool,
    /// zsh `${NAME%}`-family width flag (the fourth flag character,
    /// alongside length/excl/plus).
    pub width: bool,
    pub index: Option<Index>,
    pub slice: Option<Slice>,
    pub replace: Option<Replace>,
    pub expansion: Option<Expansion>,
    /// zsh `${${...}...}` nesting.
    pub nested: Option<Box<ParamExpansion>>,
    /// zsh modifiers (`:u`, `:t5`, `:h2`, ...), kept as their raw spelling.
    /// Any modifier spelling not recognized by [`crate::parser`] is rejected
    /// with `FeatureNotInLang` rather than guessed at, so what ends up here
    /// is always one of the spellings the parser validated.
    pub modifiers: Vec<String>,
    /// zsh subscript flags (`(s/x/)` and the like), kept as raw text for
    /// the same reason.
    pub flags: Option<String>,
}

#[derive(Clone, Debug)]
pub enum ParamName {
    Variable(String),
    /// `$?`, `$$`, `$!`, `$#`, `$-`, `$@`, `$*`, `$0`.
    Special(char),
    /// `$1`, `$2`, ...
    Positional(u32),
}

#[derive(Clone, Debug)]
pub struct Index {
    pub expr: IndexExpr,
}

#[derive(Clone, Debug)]
pub enum IndexExpr {
    Arithm(ArithmExpr),
    /// `[@]`
    At,
    /// `[*]`
    Star,
    /// zsh subscript flags, e.g. `${a[(r)pat]}`.
    Flagged { flag: String, pattern: Word },
}

#[derive(Clone, Debug)]
pub struct Slice {
    pub offset: ArithmExpr,
    pub length: Option<ArithmExpr>,
}

#[derive(Clone, Debug)]
pub struct Replace {
    pub pattern: Word,
    /// `None` for `${v/pat}` (replace with empty string).
    pub replacement: Option<Word>,
    /// `//` (replace every match) vs `/` (replace first match).
    pub global: bool,
    pub anchor: Option<ReplaceAnchor>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplaceAnchor {
    /// `/#pat/rep` anchors the match to the start of the value.
    Prefix,
    /// `/%pat/rep` anchors the match to the end of the value.
    Suffix,
}

#[derive(Clone, Debug)]
pub struct Expansion {
    pub op: ParamOp,
    /// Absent for e.g. `${v@Q}` where the operator takes no operand word.
    pub operand: Option<Word>,
}

/// `$(...)`, backquoted, or the mksh variants.
#[derive(Clone, Debug)]
pub struct CmdSubst {
    pub pos: Pos,
    pub end: Pos,
    pub style: CmdSubstStyle,
    pub body: Vec<Stmt>,
    pub trailing_comments: Vec<Comment>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CmdSubstStyle {
    /// `$(...)`
    Dollar,
    /// `` `...` ``
    Backquote,
    /// mksh `${ ...; }` (temp-file command substitution).
    MirTempFile,
    /// mksh `${| ...; }` (reply-variable command substitution).
    MirReplyVar,
}

/// `$((...))` or the deprecated `$[...]`.
#[derive(Clone, Debug)]
pub struct ArithmExp {
    pub pos: Pos,
    pub end: Pos,
    /// `true` for the deprecated `$[...]` spelling.
    pub dollar_bracket: bool,
    pub expr: ArithmExpr,
}

/// `?(...) *(...) +(...) @(...) !(...)`; `patterns` holds the `|`-separated
/// alternatives inside the parens.
#[derive(Clone, Debug)]
pub struct ExtGlobPart {
    pub pos: Pos,
    pub end: Pos,
    pub op: GlobOp,
    pub patterns: Vec<Word>,
}

/// `<(...)`, `>(...)`, zsh `=(...)`.
#[derive(Clone, Debug)]
pub struct ProcSubstPart {
    pub pos: Pos,
    pub end: Pos,
    pub op: ProcSubstOp,
    pub body: Vec<Stmt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Word {
        Word {
            pos: Pos::new(0, 1, 1),
            end: Pos::new(s.len(), 1, 1 + s.len() as u32),
            parts: vec![WordPart::Lit(s.to_owned())],
        }
    }

    #[test]
    fn as_lit_recognizes_single_literal_part() {
        assert_eq!(lit("foo").as_lit(), Some("foo"));
    }

    #[test]
    fn as_lit_rejects_quoted_or_mixed_words() {
        let mut w = lit("foo");
        w.parts.push(WordPart::SglQuoted("bar".to_owned()));
        assert_eq!(w.as_lit(), None);
    }

    #[test]
    fn empty_word_is_not_a_literal() {
        let w = Word::default();
        assert_eq!(w.as_lit(), None);
    }
}
