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

//! The recursive-descent parser.
//!
//! [`Parser`] drives a [`Lexer`] token by token; the two communicate through
//! the lexer's mode stack, which the parser pushes and pops at the exact
//! grammar positions that need a different quoting context.
//! There is no separate tokenizer pass: the parser calls lexer primitives
//! (`word`, `match_operator`, ...) directly from whatever grammar rule needs
//! them next.

mod arith;
mod error;
mod test_expr;
mod word;

pub use error::{Error, ErrorCode, Feature, InteractiveError, Result, FEATURES};

use crate::lexer::{Lexer, Mode};
use crate::pos::Pos;
use crate::syntax::*;
use crate::token::{BinaryCmdOp, CaseOp, LangVariant, RedirOp};
use word::WordOpts;

/// Where a here-document's body ends up relative to the [`Stmt`] that is
/// about to be pushed into the list currently being built: directly in its
/// own `redirects`, or one `BinaryCmd` hop away.
#[derive(Clone, Copy, Debug)]
enum HPath {
    BinaryLhs,
    BinaryRhs,
    TimeCommand,
    CoprocBody,
    TestDeclBody,
}

#[derive(Clone, Debug)]
struct HeredocSpec {
    delimiter: String,
    dash: bool,
}

/// A not-yet-filled here-document, recorded while the line it appears on is
/// still being parsed.
struct HDesc {
    path: Vec<HPath>,
    redirect_idx: usize,
    spec: HeredocSpec,
}

/// A patch recorded once the owning [`Stmt`] has been pushed into the
/// in-progress statement list, so [`Parser::flush_heredocs`] can find it by
/// index after later statements (and their own heredocs) have been parsed.
struct HeredocPatch {
    stmt_idx: usize,
    path: Vec<HPath>,
    redirect_idx: usize,
    spec: HeredocSpec,
}

/// Reserved words recognized at the start of a command.
/// Only checked in command-name position: `echo done` is an ordinary
/// argument, not the `done` keyword.
const RESERVED_WORDS: &[&str] = &[
    "if", "then", "elif", "else", "fi", "while", "until", "do", "done", "for", "in", "select",
    "case", "esac", "function", "time", "coproc", "let",
];

/// Configurable, reusable recursive-descent parser over one source buffer.
pub struct Parser<'s> {
    lexer: Lexer<'s>,
    variant: LangVariant,
    filename: String,
    keep_comments: bool,
    pending_comments: Vec<Comment>,
    /// Extra single-byte terminators [`Parser::arithm_expr`] should stop at,
    /// on top of its usual rules -- used while parsing a slice offset/length
    /// or an index, whose closing delimiter belongs to the caller.
    arith_terminators: Vec<u8>,
    /// A byte prefix that ends the statement list early, as if it were EOF,
    /// without consuming it -- lets a caller embed shell source inside a
    /// larger document and stop at its own closing marker.
    stop_at: Option<Vec<u8>>,
}

impl<'s> Parser<'s> {
    /// Creates a parser over `bytes` for the given dialect.
    #[must_use]
    pub fn new(bytes: &'s [u8], variant: LangVariant) -> Self {
        Parser {
            lexer: Lexer::new(bytes, variant),
            variant,
            filename: String::new(),
            keep_comments: true,
            pending_comments: Vec::new(),
            arith_terminators: Vec::new(),
            stop_at: None,
        }
    }

    /// Sets whether comments are attached to the tree.
    /// Defaults to `true`.
    #[must_use]
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Stops parsing as soon as `prefix` is seen at a statement boundary,
    /// leaving it (and everything after it) unconsumed, instead of treating
    /// it as the start of another command and failing on it. Used to embed
    /// shell source inside a larger document with its own closing marker
    /// (e.g. a heredoc-like `<<SHELL ... SHELL` wrapper in another
    /// language's source file).
    #[must_use]
    pub fn stop_at(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.stop_at = Some(prefix.into());
        self
    }

    fn at_stop_prefix(&self) -> bool {
        match &self.stop_at {
            Some(prefix) if !prefix.is_empty() => self.lexer.bytes[self.lexer.pos..].starts_with(prefix),
            _ => false,
        }
    }

    /// Parses the whole buffer as a [`File`].
    pub fn parse_file(mut self, filename: &str) -> Result<File> {
        self.filename = filename.to_owned();
        let statements = self.stmt_list(&[])?;
        self.skip_separators();
        let trailing = self.take_pending_comments();
        if !self.lexer.is_eof() && !self.at_stop_prefix() {
            return Err(self.unexpected_token());
        }
        Ok(File {
            filename: self.filename.clone(),
            language: self.variant,
            statements,
            trailing_comments: trailing,
        })
    }

    /// Streams statements from a line-oriented reader, invoking `on_stmts`
    /// each time one or more complete top-level statements become
    /// available -- e.g. a REPL feeding keystrokes line by line, where a
    /// `while read -r line; do ... done` body must not be evaluated until
    /// its closing `done` has actually been typed.
    ///
    /// Lines are appended to an internal buffer and reparsed from the
    /// start; an [`Error`] for which [`Error::is_incomplete`] reports the
    /// buffered lines end mid-construct (an open quote, heredoc,
    /// substitution, a compound command still missing its closing
    /// keyword, ...) means another line is read and the buffer retried,
    /// rather than reported as a failure. Any other parse error, or an I/O
    /// error from `reader`, stops the stream and is returned.
    pub fn interactive<R: std::io::BufRead>(
        mut reader: R,
        variant: LangVariant,
        mut on_stmts: impl FnMut(&[Stmt]),
    ) -> std::result::Result<(), InteractiveError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                if buf.iter().any(|b| !b.is_ascii_whitespace()) {
                    let file = Parser::new(&buf, variant).parse_file("")?;
                    if !file.statements.is_empty() {
                        on_stmts(&file.statements);
                    }
                }
                return Ok(());
            }
            buf.extend_from_slice(line.as_bytes());
            match Parser::new(&buf, variant).parse_file("") {
                Ok(file) => {
                    if !file.statements.is_empty() {
                        on_stmts(&file.statements);
                    }
                    buf.clear();
                }
                Err(e) if e.is_incomplete(buf.len()) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn require_feature(&self, name: &'static str) -> Result<()> {
        let feature = FEATURES.iter().find(|f| f.name == name).unwrap_or_else(|| panic!("unknown feature {name:?}"));
        if feature.allows(self.variant) {
            Ok(())
        } else {
            Err(self.error(ErrorCode::FeatureNotInLang {
                feature: feature.name,
                owner: feature.owner,
                tried: self.variant,
            }))
        }
    }

    fn unexpected_token(&mut self) -> Error {
        let found = self.peek_bare_word().map_or_else(
            || self.lexer.peek().map_or_else(|| "end of input".to_owned(), |b| (b as char).to_string()),
            |(w, _)| w,
        );
        self.error(ErrorCode::UnexpectedToken { found, expected: None })
    }

    fn take_pending_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.pending_comments)
    }

    // -- low-level cursor helpers --

    fn skip_blanks(&mut self) {
        loop {
            self.lexer.skip_line_continuations();
            match self.lexer.peek() {
                Some(b) if Lexer::is_blank_byte(b) => {
                    self.lexer.bump();
                }
                _ => break,
            }
        }
    }

    /// Consumes blank lines, comments (recording them into
    /// `pending_comments` when `keep_comments`), and `;`/newline separators,
    /// flushing any due heredocs each time a newline is crossed. Used
    /// between statements and at the top of a statement list.
    fn skip_separators(&mut self) {
        loop {
            self.skip_blanks();
            match self.lexer.peek() {
                Some(b'#') => self.consume_comment(),
                Some(b'\n') => {
                    self.lexer.bump();
                }
                Some(b';') => {
                    self.lexer.bump();
                }
                _ => break,
            }
        }
    }

    fn consume_comment(&mut self) {
        let pos = self.lexer.here();
        self.lexer.bump(); // '#'
        let start = self.lexer.offset();
        while !matches!(self.lexer.peek(), Some(b'\n') | None) {
            self.lexer.bump();
        }
        if self.keep_comments {
            let text = String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.offset()]).into_owned();
            self.pending_comments.push(Comment { pos, text });
        }
    }

    /// Peeks (without consuming) a plain unquoted word: letters/digits/`_`
    /// plus the handful of extra bytes reserved words use (`[`, `]`, `(`,
    /// `)`, `@`). Used only to recognize reserved words and names.
    fn peek_bare_word(&mut self) -> Option<(String, usize)> {
        let save = self.lexer.pos;
        self.skip_blanks();
        let start = self.lexer.pos;
        while let Some(b) = self.lexer.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'[' | b']' | b'(' | b')' | b'@' | b'!') {
                self.lexer.bump();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned();
        let len = self.lexer.pos - start;
        self.lexer.pos = save;
        if text.is_empty() {
            None
        } else {
            Some((text, len))
        }
    }

    /// If the upcoming bare word is exactly `word` and is itself a complete
    /// token (no trailing identifier byte glued to it), consumes it and
    /// returns `true`.
    fn try_reserved(&mut self, word: &str) -> bool {
        let save = self.lexer.pos;
        self.skip_blanks();
        if self.lexer.eat_str(word) {
            let ok = match self.lexer.peek() {
                None => true,
                Some(b) => !(b.is_ascii_alphanumeric() || b == b'_'),
            };
            if ok {
                return true;
            }
        }
        self.lexer.pos = save;
        false
    }

    fn at_reserved(&mut self, words: &[&str]) -> bool {
        let Some((text, _)) = self.peek_bare_word() else { return false };
        words.contains(&text.as_str())
    }

    fn newline(&mut self, body: &mut Vec<Stmt>, pending: &mut Vec<HeredocPatch>) -> Result<()> {
        if !self.lexer.eat(b'\n') {
            return Err(self.error(ErrorCode::UnterminatedHeredoc(String::new())));
        }
        self.flush_heredocs(body, pending)
    }

    fn flush_heredocs(&mut self, body: &mut [Stmt], pending: &mut Vec<HeredocPatch>) -> Result<()> {
        for patch in pending.drain(..) {
            let stmt = &mut body[patch.stmt_idx];
            let target = heredoc_path_mut(stmt, &patch.path);
            let redirect = &mut target.redirects[patch.redirect_idx];
            let RedirTarget::HereDoc(hd) = &mut redirect.target else {
                panic!("heredoc patch index did not point at a HereDoc redirect");
            };
            let scanned = self
                .lexer
                .lex_heredoc_body(&patch.spec.delimiter, patch.spec.dash)
                .map_err(|_| Error {
                    filename: self.filename.clone(),
                    pos: self.lexer.here(),
                    code: ErrorCode::UnterminatedHeredoc(patch.spec.delimiter.clone()),
                })?;
            hd.body = Word {
                pos: hd.delimiter.pos,
                end: hd.delimiter.end,
                parts: vec![WordPart::Lit(scanned.text)],
            };
        }
        Ok(())
    }

    // -- top-level statement grammar --

    /// Parses statements until EOF or one of `stop_words` is seen as the
    /// next command's name.
    pub(crate) fn stmt_list(&mut self, stop_words: &[&str]) -> Result<Vec<Stmt>> {
        let mut body: Vec<Stmt> = Vec::new();
        let mut pending: Vec<HeredocPatch> = Vec::new();

        loop {
            self.skip_blanks();
            while matches!(self.lexer.peek(), Some(b'#')) {
                self.consume_comment();
                self.skip_blanks();
            }
            while matches!(self.lexer.peek(), Some(b'\n') | Some(b';')) {
                if self.lexer.peek() == Some(b'\n') {
                    self.newline(&mut body, &mut pending)?;
                } else {
                    self.lexer.bump();
                }
                self.skip_blanks();
                while matches!(self.lexer.peek(), Some(b'#')) {
                    self.consume_comment();
                    self.skip_blanks();
                }
            }

            if self.lexer.is_eof() || self.at_reserved(stop_words) || self.at_stop_prefix() {
                break;
            }

            let leading = self.take_pending_comments();
            let before = self.lexer.offset();
            let (mut stmt, descs) = self.stmt()?;
            if stmt.command.is_none() && self.lexer.offset() == before {
                return Err(self.unexpected_token());
            }
            stmt.comments = leading;

            // An inline trailing comment on the same physical line.
            self.skip_blanks();
            if self.lexer.peek() == Some(b'#') {
                let pos = self.lexer.here();
                self.lexer.bump();
                let start = self.lexer.offset();
                while !matches!(self.lexer.peek(), Some(b'\n') | None) {
                    self.lexer.bump();
                }
                if self.keep_comments {
                    let text = String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.offset()]).into_owned();
                    stmt.inline_comment = Some(Comment { pos, text });
                }
            }

            let stmt_idx = body.len();
            body.push(stmt);
            for d in descs {
                pending.push(HeredocPatch { stmt_idx, path: d.path, redirect_idx: d.redirect_idx, spec: d.spec });
            }

            if !pending.is_empty() && matches!(self.lexer.peek(), Some(b'\n') | None) {
                if self.lexer.peek() == Some(b'\n') {
                    self.newline(&mut body, &mut pending)?;
                } else {
                    return Err(self.error(ErrorCode::UnterminatedHeredoc(pending[0].spec.delimiter.clone())));
                }
            }
        }

        Ok(body)
    }

    /// Parses one `Stmt`: optional negation, one pipeline/and-or chain, and
    /// a terminator.
    fn stmt(&mut self) -> Result<(Stmt, Vec<HDesc>)> {
        self.and_or_list()
    }

    fn and_or_list(&mut self) -> Result<(Stmt, Vec<HDesc>)> {
        let (mut lhs, mut descs) = self.pipeline()?;
        loop {
            self.skip_blanks();
            let op = if self.lexer.eat_str("&&") {
                Some(BinaryCmdOp::AndStmt)
            } else if self.lexer.eat_str("||") {
                Some(BinaryCmdOp::OrStmt)
            } else {
                None
            };
            let Some(op) = op else { break };
            self.skip_blanks();
            while self.lexer.eat(b'\n') {
                self.skip_blanks();
            }
            let (rhs, rhs_descs) = self.pipeline()?;
            let end = rhs.end;
            let start = lhs.pos;
            let mut combined = descs;
            for d in combined.iter_mut() {
                d.path.insert(0, HPath::BinaryLhs);
            }
            for mut d in rhs_descs {
                d.path.insert(0, HPath::BinaryRhs);
                combined.push(d);
            }
            descs = combined;
            lhs = Stmt {
                pos: start,
                end,
                negated: false,
                command: Some(Command::Binary(BinaryCmd { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })),
                assigns: vec![],
                redirects: vec![],
                terminator: Terminator::None,
                comments: vec![],
                inline_comment: None,
            };
        }

        self.skip_blanks();
        let terminator = if self.lexer.eat_str("|&") {
            // Only meaningful directly after a simple command in mksh; here
            // it has already been consumed as a pipeline operator by
            // `pipeline`, so reaching this means a trailing `|&` terminator
            // (mksh background coprocess).
            Terminator::Coproc
        } else if self.lexer.eat(b'&') {
            Terminator::Background
        } else if self.lexer.eat(b';') {
            Terminator::Semicolon
        } else {
            Terminator::None
        };
        lhs.terminator = terminator;
        Ok((lhs, descs))
    }

    fn pipeline(&mut self) -> Result<(Stmt, Vec<HDesc>)> {
        self.skip_blanks();
        let negated = self.try_reserved("!");

        let (mut lhs, mut descs) = self.compound_or_simple()?;
        loop {
            self.skip_blanks();
            let op = if self.lexer.eat_str("|&") {
                Some(BinaryCmdOp::PipeAll)
            } else if self.lexer.peek() == Some(b'|') && self.lexer.peek_at(1) != Some(b'|') {
                self.lexer.bump();
                Some(BinaryCmdOp::Pipe)
            } else {
                None
            };
            let Some(op) = op else { break };
            self.skip_blanks();
            while self.lexer.eat(b'\n') {
                self.skip_blanks();
            }
            let (rhs, rhs_descs) = self.compound_or_simple()?;
            let start = lhs.pos;
            let end = rhs.end;
            for d in descs.iter_mut() {
                d.path.insert(0, HPath::BinaryLhs);
            }
            for mut d in rhs_descs {
                d.path.insert(0, HPath::BinaryRhs);
                descs.push(d);
            }
            lhs = Stmt {
                pos: start,
                end,
                negated: false,
                command: Some(Command::Binary(BinaryCmd { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })),
                assigns: vec![],
                redirects: vec![],
                terminator: Terminator::None,
                comments: vec![],
                inline_comment: None,
            };
        }

        if negated {
            lhs.negated = true;
        }
        Ok((lhs, descs))
    }

    /// Parses exactly one command (simple or compound), including its own
    /// trailing redirects, but not its terminator.
    fn compound_or_simple(&mut self) -> Result<(Stmt, Vec<HDesc>)> {
        self.skip_blanks();
        let pos = self.lexer.here();

        if let Some((command, body_descs)) = self.try_compound_command()? {
            let (redirects, trail_descs) = self.redirect_tail()?;
            let mut descs = body_descs;
            descs.extend(trail_descs);
            let end = self.lexer.here();
            let stmt = Stmt {
                pos,
                end,
                negated: false,
                command: Some(command),
                assigns: vec![],
                redirects,
                terminator: Terminator::None,
                comments: vec![],
                inline_comment: None,
            };
            return Ok((stmt, descs));
        }

        self.simple_command(pos)
    }

    fn redirect_tail(&mut self) -> Result<(Vec<Redirect>, Vec<HDesc>)> {
        let mut redirects = Vec::new();
        let mut descs = Vec::new();
        loop {
            self.skip_blanks();
            let Some((redirect, spec)) = self.try_redirect()? else { break };
            let idx = redirects.len();
            redirects.push(redirect);
            if let Some(spec) = spec {
                descs.push(HDesc { path: vec![], redirect_idx: idx, spec });
            }
        }
        Ok((redirects, descs))
    }

    // -- simple commands, assignments, redirects --

    fn simple_command(&mut self, pos: Pos) -> Result<(Stmt, Vec<HDesc>)> {
        let mut assigns = Vec::new();
        let mut words = Vec::new();
        let mut redirects = Vec::new();
        let mut descs = Vec::new();

        loop {
            self.skip_blanks();
            if self.lexer.is_eof() || matches!(self.lexer.peek(), Some(b'\n')) {
                break;
            }
            if self.at_stmt_boundary() {
                break;
            }
            if words.is_empty() && self.at_reserved(RESERVED_WORDS) {
                break;
            }

            if let Some((redirect, spec)) = self.try_redirect()? {
                let idx = redirects.len();
                redirects.push(redirect);
                if let Some(spec) = spec {
                    descs.push(HDesc { path: vec![], redirect_idx: idx, spec });
                }
                continue;
            }

            if words.is_empty() {
                if let Some(assign) = self.try_assignment()? {
                    assigns.push(assign);
                    continue;
                }
            }

            let word = self.word(WordOpts::NORMAL)?;
            if word.parts.is_empty() {
                break;
            }
            words.push(word);
        }

        let end = self.lexer.here();
        let command = if words.is_empty() { None } else { Some(Command::Call(Call { words })) };
        let stmt = Stmt {
            pos,
            end,
            negated: false,
            command,
            assigns,
            redirects,
            terminator: Terminator::None,
            comments: vec![],
            inline_comment: None,
        };
        Ok((stmt, descs))
    }

    fn at_stmt_boundary(&mut self) -> bool {
        match self.lexer.peek() {
            None => true,
            Some(b';') | Some(b'&') | Some(b')') => true,
            Some(b'|') => true,
            _ => false,
        }
    }

    fn try_assignment(&mut self) -> Result<Option<Assign>> {
        let save = self.lexer.pos;
        let name_pos = self.lexer.here();
        if !matches!(self.lexer.peek(), Some(b) if b == b'_' || b.is_ascii_alphabetic()) {
            return Ok(None);
        }
        let start = self.lexer.pos;
        while matches!(self.lexer.peek(), Some(b) if b == b'_' || b.is_ascii_alphanumeric()) {
            self.lexer.bump();
        }
        let name = String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned();

        let append = self.lexer.eat_str("+=");
        if !append && !self.lexer.eat(b'=') {
            self.lexer.pos = save;
            return Ok(None);
        }

        let value = if self.lexer.peek() == Some(b'(') && self.variant != LangVariant::Posix {
            self.require_feature("arrays")?;
            self.lexer.bump();
            let mut items = Vec::new();
            loop {
                self.skip_blanks();
                while self.lexer.eat(b'\n') {
                    self.skip_blanks();
                }
                if self.lexer.eat(b')') {
                    break;
                }
                let w = self.word(WordOpts::NORMAL)?;
                if w.parts.is_empty() {
                    return Err(self.error(ErrorCode::BadAssignment));
                }
                items.push(w);
            }
            AssignValue::Array(items)
        } else {
            AssignValue::Scalar(self.word(WordOpts::ASSIGN_VALUE)?)
        };

        let end = self.lexer.here();
        Ok(Some(Assign { pos: name_pos, end, name, name_pos, append, value }))
    }

    fn try_redirect(&mut self) -> Result<Option<(Redirect, Option<HeredocSpec>)>> {
        let save = self.lexer.pos;
        let pos = self.lexer.here();

        let fd = if matches!(self.lexer.peek(), Some(b) if b.is_ascii_digit()) {
            let start = self.lexer.pos;
            while matches!(self.lexer.peek(), Some(b) if b.is_ascii_digit()) {
                self.lexer.bump();
            }
            let n: u32 = std::str::from_utf8(&self.lexer.bytes[start..self.lexer.pos]).unwrap().parse().unwrap_or(0);
            Some(FdSpec::Number(n))
        } else if self.lexer.peek() == Some(b'{') && self.variant != LangVariant::Posix {
            let start = self.lexer.pos + 1;
            let mut j = start;
            while matches!(self.lexer.bytes.get(j), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
                j += 1;
            }
            if j > start && self.lexer.bytes.get(j) == Some(&b'}') {
                let name = String::from_utf8_lossy(&self.lexer.bytes[start..j]).into_owned();
                self.lexer.pos = j + 1;
                Some(FdSpec::VarName(name))
            } else {
                None
            }
        } else {
            None
        };

        const CANDIDATES: &[&str] = &[
            "<<<", "<<-", "<<", "<&", "<>", "<", "&>>", "&>", ">>!", ">>|", ">>", ">&", ">|", ">", "&>!",
        ];
        let Some(m) = self.lexer.match_operator(CANDIDATES) else {
            self.lexer.pos = save;
            return Ok(None);
        };
        let op = match m.text {
            "<" => RedirOp::Less,
            ">" => RedirOp::Great,
            ">>" => RedirOp::DGreat,
            "<<" => RedirOp::LessLess,
            "<<-" => RedirOp::LessLessDash,
            "<<<" => RedirOp::LessLessLess,
            "<&" => RedirOp::LessAnd,
            ">&" => RedirOp::GreatAnd,
            "<>" => RedirOp::LessGreat,
            ">|" => RedirOp::Clobber,
            "&>" => RedirOp::AndGreat,
            "&>>" => RedirOp::AndDGreat,
            ">>!" => RedirOp::PipeLineOnlyDGreat,
            ">>|" => RedirOp::DGreatPipe,
            "&>!" => RedirOp::AndGreatBang,
            _ => unreachable!(),
        };

        if matches!(op, RedirOp::LessLessLess) {
            self.require_feature("herestring")?;
        }
        if matches!(op, RedirOp::AndGreat | RedirOp::AndDGreat | RedirOp::AndGreatBang) {
            self.require_feature("process substitution")?;
        }

        if matches!(op, RedirOp::LessLess | RedirOp::LessLessDash) {
            let dash = op == RedirOp::LessLessDash;
            self.skip_blanks();
            self.lexer.push_mode(Mode::HeredocWord);
            let word = self.word(WordOpts::HEREDOC_DELIM)?;
            self.lexer.pop_mode();
            let quoted = !word.is_all_lit();
            let delimiter_text = word_literal_text(&word);
            let end = self.lexer.here();
            let redirect = Redirect {
                pos,
                end,
                fd,
                op,
                target: RedirTarget::HereDoc(HereDoc { delimiter: word, dash, quoted, body: Word::default() }),
            };
            return Ok(Some((redirect, Some(HeredocSpec { delimiter: delimiter_text, dash }))));
        }

        self.skip_blanks();
        let target = self.word(WordOpts::NORMAL)?;
        let end = self.lexer.here();
        let redirect = Redirect { pos, end, fd, op, target: RedirTarget::Word(target) };
        Ok(Some((redirect, None)))
    }

    // -- compound commands --

    fn try_compound_command(&mut self) -> Result<Option<(Command, Vec<HDesc>)>> {
        self.skip_blanks();

        if self.lexer.peek() == Some(b'(') && self.lexer.peek_at(1) == Some(b'(') {
            let save = self.lexer.pos;
            self.lexer.bump();
            self.lexer.bump();
            self.require_feature("arithmetic command")?;
            self.lexer.push_mode(Mode::Arithm);
            let expr = self.arithm_expr(1)?;
            self.skip_arith_blanks();
            self.lexer.pop_mode();
            if !(self.lexer.eat(b')') && self.lexer.eat(b')')) {
                self.lexer.pos = save;
                return Err(self.error(ErrorCode::UnterminatedArithm));
            }
            return Ok(Some((Command::ArithmCmd(ArithmCmd { expr }), vec![])));
        }

        if self.lexer.peek() == Some(b'(') {
            self.lexer.bump();
            let body = self.stmt_list(&[])?;
            self.skip_separators();
            if !self.lexer.eat(b')') {
                return Err(self.error(ErrorCode::ExpectedToken(")")));
            }
            return Ok(Some((Command::Subshell(Subshell { body }), vec![])));
        }

        if self.lexer.peek() == Some(b'{') && matches!(self.lexer.peek_at(1), Some(b) if Lexer::is_blank_byte(b) || b == b'\n') {
            self.lexer.bump();
            let body = self.stmt_list(&["}"])?;
            self.skip_separators();
            if !self.try_reserved("}") {
                return Err(self.error(ErrorCode::ExpectedToken("}")));
            }
            return Ok(Some((Command::Block(Block { body }), vec![])));
        }

        if self.lexer.peek() == Some(b'[') && self.lexer.peek_at(1) == Some(b'[') {
            self.lexer.bump();
            self.lexer.bump();
            self.require_feature("[[ ]]")?;
            let expr = self.test_expr()?;
            self.skip_blanks();
            if !self.lexer.eat_str("]]") {
                return Err(self.error(ErrorCode::UnterminatedTest));
            }
            return Ok(Some((Command::TestClause(TestClause { expr }), vec![])));
        }

        if self.try_reserved("if") {
            return Ok(Some((self.if_clause()?, vec![])));
        }
        if self.try_reserved("while") {
            let cond = self.stmt_list(&["do"])?;
            self.expect_reserved("do")?;
            let body = self.stmt_list(&["done"])?;
            self.expect_reserved("done")?;
            return Ok(Some((Command::While(Loop { cond, body }), vec![])));
        }
        if self.try_reserved("until") {
            let cond = self.stmt_list(&["do"])?;
            self.expect_reserved("do")?;
            let body = self.stmt_list(&["done"])?;
            self.expect_reserved("done")?;
            return Ok(Some((Command::Until(Loop { cond, body }), vec![])));
        }
        if self.try_reserved("for") {
            return Ok(Some((self.for_clause()?, vec![])));
        }
        if self.try_reserved("select") {
            self.require_feature("select clause")?;
            return Ok(Some((self.select_clause()?, vec![])));
        }
        if self.try_reserved("case") {
            return Ok(Some((self.case_clause()?, vec![])));
        }
        if self.lexer.peek() == Some(b'@') && self.lexer.bytes[self.lexer.pos..].starts_with(b"@test") {
            return Ok(Some(self.test_decl()?));
        }
        if self.try_reserved("function") {
            return Ok(Some((self.func_decl_keyword()?, vec![])));
        }
        if self.try_reserved("time") {
            self.require_feature("time clause")?;
            return Ok(Some(self.time_clause()?));
        }
        if self.try_reserved("coproc") {
            self.require_feature("coprocess")?;
            return Ok(Some(self.coproc_clause()?));
        }
        if self.try_reserved("let") {
            self.require_feature("let clause")?;
            return Ok(Some((self.let_clause()?, vec![])));
        }
        if let Some(variant) = self.peek_decl_variant() {
            return Ok(Some((self.decl_clause(variant)?, vec![])));
        }
        if let Some(func) = self.try_posix_func_decl()? {
            return Ok(Some((func, vec![])));
        }

        Ok(None)
    }

    fn expect_reserved(&mut self, word: &'static str) -> Result<()> {
        self.skip_separators();
        if self.try_reserved(word) {
            Ok(())
        } else {
            Err(self.error(ErrorCode::ExpectedToken(word)))
        }
    }

    fn if_clause(&mut self) -> Result<Command> {
        let cond = self.stmt_list(&["then"])?;
        self.expect_reserved("then")?;
        let body = self.stmt_list(&["elif", "else", "fi"])?;
        let mut elifs = Vec::new();
        loop {
            self.skip_separators();
            if !self.try_reserved("elif") {
                break;
            }
            let cond = self.stmt_list(&["then"])?;
            self.expect_reserved("then")?;
            let body = self.stmt_list(&["elif", "else", "fi"])?;
            elifs.push(Elif { cond, body });
        }
        self.skip_separators();
        let else_body = if self.try_reserved("else") {
            Some(self.stmt_list(&["fi"])?)
        } else {
            None
        };
        self.expect_reserved("fi")?;
        Ok(Command::If(IfClause { cond, body, elifs, else_body }))
    }

    fn for_clause(&mut self) -> Result<Command> {
        self.skip_blanks();
        if self.lexer.peek() == Some(b'(') && self.lexer.peek_at(1) == Some(b'(') {
            self.require_feature("C-style for")?;
            self.lexer.bump();
            self.lexer.bump();
            self.lexer.push_mode(Mode::Arithm);
            let init = self.maybe_arith_expr(b';')?;
            self.expect_arith_semi()?;
            let cond = self.maybe_arith_expr(b';')?;
            self.expect_arith_semi()?;
            let post = self.maybe_arith_expr(b')')?;
            self.lexer.pop_mode();
            if !(self.lexer.eat(b')') && self.lexer.eat(b')')) {
                return Err(self.error(ErrorCode::UnterminatedArithm));
            }
            self.skip_separators();
            self.expect_reserved("do")?;
            let body = self.stmt_list(&["done"])?;
            self.expect_reserved("done")?;
            return Ok(Command::For(ForClause { kind: ForKind::CStyle { init, cond, post }, body }));
        }

        let name_pos = self.lexer.here();
        let Some((name, len)) = self.peek_bare_word() else {
            return Err(self.error(ErrorCode::InvalidName(String::new())));
        };
        self.skip_blanks();
        for _ in 0..len {
            self.lexer.bump();
        }
        self.skip_separators();
        let words = if self.try_reserved("in") {
            let mut ws = Vec::new();
            loop {
                self.skip_blanks();
                if self.at_stmt_boundary() || matches!(self.lexer.peek(), Some(b'\n')) {
                    break;
                }
                let w = self.word(WordOpts::NORMAL)?;
                if w.parts.is_empty() {
                    break;
                }
                ws.push(w);
            }
            Some(ws)
        } else {
            None
        };
        self.skip_separators();
        self.expect_reserved("do")?;
        let body = self.stmt_list(&["done"])?;
        self.expect_reserved("done")?;
        Ok(Command::For(ForClause { kind: ForKind::Words { name, name_pos, words }, body }))
    }

    fn maybe_arith_expr(&mut self, stop: u8) -> Result<Option<ArithmExpr>> {
        self.skip_arith_blanks();
        if self.lexer.peek() == Some(stop) {
            return Ok(None);
        }
        Ok(Some(self.arithm_expr(1)?))
    }

    fn expect_arith_semi(&mut self) -> Result<()> {
        self.skip_arith_blanks();
        if self.lexer.eat(b';') {
            Ok(())
        } else {
            Err(self.error(ErrorCode::ExpectedToken(";")))
        }
    }

    fn select_clause(&mut self) -> Result<Command> {
        let name_pos = self.lexer.here();
        let Some((name, len)) = self.peek_bare_word() else {
            return Err(self.error(ErrorCode::InvalidName(String::new())));
        };
        self.skip_blanks();
        for _ in 0..len {
            self.lexer.bump();
        }
        self.skip_separators();
        let words = if self.try_reserved("in") {
            let mut ws = Vec::new();
            loop {
                self.skip_blanks();
                if self.at_stmt_boundary() || matches!(self.lexer.peek(), Some(b'\n')) {
                    break;
                }
                let w = self.word(WordOpts::NORMAL)?;
                if w.parts.is_empty() {
                    break;
                }
                ws.push(w);
            }
            Some(ws)
        } else {
            None
        };
        self.skip_separators();
        self.expect_reserved("do")?;
        let body = self.stmt_list(&["done"])?;
        self.expect_reserved("done")?;
        Ok(Command::Select(SelectClause { name, name_pos, words, body }))
    }

    fn case_clause(&mut self) -> Result<Command> {
        let subject = self.word(WordOpts::NORMAL)?;
        self.skip_separators();
        self.expect_reserved("in")?;
        self.skip_separators();

        let mut items = Vec::new();
        while !self.at_reserved(&["esac"]) && !self.lexer.is_eof() {
            let has_open_paren = self.lexer.eat(b'(');
            self.skip_blanks();
            let mut patterns = vec![self.word(WordOpts::CASE_PATTERN)?];
            self.skip_blanks();
            while self.lexer.eat(b'|') {
                self.skip_blanks();
                patterns.push(self.word(WordOpts::CASE_PATTERN)?);
                self.skip_blanks();
            }
            if !self.lexer.eat(b')') {
                return Err(self.error(ErrorCode::ExpectedToken(")")));
            }
            self.skip_separators();
            let body = self.stmt_list(&["esac"])?;
            self.skip_separators();
            let terminator = if self.lexer.eat_str(";;&") {
                Some(CaseOp::Continue)
            } else if self.lexer.eat_str(";&") {
                Some(CaseOp::Fallthrough)
            } else if self.lexer.eat_str(";;") {
                Some(CaseOp::Break)
            } else {
                None
            };
            items.push(CaseItem { patterns, body, terminator, has_open_paren });
            self.skip_separators();
        }
        self.expect_reserved("esac")?;
        Ok(Command::Case(CaseClause { subject, items }))
    }

    fn test_decl(&mut self) -> Result<(Command, Vec<HDesc>)> {
        self.require_feature("@test")?;
        self.lexer.pos += "@test".len();
        self.skip_blanks();
        let description = self.word(WordOpts::NORMAL)?;
        self.skip_blanks();
        let body_pos = self.lexer.here();
        let (body_command, mut descs) = self.try_compound_command()?.ok_or_else(|| self.error(ErrorCode::ExpectedToken("{")))?;
        let end = self.lexer.here();
        let body = Stmt {
            pos: body_pos,
            end,
            negated: false,
            command: Some(body_command),
            assigns: vec![],
            redirects: vec![],
            terminator: Terminator::None,
            comments: vec![],
            inline_comment: None,
        };
        for d in &mut descs {
            d.path.insert(0, HPath::TestDeclBody);
        }
        Ok((Command::TestDecl(TestDecl { description, body: Box::new(body) }), descs))
    }

    fn func_decl_keyword(&mut self) -> Result<Command> {
        let name_pos = self.lexer.here();
        let mut names = Vec::new();
        loop {
            self.skip_blanks();
            if self.lexer.peek() == Some(b'(') || self.lexer.peek() == Some(b'{') {
                break;
            }
            let Some((name, len)) = self.peek_bare_word() else { break };
            for _ in 0..len {
                self.lexer.bump();
            }
            names.push(name);
            if self.variant != LangVariant::Zsh {
                break;
            }
        }
        if names.len() > 1 {
            self.require_feature("zsh multi-name function declaration")?;
        }
        if names.is_empty() && self.variant == LangVariant::Zsh {
            self.require_feature("zsh anonymous function")?;
        }

        self.skip_blanks();
        let has_parens = self.lexer.eat_str("()");
        self.skip_separators();
        let body_pos = self.lexer.here();
        let body = self.compound_command_required()?;
        let end = self.lexer.here();
        let style = if names.is_empty() { FuncStyle::Anonymous } else { FuncStyle::Keyword };
        Ok(Command::FuncDecl(FuncDecl {
            names,
            name_pos,
            has_parens,
            style,
            body: Box::new(Stmt {
                pos: body_pos,
                end,
                negated: false,
                command: Some(body),
                assigns: vec![],
                redirects: vec![],
                terminator: Terminator::None,
                comments: vec![],
                inline_comment: None,
            }),
        }))
    }

    fn try_posix_func_decl(&mut self) -> Result<Option<Command>> {
        let save = self.lexer.pos;
        let name_pos = self.lexer.here();
        let Some((name, len)) = self.peek_bare_word() else { return Ok(None) };
        if RESERVED_WORDS.contains(&name.as_str()) {
            return Ok(None);
        }
        self.skip_blanks();
        for _ in 0..len {
            self.lexer.bump();
        }
        self.skip_blanks();
        if !self.lexer.eat_str("()") {
            self.lexer.pos = save;
            return Ok(None);
        }
        self.skip_separators();
        let body_pos = self.lexer.here();
        let body = self.compound_command_required()?;
        let end = self.lexer.here();
        Ok(Some(Command::FuncDecl(FuncDecl {
            names: vec![name],
            name_pos,
            has_parens: true,
            style: FuncStyle::Posix,
            body: Box::new(Stmt {
                pos: body_pos,
                end,
                negated: false,
                command: Some(body),
                assigns: vec![],
                redirects: vec![],
                terminator: Terminator::None,
                comments: vec![],
                inline_comment: None,
            }),
        })))
    }

    fn compound_command_required(&mut self) -> Result<Command> {
        self.try_compound_command()?.map(|(c, _)| c).ok_or_else(|| self.error(ErrorCode::ExpectedToken("compound command")))
    }

    fn time_clause(&mut self) -> Result<(Command, Vec<HDesc>)> {
        self.skip_blanks();
        let posix = self.try_reserved("-p");
        self.skip_blanks();
        if self.at_stmt_boundary() || matches!(self.lexer.peek(), Some(b'\n')) || self.lexer.is_eof() {
            return Ok((Command::TimeClause(TimeClause { posix, command: None }), vec![]));
        }
        let (stmt, mut descs) = self.pipeline()?;
        for d in &mut descs {
            d.path.insert(0, HPath::TimeCommand);
        }
        Ok((Command::TimeClause(TimeClause { posix, command: Some(Box::new(stmt)) }), descs))
    }

    fn coproc_clause(&mut self) -> Result<(Command, Vec<HDesc>)> {
        self.skip_blanks();
        let save = self.lexer.pos;
        let name = if let Some((word, len)) = self.peek_bare_word() {
            let is_identifier = word.bytes().enumerate().all(|(i, b)| {
                if i == 0 {
                    b == b'_' || b.is_ascii_alphabetic()
                } else {
                    b == b'_' || b.is_ascii_alphanumeric()
                }
            });
            if is_identifier && !word.is_empty() {
                for _ in 0..len {
                    self.lexer.bump();
                }
                self.skip_blanks();
                let looks_like_compound = matches!(self.lexer.peek(), Some(b'{') | Some(b'('))
                    || self.at_reserved(&["if", "while", "until", "for", "select", "case", "function"]);
                if looks_like_compound {
                    Some(word)
                } else {
                    self.lexer.pos = save;
                    None
                }
            } else {
                None
            }
        } else {
            None
        };
        let (body, mut descs) = self.compound_or_simple()?;
        for d in &mut descs {
            d.path.insert(0, HPath::CoprocBody);
        }
        Ok((Command::CoprocClause(CoprocClause { name, body: Box::new(body) }), descs))
    }

    fn let_clause(&mut self) -> Result<Command> {
        self.lexer.push_mode(Mode::ArithmCmdLetCompact);
        let mut exprs = Vec::new();
        loop {
            self.skip_blanks();
            if self.at_stmt_boundary() || matches!(self.lexer.peek(), Some(b'\n')) || self.lexer.is_eof() {
                break;
            }
            exprs.push(self.arithm_expr(1)?);
        }
        self.lexer.pop_mode();
        if exprs.is_empty() {
            return Err(self.error(ErrorCode::ExpectedToken("arithmetic expression")));
        }
        Ok(Command::LetClause(LetClause { exprs }))
    }

    fn peek_decl_variant(&mut self) -> Option<DeclVariant> {
        let (word, _) = self.peek_bare_word()?;
        let variant = match word.as_str() {
            "declare" => DeclVariant::Declare,
            "typeset" => DeclVariant::Typeset,
            "export" => DeclVariant::Export,
            "readonly" => DeclVariant::Readonly,
            "nameref" => DeclVariant::Nameref,
            "local" => DeclVariant::Local,
            _ => return None,
        };
        if matches!(variant, DeclVariant::Declare | DeclVariant::Typeset | DeclVariant::Nameref | DeclVariant::Local)
            && self.variant == LangVariant::Posix
        {
            return None;
        }
        Some(variant)
    }

    fn decl_clause(&mut self, variant: DeclVariant) -> Result<Command> {
        let word = match variant {
            DeclVariant::Declare => "declare",
            DeclVariant::Typeset => "typeset",
            DeclVariant::Export => "export",
            DeclVariant::Readonly => "readonly",
            DeclVariant::Nameref => "nameref",
            DeclVariant::Local => "local",
        };
        self.try_reserved(word);
        let mut args = Vec::new();
        loop {
            self.skip_blanks();
            if self.at_stmt_boundary() || matches!(self.lexer.peek(), Some(b'\n')) || self.lexer.is_eof() {
                break;
            }
            if let Some(assign) = self.try_assignment()? {
                args.push(DeclArg::Assign(assign));
                continue;
            }
            let w = self.word(WordOpts::NORMAL)?;
            if w.parts.is_empty() {
                break;
            }
            args.push(DeclArg::Word(w));
        }
        Ok(Command::DeclClause(DeclClause { variant, args }))
    }
}

fn heredoc_path_mut<'a>(stmt: &'a mut Stmt, path: &[HPath]) -> &'a mut Stmt {
    let Some((first, rest)) = path.split_first() else { return stmt };
    let next = match (first, &mut stmt.command) {
        (HPath::BinaryLhs, Some(Command::Binary(bin))) => bin.lhs.as_mut(),
        (HPath::BinaryRhs, Some(Command::Binary(bin))) => bin.rhs.as_mut(),
        (HPath::TimeCommand, Some(Command::TimeClause(tc))) => {
            tc.command.as_mut().expect("heredoc patch pointed at an absent time command").as_mut()
        }
        (HPath::CoprocBody, Some(Command::CoprocClause(cc))) => cc.body.as_mut(),
        (HPath::TestDeclBody, Some(Command::TestDecl(td))) => td.body.as_mut(),
        _ => panic!("heredoc patch did not match the command variant it was recorded against"),
    };
    heredoc_path_mut(next, rest)
}

/// Best-effort literal reconstruction of a heredoc delimiter for terminator
/// matching: quoted parts contribute their raw text with quoting removed.
fn word_literal_text(word: &Word) -> String {
    let mut out = String::new();
    for part in &word.parts {
        match part {
            WordPart::Lit(s) => out.push_str(s),
            WordPart::SglQuoted(s) | WordPart::DollarSglQuoted(s) => out.push_str(s),
            WordPart::DblQuoted(text) | WordPart::DollarDblQuoted(text) => {
                for unit in &text.0 {
                    match unit {
                        TextUnit::Lit(s) => out.push_str(s),
                        TextUnit::Backslashed(c) => out.push(*c),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LangVariant;
    use std::io::Cursor;

    #[test]
    fn stop_at_leaves_prefix_unconsumed() {
        let file = Parser::new(b"echo hi\n%%END\nmore", LangVariant::Bash).stop_at(*b"%%END").parse_file("").unwrap();
        assert_eq!(file.statements.len(), 1);
    }

    #[test]
    fn stop_at_does_not_trip_on_unrelated_trailing_bytes() {
        let err = Parser::new(b"echo hi\n)", LangVariant::Bash).stop_at(*b"%%END").parse_file("").unwrap_err();
        assert!(matches!(err.code, ErrorCode::UnexpectedToken { .. }));
    }

    #[test]
    fn interactive_waits_for_matching_fi() {
        let input = Cursor::new(b"if true\nthen\n  echo a\nfi\n".to_vec());
        let mut batches: Vec<usize> = Vec::new();
        Parser::interactive(input, LangVariant::Bash, |stmts| batches.push(stmts.len())).unwrap();
        assert_eq!(batches, vec![1]);
    }

    #[test]
    fn interactive_flushes_each_complete_statement_separately() {
        let input = Cursor::new(b"echo a\necho b\n".to_vec());
        let mut batches: Vec<usize> = Vec::new();
        Parser::interactive(input, LangVariant::Bash, |stmts| batches.push(stmts.len())).unwrap();
        assert_eq!(batches, vec![1, 1]);
    }

    #[test]
    fn interactive_waits_for_heredoc_terminator() {
        let input = Cursor::new(b"cat <<EOF\nbody\nEOF\n".to_vec());
        let mut batches: Vec<usize> = Vec::new();
        Parser::interactive(input, LangVariant::Bash, |stmts| batches.push(stmts.len())).unwrap();
        assert_eq!(batches, vec![1]);
    }

    #[test]
    fn interactive_reports_real_syntax_errors() {
        let input = Cursor::new(b"fi\n".to_vec());
        let err = Parser::interactive(input, LangVariant::Bash, |_| {}).unwrap_err();
        assert!(matches!(err, InteractiveError::Parse(_)));
    }

    #[test]
    fn heredoc_inside_time_clause_body_is_filled() {
        let src = b"time cat <<EOF\nbody\nEOF\n";
        let file = Parser::new(src, LangVariant::Bash).parse_file("").unwrap();
        let Some(Command::TimeClause(tc)) = &file.statements[0].command else { panic!("expected a time clause") };
        let inner = tc.command.as_ref().unwrap();
        let Some(Command::Call(_)) = &inner.command else { panic!("expected a call") };
        let RedirTarget::HereDoc(hd) = &inner.redirects[0].target else { panic!("expected a heredoc") };
        assert_eq!(word_literal_text(&hd.body), "body\n");
    }

    #[test]
    fn heredoc_inside_coproc_body_is_filled() {
        let src = b"coproc cat <<EOF\nbody\nEOF\n";
        let file = Parser::new(src, LangVariant::Bash).parse_file("").unwrap();
        let Some(Command::CoprocClause(cc)) = &file.statements[0].command else { panic!("expected a coproc clause") };
        let RedirTarget::HereDoc(hd) = &cc.body.redirects[0].target else { panic!("expected a heredoc") };
        assert_eq!(word_literal_text(&hd.body), "body\n");
    }

    #[test]
    fn heredoc_inside_test_decl_body_is_filled() {
        let src = b"@test \"name\" {\ncat <<EOF\nbody\nEOF\n}\n";
        let file = Parser::new(src, LangVariant::Bats).parse_file("").unwrap();
        let Some(Command::TestDecl(td)) = &file.statements[0].command else { panic!("expected a test decl") };
        let Some(Command::Block(block)) = &td.body.command else { panic!("expected a block") };
        let RedirTarget::HereDoc(hd) = &block.body[0].redirects[0].target else { panic!("expected a heredoc") };
        assert_eq!(word_literal_text(&hd.body), "body\n");
    }
}
