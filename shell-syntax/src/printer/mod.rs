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

//! The tree-walking printer.
//!
//! [`Printer`] walks a [`File`]/[`Stmt`]/[`Word`]/[`Command`] and re-emits
//! shell source under a configurable [`PrinterOptions`]. It owns its own
//! indent level and a small queue of here-document bodies deferred until
//! the end of the logical line that introduced them, mirroring how
//! [`crate::parser`] defers the same bodies on the read side: a command's
//! redirections are printed as it is walked, but a heredoc's body text is
//! queued and flushed only once the statement's terminator and trailing
//! comment have been written, just before the newline that starts the next
//! statement.
//!
//! The printer never mutates the tree it is given; [`Printer::reset`] is
//! the only sanctioned way to reuse one `Printer` value across independent
//! trees.

mod arith;
mod command;
mod options;
mod test_expr;
mod word;

pub use options::PrinterOptions;

use std::io;

use crate::syntax::{Assign, AssignValue, Command, Comment, File, HereDoc, Redirect, RedirTarget, Stmt, Terminator, Word};

/// Any of the four node kinds [`Printer::print`] accepts.
#[derive(Clone, Copy, Debug)]
pub enum Printable<'a> {
    File(&'a File),
    Stmt(&'a Stmt),
    Word(&'a Word),
    Command(&'a Command),
}

impl<'a> From<&'a File> for Printable<'a> {
    fn from(f: &'a File) -> Self {
        Printable::File(f)
    }
}

impl<'a> From<&'a Stmt> for Printable<'a> {
    fn from(s: &'a Stmt) -> Self {
        Printable::Stmt(s)
    }
}

impl<'a> From<&'a Word> for Printable<'a> {
    fn from(w: &'a Word) -> Self {
        Printable::Word(w)
    }
}

impl<'a> From<&'a Command> for Printable<'a> {
    fn from(c: &'a Command) -> Self {
        Printable::Command(c)
    }
}

/// Reusable tree-to-bytes printer. Holds only its own option set and the
/// transient state of one `print` call (indent level, pending heredocs);
/// [`Printer::reset`] clears the latter so the same value can be reused for
/// an unrelated tree.
#[derive(Clone, Debug)]
pub struct Printer {
    options: PrinterOptions,
    indent: u32,
    pending_heredocs: Vec<HereDoc>,
    column: u32,
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new()
    }
}

impl Printer {
    /// Creates a printer with the default style options.
    #[must_use]
    pub fn new() -> Self {
        Printer {
            options: PrinterOptions::new(),
            indent: 0,
            pending_heredocs: Vec::new(),
            column: 0,
        }
    }

    /// Creates a printer with an explicit option set.
    #[must_use]
    pub fn with_options(options: PrinterOptions) -> Self {
        Printer {
            options,
            indent: 0,
            pending_heredocs: Vec::new(),
            column: 0,
        }
    }

    /// Returns this printer to a pristine state: indent level back to zero
    /// and any leftover pending heredocs (there should never be any once a
    /// `print` call returns cleanly) dropped. The option set is unchanged.
    pub fn reset(&mut self) {
        self.indent = 0;
        self.pending_heredocs.clear();
        self.column = 0;
    }

    /// Prints `node` to `w`.
    pub fn print<'a, W, N>(&mut self, w: &mut W, node: N) -> io::Result<()>
    where
        W: io::Write,
        N: Into<Printable<'a>>,
    {
        match node.into() {
            Printable::File(file) => self.print_file(w, file),
            Printable::Stmt(stmt) => self.print_stmt(w, stmt),
            Printable::Word(word) => self.print_word(w, word),
            Printable::Command(command) => self.print_command(w, command),
        }
    }

    fn print_file<W: io::Write>(&mut self, w: &mut W, file: &File) -> io::Result<()> {
        for stmt in &file.statements {
            self.print_stmt(w, stmt)?;
        }
        if self.options.keep_comments && !self.options.minify {
            for comment in &file.trailing_comments {
                self.write_indent(w)?;
                self.print_comment(w, comment)?;
                self.newline(w)?;
            }
        }
        Ok(())
    }

    // -- low-level output primitives --

    fn write_str<W: io::Write>(&mut self, w: &mut W, s: &str) -> io::Result<()> {
        w.write_all(s.as_bytes())?;
        match s.rfind('\n') {
            Some(i) => self.column = (s.len() - i - 1) as u32,
            None => self.column += s.len() as u32,
        }
        Ok(())
    }

    /// Separator between two statements. Always a real newline: a bare
    /// space wouldn't separate two simple commands (`echo a echo b` is one
    /// command, not two), so minify gains nothing by changing this.
    fn newline<W: io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\n")?;
        self.column = 0;
        Ok(())
    }

    fn write_indent<W: io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.options.minify {
            return Ok(());
        }
        if self.options.indent == 0 {
            for _ in 0..self.indent {
                self.write_str(w, "\t")?;
            }
        } else {
            for _ in 0..self.indent * self.options.indent {
                self.write_str(w, " ")?;
            }
        }
        Ok(())
    }

    fn print_comment<W: io::Write>(&mut self, w: &mut W, comment: &Comment) -> io::Result<()> {
        self.write_str(w, "#")?;
        self.write_str(w, &comment.text)
    }

    // -- statements --

    fn print_stmt<W: io::Write>(&mut self, w: &mut W, stmt: &Stmt) -> io::Result<()> {
        let keep_comments = self.options.keep_comments && !self.options.minify;
        if keep_comments {
            for comment in &stmt.comments {
                self.write_indent(w)?;
                self.print_comment(w, comment)?;
                self.newline(w)?;
            }
        }
        self.write_indent(w)?;
        self.print_stmt_body(w, stmt)?;
        self.print_terminator(w, stmt.terminator)?;
        if keep_comments {
            if let Some(inline) = &stmt.inline_comment {
                self.write_inline_comment_padding(w)?;
                self.print_comment(w, inline)?;
            }
        }
        self.newline(w)?;
        self.flush_pending_heredocs(w)
    }

    fn write_inline_comment_padding<W: io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.options.keep_padding {
            // Pad out to the next multiple of 8 columns, a single-pass
            // approximation of aligning inline comments across adjacent
            // statements without a second pass over the whole block.
            let target = (self.column / 8 + 1) * 8;
            while self.column < target {
                self.write_str(w, " ")?;
            }
            Ok(())
        } else {
            self.write_str(w, " ")
        }
    }

    fn print_terminator<W: io::Write>(&mut self, w: &mut W, terminator: Terminator) -> io::Result<()> {
        match terminator {
            // One statement per line already separates it from the next;
            // an explicit `;` here would be redundant (e.g. `"foo; bar"`
            // prints as `"foo\nbar\n"`).
            Terminator::None | Terminator::Semicolon => Ok(()),
            Terminator::Background => self.write_str(w, " &"),
            Terminator::Coproc => self.write_str(w, " |&"),
        }
    }

    /// Prints a statement's negation, assignments, command and redirections
    /// without its terminator, comments, or trailing newline -- the shape
    /// needed both at top level (wrapped by [`Printer::print_stmt`]) and
    /// inside a pipeline/`&&`/`||` chain, where the outer [`Stmt`] owns
    /// those.
    pub(crate) fn print_stmt_body<W: io::Write>(&mut self, w: &mut W, stmt: &Stmt) -> io::Result<()> {
        let mut wrote = false;
        if stmt.negated {
            self.write_str(w, "!")?;
            wrote = true;
        }
        for assign in &stmt.assigns {
            if wrote {
                self.write_str(w, " ")?;
            }
            self.print_assign(w, assign)?;
            wrote = true;
        }
        if let Some(command) = &stmt.command {
            if wrote {
                self.write_str(w, " ")?;
            }
            self.print_command(w, command)?;
            wrote = true;
        }
        for redirect in &stmt.redirects {
            if wrote {
                self.write_str(w, " ")?;
            }
            self.print_redirect(w, redirect)?;
            wrote = true;
        }
        Ok(())
    }

    pub(crate) fn print_assign<W: io::Write>(&mut self, w: &mut W, assign: &Assign) -> io::Result<()> {
        self.write_str(w, &assign.name)?;
        self.write_str(w, if assign.append { "+=" } else { "=" })?;
        match &assign.value {
            AssignValue::Scalar(word) => self.print_word(w, word),
            AssignValue::Array(words) => {
                self.write_str(w, "(")?;
                self.print_word_list(w, words)?;
                self.write_str(w, ")")
            }
        }
    }

    fn print_redirect<W: io::Write>(&mut self, w: &mut W, redirect: &Redirect) -> io::Result<()> {
        if let Some(fd) = &redirect.fd {
            match fd {
                crate::syntax::FdSpec::Number(n) => self.write_str(w, &n.to_string())?,
                crate::syntax::FdSpec::VarName(name) => {
                    self.write_str(w, "{")?;
                    self.write_str(w, name)?;
                    self.write_str(w, "}")?;
                }
            }
        }
        self.write_str(w, redirect.op.as_str())?;
        if self.options.space_redirects {
            self.write_str(w, " ")?;
        }
        match &redirect.target {
            RedirTarget::Word(word) => self.print_word(w, word),
            RedirTarget::HereDoc(heredoc) => {
                self.print_word(w, &heredoc.delimiter)?;
                self.pending_heredocs.push(heredoc.clone());
                Ok(())
            }
        }
    }

    fn flush_pending_heredocs<W: io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending_heredocs);
        for heredoc in &pending {
            if let Some(text) = heredoc.body.as_lit() {
                w.write_all(text.as_bytes())?;
            }
            if heredoc.dash {
                self.write_indent(w)?;
            }
            self.write_str(w, heredoc.delimiter_text())?;
            self.newline(w)?;
        }
        Ok(())
    }

    // -- statement lists --

    /// Prints a sequence of statements joined on one logical line
    /// (`cond` lists, and command/process-substitution bodies), each
    /// separated by its own terminator spelling (or `"; "` when a
    /// statement has no explicit terminator but is not the last one).
    pub(crate) fn print_stmt_list_inline<W: io::Write>(&mut self, w: &mut W, stmts: &[Stmt]) -> io::Result<()> {
        for (i, stmt) in stmts.iter().enumerate() {
            if i > 0 {
                self.write_str(w, " ")?;
            }
            self.print_stmt_body(w, stmt)?;
            match stmt.terminator {
                Terminator::None => {
                    if i + 1 < stmts.len() {
                        self.write_str(w, ";")?;
                    }
                }
                Terminator::Semicolon => self.write_str(w, ";")?,
                Terminator::Background => self.write_str(w, " &")?,
                Terminator::Coproc => self.write_str(w, " |&")?,
            }
        }
        Ok(())
    }

    /// Prints `cond` inline, then the separator and reserved word that
    /// follows it (`"; then"`, `"; do"`), reusing the condition's own
    /// terminator instead of unconditionally inserting a `;` that would
    /// double up with one already present.
    pub(crate) fn print_cond_then<W: io::Write>(&mut self, w: &mut W, cond: &[Stmt], keyword: &str) -> io::Result<()> {
        self.print_stmt_list_inline(w, cond)?;
        let needs_semicolon = !matches!(
            cond.last().map(|s| s.terminator),
            Some(Terminator::Semicolon | Terminator::Background | Terminator::Coproc)
        );
        if needs_semicolon {
            self.write_str(w, "; ")?;
        } else {
            self.write_str(w, " ")?;
        }
        self.write_str(w, keyword)
    }
}

impl HereDoc {
    /// The delimiter's literal text for the terminator line, stripped of
    /// whatever quoting it carried in the source: the terminator match
    /// compares literal/joined text, never the quoted spelling.
    fn delimiter_text(&self) -> String {
        use crate::syntax::WordPart;
        self.delimiter
            .parts
            .iter()
            .map(|p| match p {
                WordPart::Lit(s) | WordPart::SglQuoted(s) | WordPart::DollarSglQuoted(s) => s.clone(),
                WordPart::DblQuoted(text) | WordPart::DollarDblQuoted(text) => text
                    .0
                    .iter()
                    .map(|u| match u {
                        crate::syntax::TextUnit::Lit(s) => s.clone(),
                        crate::syntax::TextUnit::Backslashed(c) => c.to_string(),
                        _ => String::new(),
                    })
                    .collect(),
                _ => String::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::token::LangVariant;

    fn format(src: &str, variant: LangVariant) -> String {
        let file = Parser::new(src.as_bytes(), variant).parse_file("").unwrap();
        let mut out = Vec::new();
        Printer::new().print(&mut out, &file).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn simple_sequence_becomes_one_statement_per_line() {
        assert_eq!(format("foo; bar", LangVariant::Posix), "foo\nbar\n");
    }

    #[test]
    fn if_then_collapses_onto_one_header_line() {
        assert_eq!(
            format("if a\nthen b\nfi", LangVariant::Posix),
            "if a; then\n\tb\nfi\n"
        );
    }

    #[test]
    fn heredoc_body_reproduced_after_command_line() {
        assert_eq!(
            format("foo <<EOF\nbar\nEOF", LangVariant::Posix),
            "foo <<EOF\nbar\nEOF\n"
        );
    }

    #[test]
    fn pipeline_stays_on_one_line() {
        assert_eq!(format("foo|bar", LangVariant::Posix), "foo | bar\n");
    }

    #[test]
    fn background_terminator_preserved() {
        assert_eq!(format("foo &", LangVariant::Posix), "foo &\n");
    }

    #[test]
    fn indent_option_uses_spaces() {
        let file = Parser::new(b"if a\nthen b\nfi", LangVariant::Posix).parse_file("").unwrap();
        let mut out = Vec::new();
        Printer::with_options(PrinterOptions::new().indent(2))
            .print(&mut out, &file)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "if a; then\n  b\nfi\n");
    }

    #[test]
    fn reset_clears_indent_state() {
        let mut printer = Printer::new();
        printer.indent = 3;
        printer.reset();
        assert_eq!(printer.indent, 0);
    }
}
