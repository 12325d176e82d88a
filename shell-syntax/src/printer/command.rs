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

//! Printing for the closed set of [`Command`] variants.

use std::io;

use crate::printer::Printer;
use crate::syntax::{
    Call, Command, DeclArg, ForKind, FuncStyle, ParamExpansion, RedirTarget, Stmt, Text, TextUnit,
    Word, WordPart,
};

impl Printer {
    pub(crate) fn print_command<W: io::Write>(&mut self, w: &mut W, command: &Command) -> io::Result<()> {
        match command {
            Command::Call(call) => self.print_call(w, call),
            Command::Subshell(s) => {
                self.write_str(w, "(")?;
                self.print_block_body(w, &s.body)?;
                self.write_str(w, ")")
            }
            Command::Block(b) => {
                self.write_str(w, "{")?;
                self.print_block_body(w, &b.body)?;
                self.write_str(w, "}")
            }
            Command::If(clause) => {
                self.write_str(w, "if ")?;
                self.print_cond_then(w, &clause.cond, "then")?;
                self.print_block_body(w, &clause.body)?;
                for elif in &clause.elifs {
                    self.write_str(w, "elif ")?;
                    self.print_cond_then(w, &elif.cond, "then")?;
                    self.print_block_body(w, &elif.body)?;
                }
                if let Some(else_body) = &clause.else_body {
                    self.write_str(w, "else")?;
                    self.print_block_body(w, else_body)?;
                }
                self.write_str(w, "fi")
            }
            Command::While(l) => {
                self.write_str(w, "while ")?;
                self.print_cond_then(w, &l.cond, "do")?;
                self.print_block_body(w, &l.body)?;
                self.write_str(w, "done")
            }
            Command::Until(l) => {
                self.write_str(w, "until ")?;
                self.print_cond_then(w, &l.cond, "do")?;
                self.print_block_body(w, &l.body)?;
                self.write_str(w, "done")
            }
            Command::For(f) => {
                self.write_str(w, "for ")?;
                match &f.kind {
                    ForKind::Words { name, words, .. } => {
                        self.write_str(w, name)?;
                        if let Some(words) = words {
                            self.write_str(w, " in ")?;
                            self.print_word_list(w, words)?;
                        }
                    }
                    ForKind::CStyle { init, cond, post } => {
                        self.write_str(w, "((")?;
                        if let Some(init) = init {
                            self.print_arithm(w, init)?;
                        }
                        self.write_str(w, "; ")?;
                        if let Some(cond) = cond {
                            self.print_arithm(w, cond)?;
                        }
                        self.write_str(w, "; ")?;
                        if let Some(post) = post {
                            self.print_arithm(w, post)?;
                        }
                        self.write_str(w, "))")?;
                    }
                }
                self.write_str(w, "; do")?;
                self.print_block_body(w, &f.body)?;
                self.write_str(w, "done")
            }
            Command::Select(s) => {
                self.write_str(w, "select ")?;
                self.write_str(w, &s.name)?;
                if let Some(words) = &s.words {
                    self.write_str(w, " in ")?;
                    self.print_word_list(w, words)?;
                }
                self.write_str(w, "; do")?;
                self.print_block_body(w, &s.body)?;
                self.write_str(w, "done")
            }
            Command::Case(c) => {
                self.write_str(w, "case ")?;
                self.print_word(w, &c.subject)?;
                self.write_str(w, " in")?;
                self.newline(w)?;
                self.indent += 1;
                if self.options.switch_case_indent {
                    self.indent += 1;
                }
                for item in &c.items {
                    self.write_indent(w)?;
                    if item.has_open_paren {
                        self.write_str(w, "(")?;
                    }
                    self.print_word_list_piped(w, &item.patterns)?;
                    self.write_str(w, ")")?;
                    self.newline(w)?;
                    self.indent += 1;
                    for stmt in &item.body {
                        self.print_stmt(w, stmt)?;
                    }
                    if let Some(op) = item.terminator {
                        self.write_indent(w)?;
                        self.write_str(w, op.as_str())?;
                        self.newline(w)?;
                    }
                    self.indent -= 1;
                }
                if self.options.switch_case_indent {
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.write_indent(w)?;
                self.write_str(w, "esac")
            }
            Command::Binary(b) => {
                self.print_stmt_body(w, &b.lhs)?;
                match b.op {
                    crate::token::BinaryCmdOp::Pipe | crate::token::BinaryCmdOp::PipeAll => {
                        self.write_str(w, " ")?;
                        self.write_str(w, b.op.as_str())?;
                        self.write_str(w, " ")?;
                        self.print_stmt_body(w, &b.rhs)
                    }
                    crate::token::BinaryCmdOp::AndStmt | crate::token::BinaryCmdOp::OrStmt => {
                        if self.options.binary_next_line {
                            self.newline(w)?;
                            self.write_indent(w)?;
                            self.write_str(w, b.op.as_str())?;
                            self.write_str(w, " ")?;
                        } else {
                            self.write_str(w, " ")?;
                            self.write_str(w, b.op.as_str())?;
                            self.newline(w)?;
                            self.write_indent(w)?;
                        }
                        self.print_stmt_body(w, &b.rhs)
                    }
                }
            }
            Command::FuncDecl(f) => self.print_func_decl(w, f),
            Command::TestClause(t) => {
                self.write_str(w, "[[ ")?;
                self.print_test_expr(w, &t.expr)?;
                self.write_str(w, " ]]")
            }
            Command::DeclClause(d) => {
                let kw = match d.variant {
                    crate::syntax::DeclVariant::Declare => "declare",
                    crate::syntax::DeclVariant::Typeset => "typeset",
                    crate::syntax::DeclVariant::Export => "export",
                    crate::syntax::DeclVariant::Readonly => "readonly",
                    crate::syntax::DeclVariant::Nameref => "nameref",
                    crate::syntax::DeclVariant::Local => "local",
                };
                self.write_str(w, kw)?;
                for arg in &d.args {
                    self.write_str(w, " ")?;
                    match arg {
                        DeclArg::Assign(a) => self.print_assign(w, a)?,
                        DeclArg::Word(word) => self.print_word(w, word)?,
                    }
                }
                Ok(())
            }
            Command::TimeClause(t) => {
                self.write_str(w, "time")?;
                if t.posix {
                    self.write_str(w, " -p")?;
                }
                if let Some(command) = &t.command {
                    self.write_str(w, " ")?;
                    self.print_stmt_body(w, command)?;
                }
                Ok(())
            }
            Command::CoprocClause(c) => {
                self.write_str(w, "coproc ")?;
                if let Some(name) = &c.name {
                    self.write_str(w, name)?;
                    self.write_str(w, " ")?;
                }
                self.print_stmt_body(w, &c.body)
            }
            Command::LetClause(l) => {
                self.write_str(w, "let ")?;
                self.print_arithm_list(w, &l.exprs)
            }
            Command::ArithmCmd(a) => {
                self.write_str(w, "((")?;
                self.print_arithm(w, &a.expr)?;
                self.write_str(w, "))")
            }
            Command::TestDecl(t) => {
                self.write_str(w, "@test ")?;
                self.print_word(w, &t.description)?;
                self.write_str(w, " ")?;
                self.print_stmt_body(w, &t.body)
            }
        }
    }

    fn print_call<W: io::Write>(&mut self, w: &mut W, call: &Call) -> io::Result<()> {
        self.print_word_list(w, &call.words)
    }

    fn print_word_list_piped<W: io::Write>(&mut self, w: &mut W, words: &[crate::syntax::Word]) -> io::Result<()> {
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                self.write_str(w, "|")?;
            }
            self.print_word(w, word)?;
        }
        Ok(())
    }

    fn print_func_decl<W: io::Write>(&mut self, w: &mut W, f: &crate::syntax::FuncDecl) -> io::Result<()> {
        match f.style {
            FuncStyle::Posix => {
                self.write_str(w, &f.names[0])?;
                self.write_str(w, "()")?;
            }
            FuncStyle::Keyword => {
                self.write_str(w, "function ")?;
                self.write_str(w, &f.names.join(" "))?;
                if f.has_parens {
                    self.write_str(w, "()")?;
                }
            }
            FuncStyle::Anonymous => {
                self.write_str(w, "()")?;
            }
        }
        if self.options.function_next_line && matches!(f.body.command, Some(Command::Block(_))) {
            self.newline(w)?;
            self.write_indent(w)?;
        } else {
            self.write_str(w, " ")?;
        }
        self.print_stmt_body(w, &f.body)
    }

    /// Prints a compound command's body as an indented block: a newline,
    /// each statement at `self.indent + 1`, then the closing keyword's own
    /// indent is left for the caller to write.
    ///
    /// Under [`crate::printer::PrinterOptions::single_line`], a body with no
    /// heredoc and no literal embedded newline collapses onto the same line
    /// as the caller's opening keyword instead.
    pub(crate) fn print_block_body<W: io::Write>(&mut self, w: &mut W, body: &[Stmt]) -> io::Result<()> {
        if self.options.single_line && body_is_line_safe(body) {
            self.write_str(w, " ")?;
            self.print_stmt_list_inline(w, body)?;
            return self.write_str(w, " ");
        }
        self.newline(w)?;
        self.indent += 1;
        for stmt in body {
            self.print_stmt(w, stmt)?;
        }
        self.indent -= 1;
        self.write_indent(w)
    }
}

/// True if none of `stmts` (recursively, through nested compound commands)
/// carries a heredoc or a word containing an unescaped literal newline --
/// the two things that forbid `SingleLine` from collapsing a body.
fn body_is_line_safe(stmts: &[Stmt]) -> bool {
    stmts.iter().all(stmt_is_line_safe)
}

fn stmt_is_line_safe(stmt: &Stmt) -> bool {
    if !stmt.comments.is_empty() || stmt.inline_comment.is_some() {
        // A comment has no meaning once it is no longer the only thing on
        // its line.
        return false;
    }
    if stmt
        .redirects
        .iter()
        .any(|r| matches!(r.target, RedirTarget::HereDoc(_)))
    {
        return false;
    }
    if !stmt.assigns.iter().all(|a| match &a.value {
        crate::syntax::AssignValue::Scalar(word) => word_is_line_safe(word),
        crate::syntax::AssignValue::Array(words) => words.iter().all(word_is_line_safe),
    }) {
        return false;
    }
    match &stmt.command {
        Some(command) => command_is_line_safe(command),
        None => true,
    }
}

fn command_is_line_safe(command: &Command) -> bool {
    match command {
        Command::Call(Call { words }) => words.iter().all(word_is_line_safe),
        Command::Subshell(s) => body_is_line_safe(&s.body),
        Command::Block(b) => body_is_line_safe(&b.body),
        Command::If(c) => {
            body_is_line_safe(&c.cond)
                && body_is_line_safe(&c.body)
                && c.elifs.iter().all(|e| body_is_line_safe(&e.cond) && body_is_line_safe(&e.body))
                && c.else_body.as_deref().is_none_or(body_is_line_safe)
        }
        Command::While(l) | Command::Until(l) => body_is_line_safe(&l.cond) && body_is_line_safe(&l.body),
        Command::For(f) => {
            let kind_safe = match &f.kind {
                ForKind::Words { words, .. } => words.as_deref().is_none_or(|ws| ws.iter().all(word_is_line_safe)),
                ForKind::CStyle { .. } => true,
            };
            kind_safe && body_is_line_safe(&f.body)
        }
        Command::Select(s) => {
            s.words.as_deref().is_none_or(|ws| ws.iter().all(word_is_line_safe)) && body_is_line_safe(&s.body)
        }
        Command::Case(c) => {
            word_is_line_safe(&c.subject)
                && c.items.iter().all(|item| item.patterns.iter().all(word_is_line_safe) && body_is_line_safe(&item.body))
        }
        Command::Binary(b) => stmt_is_line_safe(&b.lhs) && stmt_is_line_safe(&b.rhs),
        Command::FuncDecl(f) => stmt_is_line_safe(&f.body),
        Command::TestClause(_) => true,
        Command::DeclClause(d) => d.args.iter().all(|arg| match arg {
            DeclArg::Assign(a) => match &a.value {
                crate::syntax::AssignValue::Scalar(word) => word_is_line_safe(word),
                crate::syntax::AssignValue::Array(words) => words.iter().all(word_is_line_safe),
            },
            DeclArg::Word(word) => word_is_line_safe(word),
        }),
        Command::TimeClause(t) => t.command.as_deref().is_none_or(stmt_is_line_safe),
        Command::CoprocClause(c) => stmt_is_line_safe(&c.body),
        Command::LetClause(_) | Command::ArithmCmd(_) => true,
        Command::TestDecl(t) => word_is_line_safe(&t.description) && stmt_is_line_safe(&t.body),
    }
}

fn word_is_line_safe(word: &Word) -> bool {
    word.parts.iter().all(word_part_is_line_safe)
}

fn word_part_is_line_safe(part: &WordPart) -> bool {
    match part {
        WordPart::Lit(s) | WordPart::SglQuoted(s) | WordPart::DollarSglQuoted(s) | WordPart::Tilde(s) => {
            !s.contains('\n')
        }
        WordPart::DblQuoted(text) | WordPart::DollarDblQuoted(text) => text_is_line_safe(text),
        WordPart::ParamExp(p) => param_exp_is_line_safe(p),
        WordPart::CmdSubst(c) => body_is_line_safe(&c.body),
        WordPart::ArithmExp(_) => true,
        WordPart::ExtGlob(e) => e.patterns.iter().all(word_is_line_safe),
        WordPart::ProcSubst(p) => body_is_line_safe(&p.body),
        WordPart::BraceExp(b) => b.alternatives.iter().all(word_is_line_safe),
    }
}

fn text_is_line_safe(text: &Text) -> bool {
    text.0.iter().all(|unit| match unit {
        TextUnit::Lit(s) => !s.contains('\n'),
        TextUnit::Backslashed(_) => true,
        TextUnit::ParamExp(p) => param_exp_is_line_safe(p),
        TextUnit::CmdSubst(c) => body_is_line_safe(&c.body),
        TextUnit::ArithmExp(_) => true,
    })
}

fn param_exp_is_line_safe(p: &ParamExpansion) -> bool {
    if let Some(index) = &p.index {
        if let crate::syntax::IndexExpr::Flagged { pattern, .. } = &index.expr {
            if !word_is_line_safe(pattern) {
                return false;
            }
        }
    }
    if let Some(replace) = &p.replace {
        if !word_is_line_safe(&replace.pattern) {
            return false;
        }
        if let Some(r) = &replace.replacement {
            if !word_is_line_safe(r) {
                return false;
            }
        }
    }
    if let Some(expansion) = &p.expansion {
        if let Some(operand) = &expansion.operand {
            if !word_is_line_safe(operand) {
                return false;
            }
        }
    }
    p.nested.as_deref().is_none_or(param_exp_is_line_safe)
}

#[cfg(test)]
mod tests {
    use crate::parser::Parser;
    use crate::printer::{Printer, PrinterOptions};
    use crate::token::LangVariant;

    fn format(src: &str, options: PrinterOptions) -> String {
        let file = Parser::new(src.as_bytes(), LangVariant::Posix).parse_file("").unwrap();
        let mut out = Vec::new();
        Printer::with_options(options).print(&mut out, &file).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn single_line_collapses_a_safe_if_body() {
        assert_eq!(
            format("if a\nthen b\nc\nfi", PrinterOptions::new().single_line(true)),
            "if a; then b; c; fi\n"
        );
    }

    #[test]
    fn single_line_falls_back_when_body_has_a_heredoc() {
        assert_eq!(
            format("if a\nthen cat <<EOF\nhi\nEOF\nfi", PrinterOptions::new().single_line(true)),
            "if a; then\n\tcat <<EOF\nhi\nEOF\nfi\n"
        );
    }

    #[test]
    fn single_line_falls_back_when_a_literal_embeds_a_newline() {
        assert_eq!(
            format("if a\nthen echo 'x\ny'\nfi", PrinterOptions::new().single_line(true)),
            "if a; then\n\techo 'x\ny'\nfi\n"
        );
    }

    #[test]
    fn single_line_off_by_default_keeps_multi_line_body() {
        assert_eq!(format("if a\nthen b\nfi", PrinterOptions::new()), "if a; then\n\tb\nfi\n");
    }
}
