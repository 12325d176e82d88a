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

//! Word and word-part printing: the literal/quoted/expansion variants a
//! [`crate::syntax::Word`] is built from.

use std::io;

use crate::printer::Printer;
use crate::syntax::{
    ArithmExp, CmdSubst, CmdSubstStyle, Expansion, Index, IndexExpr, ParamExpansion, ParamName, Replace,
    ReplaceAnchor, Slice, Text, TextUnit, Word, WordPart,
};

impl Printer {
    pub(crate) fn print_word<W: io::Write>(&mut self, w: &mut W, word: &Word) -> io::Result<()> {
        for part in &word.parts {
            self.print_word_part(w, part)?;
        }
        Ok(())
    }

    /// Joins `words` with single spaces, as argument lists, `in` lists, and
    /// array literals all do.
    pub(crate) fn print_word_list<W: io::Write>(&mut self, w: &mut W, words: &[Word]) -> io::Result<()> {
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                self.write_str(w, " ")?;
            }
            self.print_word(w, word)?;
        }
        Ok(())
    }

    fn print_word_part<W: io::Write>(&mut self, w: &mut W, part: &WordPart) -> io::Result<()> {
        match part {
            WordPart::Lit(s) => self.write_str(w, s),
            WordPart::SglQuoted(s) => {
                self.write_str(w, "'")?;
                self.write_str(w, s)?;
                self.write_str(w, "'")
            }
            WordPart::DollarSglQuoted(s) => {
                self.write_str(w, "$'")?;
                self.write_str(w, s)?;
                self.write_str(w, "'")
            }
            WordPart::DblQuoted(text) => {
                self.write_str(w, "\"")?;
                self.print_text(w, text)?;
                self.write_str(w, "\"")
            }
            WordPart::DollarDblQuoted(text) => {
                self.write_str(w, "$\"")?;
                self.print_text(w, text)?;
                self.write_str(w, "\"")
            }
            WordPart::ParamExp(pe) => self.print_param_exp(w, pe),
            WordPart::CmdSubst(cs) => self.print_cmd_subst(w, cs),
            WordPart::ArithmExp(ae) => self.print_arithm_exp(w, ae),
            WordPart::ExtGlob(eg) => {
                self.write_str(w, eg.op.as_str())?;
                for (i, pat) in eg.patterns.iter().enumerate() {
                    if i > 0 {
                        self.write_str(w, "|")?;
                    }
                    self.print_word(w, pat)?;
                }
                self.write_str(w, ")")
            }
            WordPart::ProcSubst(ps) => {
                self.write_str(w, ps.op.as_str())?;
                self.print_stmt_list_inline(w, &ps.body)?;
                self.write_str(w, ")")
            }
            WordPart::Tilde(s) => {
                self.write_str(w, "~")?;
                self.write_str(w, s)
            }
            // The parser never constructs this variant (see its doc
            // comment); printing it at all is a defensive fallback for
            // tooling that builds a tree by hand with an already-split
            // brace alternative.
            WordPart::BraceExp(be) => {
                self.write_str(w, "{")?;
                for (i, alt) in be.alternatives.iter().enumerate() {
                    if i > 0 {
                        self.write_str(w, ",")?;
                    }
                    self.print_word(w, alt)?;
                }
                self.write_str(w, "}")
            }
        }
    }

    fn print_text<W: io::Write>(&mut self, w: &mut W, text: &Text) -> io::Result<()> {
        for unit in &text.0 {
            match unit {
                TextUnit::Lit(s) => self.write_str(w, s)?,
                TextUnit::Backslashed(c) => {
                    self.write_str(w, "\\")?;
                    let mut buf = [0u8; 4];
                    self.write_str(w, c.encode_utf8(&mut buf))?;
                }
                TextUnit::ParamExp(pe) => self.print_param_exp(w, pe)?,
                TextUnit::CmdSubst(cs) => self.print_cmd_subst(w, cs)?,
                TextUnit::ArithmExp(ae) => self.print_arithm_exp(w, ae)?,
            }
        }
        Ok(())
    }

    fn print_cmd_subst<W: io::Write>(&mut self, w: &mut W, cs: &CmdSubst) -> io::Result<()> {
        match cs.style {
            CmdSubstStyle::Dollar => {
                self.write_str(w, "$(")?;
                self.print_stmt_list_inline(w, &cs.body)?;
                self.write_str(w, ")")
            }
            CmdSubstStyle::Backquote => {
                self.write_str(w, "`")?;
                self.print_stmt_list_inline(w, &cs.body)?;
                self.write_str(w, "`")
            }
            CmdSubstStyle::MirTempFile => {
                self.write_str(w, "${ ")?;
                self.print_stmt_list_inline(w, &cs.body)?;
                self.write_str(w, "; }")
            }
            CmdSubstStyle::MirReplyVar => {
                self.write_str(w, "${| ")?;
                self.print_stmt_list_inline(w, &cs.body)?;
                self.write_str(w, "; }")
            }
        }
    }

    fn print_arithm_exp<W: io::Write>(&mut self, w: &mut W, ae: &ArithmExp) -> io::Result<()> {
        if ae.dollar_bracket {
            self.write_str(w, "$[")?;
            self.print_arithm(w, &ae.expr)?;
            self.write_str(w, "]")
        } else {
            self.write_str(w, "$((")?;
            self.print_arithm(w, &ae.expr)?;
            self.write_str(w, "))")
        }
    }

    fn print_param_exp<W: io::Write>(&mut self, w: &mut W, pe: &ParamExpansion) -> io::Result<()> {
        self.write_str(w, "$")?;
        if pe.simple {
            return self.print_param_name(w, &pe.name);
        }
        self.write_str(w, "{")?;
        if pe.length {
            self.write_str(w, "#")?;
        }
        if pe.excl {
            self.write_str(w, "!")?;
        }
        if pe.plus {
            self.write_str(w, "+")?;
        }
        if pe.width {
            self.write_str(w, "%")?;
        }
        if let Some(nested) = &pe.nested {
            self.print_param_exp(w, nested)?;
        } else {
            self.print_param_name(w, &pe.name)?;
        }
        if let Some(index) = &pe.index {
            self.print_index(w, index)?;
        }
        if let Some(slice) = &pe.slice {
            self.print_slice(w, slice)?;
        }
        if let Some(replace) = &pe.replace {
            self.print_replace(w, replace)?;
        }
        if let Some(expansion) = &pe.expansion {
            self.print_expansion(w, expansion)?;
        }
        for modifier in &pe.modifiers {
            self.write_str(w, ":")?;
            self.write_str(w, modifier)?;
        }
        if let Some(flags) = &pe.flags {
            self.write_str(w, flags)?;
        }
        self.write_str(w, "}")
    }

    fn print_param_name<W: io::Write>(&mut self, w: &mut W, name: &ParamName) -> io::Result<()> {
        match name {
            ParamName::Variable(s) => self.write_str(w, s),
            ParamName::Special(c) => {
                let mut buf = [0u8; 4];
                self.write_str(w, c.encode_utf8(&mut buf))
            }
            ParamName::Positional(n) => self.write_str(w, &n.to_string()),
        }
    }

    fn print_index<W: io::Write>(&mut self, w: &mut W, index: &Index) -> io::Result<()> {
        self.write_str(w, "[")?;
        match &index.expr {
            IndexExpr::Arithm(expr) => self.print_arithm(w, expr)?,
            IndexExpr::At => self.write_str(w, "@")?,
            IndexExpr::Star => self.write_str(w, "*")?,
            IndexExpr::Flagged { flag, pattern } => {
                self.write_str(w, "(")?;
                self.write_str(w, flag)?;
                self.write_str(w, ")")?;
                self.print_word(w, pattern)?;
            }
        }
        self.write_str(w, "]")
    }

    fn print_slice<W: io::Write>(&mut self, w: &mut W, slice: &Slice) -> io::Result<()> {
        self.write_str(w, ":")?;
        self.print_arithm(w, &slice.offset)?;
        if let Some(length) = &slice.length {
            self.write_str(w, ":")?;
            self.print_arithm(w, length)?;
        }
        Ok(())
    }

    fn print_replace<W: io::Write>(&mut self, w: &mut W, replace: &Replace) -> io::Result<()> {
        self.write_str(w, if replace.global { "//" } else { "/" })?;
        match replace.anchor {
            Some(ReplaceAnchor::Prefix) => self.write_str(w, "#")?,
            Some(ReplaceAnchor::Suffix) => self.write_str(w, "%")?,
            None => {}
        }
        self.print_word(w, &replace.pattern)?;
        if let Some(replacement) = &replace.replacement {
            self.write_str(w, "/")?;
            self.print_word(w, replacement)?;
        }
        Ok(())
    }

    fn print_expansion<W: io::Write>(&mut self, w: &mut W, expansion: &Expansion) -> io::Result<()> {
        if expansion.op.colon() {
            self.write_str(w, ":")?;
        }
        if let crate::token::ParamOp::AtOperator(c) = expansion.op {
            self.write_str(w, "@")?;
            let mut buf = [0u8; 4];
            self.write_str(w, c.encode_utf8(&mut buf))?;
        } else {
            self.write_str(w, expansion.op.as_str())?;
        }
        if let Some(operand) = &expansion.operand {
            self.print_word(w, operand)?;
        }
        Ok(())
    }
}
