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

//! Word assembly: quotes, parameter expansion, command and arithmetic
//! substitution, extended globs, process substitution, tildes.

use super::error::{ErrorCode, Result};
use super::Parser;
use crate::lexer::{Mode, ParamExpMode};
use crate::syntax::*;
use crate::token::{GlobOp, LangVariant, ProcSubstOp};

/// Controls where a [`Parser::word`] call stops.
#[derive(Clone, Copy)]
pub(crate) struct WordOpts {
    /// Extra unquoted bytes (beyond quote/`$`/backquote/newline, which
    /// [`crate::lexer::Lexer::lex_literal_run`] always stops at) that end a
    /// literal run and the word as a whole.
    pub extra_stops: &'static [u8],
    /// Whether an unquoted blank ends the word.
    pub stop_blank: bool,
    /// Whether a leading `~` starts a tilde prefix.
    pub allow_tilde: bool,
}

impl WordOpts {
    pub const NORMAL: WordOpts = WordOpts {
        extra_stops: &[b';', b'&', b'|', b'(', b')', b'<', b'>'],
        stop_blank: true,
        allow_tilde: true,
    };
    pub const ASSIGN_VALUE: WordOpts = WordOpts {
        extra_stops: &[b';', b'&', b'|', b'(', b')', b'<', b'>', b':'],
        stop_blank: true,
        allow_tilde: true,
    };
    pub const CASE_PATTERN: WordOpts = WordOpts {
        extra_stops: &[b')', b'|'],
        stop_blank: true,
        allow_tilde: false,
    };
    pub const HEREDOC_DELIM: WordOpts = WordOpts {
        extra_stops: &[],
        stop_blank: true,
        allow_tilde: false,
    };
    pub const ARITH: WordOpts = WordOpts {
        extra_stops: &[
            b'+', b'-', b'*', b'/', b'%', b'^', b'&', b'|', b'<', b'>', b'=', b'!', b'~', b'?', b':', b',', b'(', b')',
        ],
        stop_blank: true,
        allow_tilde: false,
    };
    pub const TEST_OPERAND: WordOpts = WordOpts {
        extra_stops: &[b']', b'(', b')'],
        stop_blank: true,
        allow_tilde: true,
    };
    pub const TEST_REGEX: WordOpts = WordOpts {
        extra_stops: &[b']'],
        stop_blank: false,
        allow_tilde: false,
    };
    pub const PARAM_OPERAND: WordOpts = WordOpts {
        extra_stops: &[b'}'],
        stop_blank: false,
        allow_tilde: false,
    };
    pub const PARAM_INDEX: WordOpts = WordOpts {
        extra_stops: &[b']'],
        stop_blank: false,
        allow_tilde: false,
    };
    pub const REPLACE_PATTERN: WordOpts = WordOpts {
        extra_stops: &[b'/', b'}'],
        stop_blank: false,
        allow_tilde: false,
    };
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_name_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

impl Parser<'_> {
    /// Parses one [`Word`] under the given stop rules. May return an empty
    /// word (no parts) if the cursor is already at a boundary.
    pub(crate) fn word(&mut self, opts: WordOpts) -> Result<Word> {
        let start = self.lexer.here();
        let mut parts: Vec<WordPart> = Vec::new();

        loop {
            self.lexer.skip_line_continuations();
            let Some(b) = self.lexer.peek() else { break };
            if b == b'\n' {
                break;
            }
            if opts.stop_blank && crate::lexer::Lexer::is_blank_byte(b) {
                break;
            }
            if opts.extra_stops.contains(&b) {
                break;
            }

            match b {
                b'\'' => {
                    self.lexer.bump();
                    let s = self.lexer.lex_single_quoted().map_err(|_| self.error(ErrorCode::UnterminatedQuote))?;
                    parts.push(WordPart::SglQuoted(s));
                }
                b'"' => {
                    self.lexer.bump();
                    let text = self.dbl_quoted_text()?;
                    parts.push(WordPart::DblQuoted(text));
                }
                b'`' => {
                    parts.push(WordPart::CmdSubst(self.backquote_cmd_subst()?));
                }
                b'~' if opts.allow_tilde && parts.is_empty() => {
                    parts.push(self.tilde_prefix());
                }
                b'$' => {
                    parts.push(self.dollar_part()?);
                }
                b'<' if self.lexer.peek_at(1) == Some(b'(') && self.variant != LangVariant::Posix => {
                    self.require_feature("process substitution")?;
                    parts.push(WordPart::ProcSubst(self.proc_subst(ProcSubstOp::In)?));
                }
                b'>' if self.lexer.peek_at(1) == Some(b'(') && self.variant != LangVariant::Posix => {
                    self.require_feature("process substitution")?;
                    parts.push(WordPart::ProcSubst(self.proc_subst(ProcSubstOp::Out)?));
                }
                b'=' if self.lexer.peek_at(1) == Some(b'(') && self.variant == LangVariant::Zsh => {
                    self.require_feature("zsh temp-file process substitution")?;
                    parts.push(WordPart::ProcSubst(self.proc_subst(ProcSubstOp::InTempFile)?));
                }
                b'?' | b'*' | b'+' | b'@' | b'!'
                    if self.lexer.peek_at(1) == Some(b'(') && self.variant != LangVariant::Posix && self.variant != LangVariant::Zsh =>
                {
                    self.require_feature("extended glob")?;
                    parts.push(WordPart::ExtGlob(self.ext_glob(b)?));
                }
                _ => match self.lexer.lex_literal_run(opts.extra_stops, opts.stop_blank) {
                    Some(s) => parts.push(WordPart::Lit(s)),
                    None => break,
                },
            }
        }

        let end = self.lexer.here();
        Ok(Word { pos: start, end, parts })
    }

    /// The content of a `"..."` after the opening quote has been consumed.
    pub(crate) fn dbl_quoted_text(&mut self) -> Result<Text> {
        self.lexer.push_mode(Mode::DoubleQuoted);
        let units = self.text_units(b'"')?;
        self.lexer.pop_mode();
        Ok(Text(units))
    }

    fn text_units(&mut self, terminator: u8) -> Result<Vec<TextUnit>> {
        let mut units = Vec::new();
        loop {
            self.lexer.skip_line_continuations();
            match self.lexer.peek() {
                None => return Err(self.error(ErrorCode::UnterminatedQuote)),
                Some(b) if b == terminator => {
                    self.lexer.bump();
                    return Ok(units);
                }
                Some(b'\\') => {
                    self.lexer.bump();
                    match self.lexer.bump() {
                        Some(c @ (b'$' | b'`' | b'"' | b'\\')) => units.push(TextUnit::Backslashed(c as char)),
                        Some(b'\n') => {} // line continuation, drops both bytes
                        Some(c) => {
                            units.push(TextUnit::Lit("\\".to_owned()));
                            units.push(TextUnit::Lit((c as char).to_string()));
                        }
                        None => return Err(self.error(ErrorCode::UnterminatedQuote)),
                    }
                }
                Some(b'$') => units.push(self.dollar_text_unit()?),
                Some(b'`') => {
                    let cs = self.backquote_cmd_subst()?;
                    units.push(TextUnit::CmdSubst(cs));
                }
                Some(_) => {
                    let mut lit = String::new();
                    while let Some(b) = self.lexer.peek() {
                        if b == terminator || b == b'$' || b == b'`' || b == b'\\' {
                            break;
                        }
                        self.lexer.bump();
                        lit.push(b as char);
                    }
                    units.push(TextUnit::Lit(lit));
                }
            }
        }
    }

    fn dollar_text_unit(&mut self) -> Result<TextUnit> {
        match self.dollar_part()? {
            WordPart::ParamExp(p) => Ok(TextUnit::ParamExp(p)),
            WordPart::CmdSubst(c) => Ok(TextUnit::CmdSubst(c)),
            WordPart::ArithmExp(a) => Ok(TextUnit::ArithmExp(a)),
            WordPart::Lit(s) => Ok(TextUnit::Lit(s)),
            other => {
                // $'...'/$"..." inside a double-quoted string is not legal
                // shell, but rather than invent a new TextUnit variant for a
                // case that cannot occur, flatten defensively.
                let _ = other;
                Ok(TextUnit::Lit(String::new()))
            }
        }
    }

    fn tilde_prefix(&mut self) -> WordPart {
        self.lexer.bump(); // '~'
        let mut name = String::new();
        while let Some(b) = self.lexer.peek() {
            if is_name_byte(b) || b == b'-' || b == b'+' || b == b'/' {
                if b == b'/' {
                    break;
                }
                name.push(b as char);
                self.lexer.bump();
            } else {
                break;
            }
        }
        WordPart::Tilde(name)
    }

    /// Dispatches on what follows a `$`.
    fn dollar_part(&mut self) -> Result<WordPart> {
        let start = self.lexer.here();
        match self.lexer.peek_at(1) {
            Some(b'\'') => {
                self.require_feature("$'...'")?;
                self.lexer.bump();
                self.lexer.bump();
                let s = self.lexer.lex_dollar_single_quoted().map_err(|_| self.error(ErrorCode::UnterminatedQuote))?;
                Ok(WordPart::DollarSglQuoted(s))
            }
            Some(b'"') => {
                self.require_feature("$\"...\"")?;
                self.lexer.bump();
                self.lexer.bump();
                self.lexer.push_mode(Mode::DollarDoubleQuoted);
                let units = self.text_units(b'"')?;
                self.lexer.pop_mode();
                Ok(WordPart::DollarDblQuoted(Text(units)))
            }
            Some(b'(') if self.lexer.peek_at(2) == Some(b'(') => {
                self.lexer.bump();
                self.lexer.bump();
                self.lexer.bump();
                let expr = self.bracketed_arithm(false)?;
                let end = self.lexer.here();
                Ok(WordPart::ArithmExp(ArithmExp { pos: start, end, dollar_bracket: false, expr }))
            }
            Some(b'(') => {
                self.lexer.bump();
                self.lexer.bump();
                let (style, body, trailing) = self.cmd_subst_paren()?;
                let end = self.lexer.here();
                Ok(WordPart::CmdSubst(CmdSubst { pos: start, end, style, body, trailing_comments: trailing }))
            }
            Some(b'{') if self.is_mksh_cmd_subst_brace() => {
                self.lexer.bump();
                self.lexer.bump();
                let reply = self.lexer.peek() == Some(b'|');
                if reply {
                    self.require_feature("mksh reply-var command substitution")?;
                    self.lexer.bump();
                } else {
                    self.require_feature("mksh temp-file command substitution")?;
                }
                let body = self.stmt_list(&[])?;
                self.skip_separators();
                let trailing = self.take_pending_comments();
                if !self.lexer.eat(b';') {
                    return Err(self.error(ErrorCode::UnterminatedSubst("mksh command substitution")));
                }
                self.skip_blanks();
                if !self.lexer.eat(b'}') {
                    return Err(self.error(ErrorCode::UnterminatedSubst("mksh command substitution")));
                }
                let end = self.lexer.here();
                let style = if reply { CmdSubstStyle::MirReplyVar } else { CmdSubstStyle::MirTempFile };
                Ok(WordPart::CmdSubst(CmdSubst { pos: start, end, style, body, trailing_comments: trailing }))
            }
            Some(b'{') => {
                self.lexer.bump();
                self.lexer.bump();
                let exp = self.braced_param(start)?;
                Ok(WordPart::ParamExp(exp))
            }
            Some(b'[') => {
                self.lexer.bump();
                self.lexer.bump();
                let expr = self.bracketed_arithm(true)?;
                let end = self.lexer.here();
                Ok(WordPart::ArithmExp(ArithmExp { pos: start, end, dollar_bracket: true, expr }))
            }
            Some(b) if is_name_start(b) => {
                self.lexer.bump();
                let mut name = String::new();
                while let Some(b) = self.lexer.peek() {
                    if is_name_byte(b) {
                        name.push(b as char);
                        self.lexer.bump();
                    } else {
                        break;
                    }
                }
                let end = self.lexer.here();
                Ok(WordPart::ParamExp(ParamExpansion {
                    pos: start,
                    end,
                    simple: true,
                    name: ParamName::Variable(name),
                    length: false,
                    excl: false,
                    plus: false,
                    width: false,
                    index: None,
                    slice: None,
                    replace: None,
                    expansion: None,
                    nested: None,
                    modifiers: vec![],
                    flags: None,
                }))
            }
            Some(b) if b.is_ascii_digit() => {
                self.lexer.bump();
                let n = (b - b'0') as u32;
                self.lexer.bump();
                let end = self.lexer.here();
                Ok(WordPart::ParamExp(ParamExpansion {
                    pos: start,
                    end,
                    simple: true,
                    name: ParamName::Positional(n),
                    length: false,
                    excl: false,
                    plus: false,
                    width: false,
                    index: None,
                    slice: None,
                    replace: None,
                    expansion: None,
                    nested: None,
                    modifiers: vec![],
                    flags: None,
                }))
            }
            Some(b @ (b'?' | b'$' | b'!' | b'#' | b'-' | b'@' | b'*' | b'0')) => {
                self.lexer.bump();
                self.lexer.bump();
                let end = self.lexer.here();
                Ok(WordPart::ParamExp(ParamExpansion {
                    pos: start,
                    end,
                    simple: true,
                    name: ParamName::Special(b as char),
                    length: false,
                    excl: false,
                    plus: false,
                    width: false,
                    index: None,
                    slice: None,
                    replace: None,
                    expansion: None,
                    nested: None,
                    modifiers: vec![],
                    flags: None,
                }))
            }
            _ => {
                self.lexer.bump();
                Ok(WordPart::Lit("$".to_owned()))
            }
        }
    }

    /// Peeks whether `${` introduces an mksh command substitution (a blank,
    /// or `|`, right after the brace) rather than a parameter expansion.
    fn is_mksh_cmd_subst_brace(&self) -> bool {
        matches!(self.lexer.peek_at(2), Some(b) if crate::lexer::Lexer::is_blank_byte(b) || b == b'|')
    }

    /// Parses the body of `${...}` after `${` has been consumed.
    fn braced_param(&mut self, pos: crate::pos::Pos) -> Result<ParamExpansion> {
        let mut flags = None;
        if self.lexer.peek() == Some(b'(') {
            self.require_feature("zsh subscript flags")?;
            let start = self.lexer.pos;
            let mut depth = 0i32;
            loop {
                match self.lexer.bump() {
                    Some(b'(') => depth += 1,
                    Some(b')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Some(_) => {}
                    None => return Err(self.error(ErrorCode::InvalidParamExpansion)),
                }
            }
            flags = Some(String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned());
        }

        if self.lexer.peek() == Some(b'$') && self.lexer.peek_at(1) == Some(b'{') {
            self.require_feature("zsh modifiers")?;
            self.lexer.bump();
            self.lexer.bump();
            let inner_pos = self.lexer.here();
            let inner = self.braced_param(inner_pos)?;
            let (expansion, modifiers) = self.param_suffix()?;
            let end = self.lexer.here();
            return Ok(ParamExpansion {
                pos,
                end,
                simple: false,
                name: ParamName::Variable(String::new()),
                length: false,
                excl: false,
                plus: false,
                width: false,
                index: None,
                slice: None,
                replace: None,
                expansion,
                nested: Some(Box::new(inner)),
                modifiers,
                flags,
            });
        }

        let mut length = false;
        let mut excl = false;
        let mut plus = false;
        let width = false;

        if self.lexer.peek() == Some(b'#') && self.lexer.peek_at(1) != Some(b'}') {
            length = true;
            self.lexer.bump();
        } else if self.lexer.peek() == Some(b'!') && self.lexer.peek_at(1) != Some(b'}') {
            excl = true;
            self.lexer.bump();
        } else if self.variant == LangVariant::Zsh && self.lexer.peek() == Some(b'+') && matches!(self.lexer.peek_at(1), Some(b) if is_name_start(b)) {
            self.require_feature("zsh ${+foo} is-set flag")?;
            plus = true;
            self.lexer.bump();
        }

        let name = self.param_name()?;

        let index = if self.lexer.peek() == Some(b'[') {
            self.lexer.bump();
            self.require_feature("arrays")?;
            Some(self.param_index()?)
        } else {
            None
        };

        let mut slice = None;
        let mut replace = None;
        let mut expansion = None;

        if self.lexer.peek() == Some(b':') {
            let c2 = self.lexer.peek_at(1);
            match c2 {
                Some(b'-') => {
                    self.lexer.bump();
                    self.lexer.bump();
                    expansion = Some(self.param_operator_tail(crate::token::ParamOp::Default { colon: true })?);
                }
                Some(b'=') => {
                    self.lexer.bump();
                    self.lexer.bump();
                    expansion = Some(self.param_operator_tail(crate::token::ParamOp::Assign { colon: true })?);
                }
                Some(b'?') => {
                    self.lexer.bump();
                    self.lexer.bump();
                    expansion = Some(self.param_operator_tail(crate::token::ParamOp::Error { colon: true })?);
                }
                Some(b'+') => {
                    self.lexer.bump();
                    self.lexer.bump();
                    expansion = Some(self.param_operator_tail(crate::token::ParamOp::Alternative { colon: true })?);
                }
                Some(b'#') if self.variant == LangVariant::Zsh => {
                    self.require_feature("zsh modifiers")?;
                    self.lexer.bump();
                    self.lexer.bump();
                    expansion = Some(self.param_operator_tail(crate::token::ParamOp::MatchEmpty)?);
                }
                _ => {
                    self.lexer.bump();
                    self.require_feature("parameter slicing")?;
                    let offset = self.bracketed_arithm_until(&[b':', b'}'])?;
                    let length_expr = if self.lexer.eat(b':') { Some(self.bracketed_arithm_until(&[b'}'])?) } else { None };
                    slice = Some(Slice { offset, length: length_expr });
                }
            }
        } else if expansion.is_none() && slice.is_none() {
            expansion = self.param_bare_operator()?;
            if expansion.is_none() {
                if let Some(r) = self.try_replace()? {
                    replace = Some(r);
                }
            }
        }

        let (nested_expansion, modifiers) = self.param_suffix()?;
        if expansion.is_none() {
            expansion = nested_expansion;
        }

        if !self.lexer.eat(b'}') {
            return Err(self.error(ErrorCode::UnterminatedSubst("parameter expansion")));
        }
        let end = self.lexer.here();

        Ok(ParamExpansion {
            pos,
            end,
            simple: false,
            name,
            length,
            excl,
            plus,
            width,
            index,
            slice,
            replace,
            expansion,
            nested: None,
            modifiers,
            flags,
        })
    }

    fn param_name(&mut self) -> Result<ParamName> {
        match self.lexer.peek() {
            Some(b) if is_name_start(b) => {
                let start = self.lexer.pos;
                while matches!(self.lexer.peek(), Some(b) if is_name_byte(b)) {
                    self.lexer.bump();
                }
                Ok(ParamName::Variable(String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned()))
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.lexer.pos;
                while matches!(self.lexer.peek(), Some(b) if b.is_ascii_digit()) {
                    self.lexer.bump();
                }
                let n: u32 = std::str::from_utf8(&self.lexer.bytes[start..self.lexer.pos]).unwrap_or("0").parse().unwrap_or(0);
                Ok(ParamName::Positional(n))
            }
            Some(b @ (b'?' | b'$' | b'!' | b'#' | b'-' | b'@' | b'*' | b'0')) => {
                self.lexer.bump();
                Ok(ParamName::Special(b as char))
            }
            _ => Err(self.error(ErrorCode::InvalidParamExpansion)),
        }
    }

    fn param_index(&mut self) -> Result<Index> {
        let expr = if self.lexer.peek() == Some(b'@') && self.lexer.peek_at(1) == Some(b']') {
            self.lexer.bump();
            IndexExpr::At
        } else if self.lexer.peek() == Some(b'*') && self.lexer.peek_at(1) == Some(b']') {
            self.lexer.bump();
            IndexExpr::Star
        } else if self.variant == LangVariant::Zsh && self.lexer.peek() == Some(b'(') {
            self.require_feature("zsh subscript flags")?;
            let start = self.lexer.pos;
            self.lexer.bump();
            while !matches!(self.lexer.peek(), Some(b')') | None) {
                self.lexer.bump();
            }
            self.lexer.bump();
            let flag = String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned();
            let pattern = self.word(WordOpts::PARAM_INDEX)?;
            IndexExpr::Flagged { flag, pattern }
        } else {
            let e = self.bracketed_arithm_until(&[b']'])?;
            IndexExpr::Arithm(e)
        };
        if !self.lexer.eat(b']') {
            return Err(self.error(ErrorCode::UnterminatedSubst("index")));
        }
        Ok(Index { expr })
    }

    fn param_bare_operator(&mut self) -> Result<Option<Expansion>> {
        use crate::token::ParamOp::*;
        let op = match self.lexer.peek() {
            Some(b'-') => Default { colon: false },
            Some(b'=') => Assign { colon: false },
            Some(b'?') => Error { colon: false },
            Some(b'+') => Alternative { colon: false },
            Some(b'#') => {
                self.lexer.bump();
                let longest = self.lexer.eat(b'#');
                let operand = self.word(WordOpts::PARAM_OPERAND)?;
                return Ok(Some(Expansion {
                    op: if longest { TrimLongestPrefix } else { TrimShortestPrefix },
                    operand: Some(operand),
                }));
            }
            Some(b'%') => {
                self.lexer.bump();
                let longest = self.lexer.eat(b'%');
                let operand = self.word(WordOpts::PARAM_OPERAND)?;
                return Ok(Some(Expansion {
                    op: if longest { TrimLongestSuffix } else { TrimShortestSuffix },
                    operand: Some(operand),
                }));
            }
            Some(b'^') if self.variant != LangVariant::Posix => {
                self.lexer.bump();
                let all = self.lexer.eat(b'^');
                let operand = self.word(WordOpts::PARAM_OPERAND)?;
                return Ok(Some(Expansion {
                    op: if all { UppercaseAll } else { UppercaseFirst },
                    operand: Some(operand),
                }));
            }
            Some(b',') if self.variant.is_bash_like() => {
                self.lexer.bump();
                let all = self.lexer.eat(b',');
                let operand = self.word(WordOpts::PARAM_OPERAND)?;
                return Ok(Some(Expansion {
                    op: if all { LowercaseAll } else { LowercaseFirst },
                    operand: Some(operand),
                }));
            }
            Some(b'@') if self.variant.is_bash_like() => {
                self.lexer.bump();
                let flag = self.lexer.bump().unwrap_or('Q' as u8) as char;
                return Ok(Some(Expansion { op: AtOperator(flag), operand: None }));
            }
            _ => return Ok(None),
        };
        self.lexer.bump();
        let operand = self.word(WordOpts::PARAM_OPERAND)?;
        Ok(Some(Expansion { op, operand: Some(operand) }))
    }

    fn param_operator_tail(&mut self, op: crate::token::ParamOp) -> Result<Expansion> {
        let operand = self.word(WordOpts::PARAM_OPERAND)?;
        Ok(Expansion { op, operand: Some(operand) })
    }

    fn try_replace(&mut self) -> Result<Option<Replace>> {
        if self.lexer.peek() != Some(b'/') {
            return Ok(None);
        }
        self.lexer.bump();
        let global = self.lexer.eat(b'/');
        let anchor = if self.lexer.eat(b'#') {
            Some(ReplaceAnchor::Prefix)
        } else if self.lexer.eat(b'%') {
            Some(ReplaceAnchor::Suffix)
        } else {
            None
        };
        let pattern = self.word(WordOpts::REPLACE_PATTERN)?;
        let replacement = if self.lexer.eat(b'/') { Some(self.word(WordOpts::PARAM_OPERAND)?) } else { None };
        Ok(Some(Replace { pattern, replacement, global, anchor }))
    }

    /// zsh `:u`, `:l`, `:t5`, `:h2`, ... suffix chain. A spelling outside
    /// this small whitelist is rejected rather than guessed at.
    fn param_suffix(&mut self) -> Result<(Option<Expansion>, Vec<String>)> {
        let mut modifiers = Vec::new();
        while self.variant == LangVariant::Zsh && self.lexer.peek() == Some(b':') && matches!(self.lexer.peek_at(1), Some(b) if b.is_ascii_alphabetic())
        {
            let start = self.lexer.pos;
            self.lexer.bump();
            let letter = self.lexer.bump().unwrap();
            if !matches!(letter, b'u' | b'l' | b'r' | b'e' | b'a' | b'A' | b'P' | b'q' | b'Q' | b't' | b'h') {
                self.lexer.pos = start;
                return Err(self.error(ErrorCode::FeatureNotInLang {
                    feature: "zsh modifier",
                    owner: "zsh",
                    tried: self.variant,
                }));
            }
            if matches!(letter, b't' | b'h') {
                while matches!(self.lexer.peek(), Some(b) if b.is_ascii_digit()) {
                    self.lexer.bump();
                }
            }
            modifiers.push(String::from_utf8_lossy(&self.lexer.bytes[start..self.lexer.pos]).into_owned());
        }
        Ok((None, modifiers))
    }

    /// Parses `$(...)`/backquote-internal statements up to the matching
    /// close, returning the body and any trailing comments inside it.
    fn cmd_subst_paren(&mut self) -> Result<(CmdSubstStyle, Vec<Stmt>, Vec<Comment>)> {
        let body = self.stmt_list(&[])?;
        self.skip_separators();
        let trailing = self.take_pending_comments();
        if !self.lexer.eat(b')') {
            return Err(self.error(ErrorCode::UnterminatedSubst("command substitution")));
        }
        Ok((CmdSubstStyle::Dollar, body, trailing))
    }

    fn backquote_cmd_subst(&mut self) -> Result<CmdSubst> {
        let pos = self.lexer.here();
        self.lexer.bump(); // opening `
        let depth = match self.lexer.mode() {
            Mode::Backquote { depth } => depth + 1,
            _ => 1,
        };
        self.lexer.push_mode(Mode::Backquote { depth });
        // Backquoted substitutions are re-lexed from their de-escaped text:
        // collect raw bytes up to the matching (unescaped) closing
        // backquote, unescaping `\\` and `` \` `` once per nesting depth,
        // then recursively parse that text as a nested script.
        let mut raw = Vec::new();
        loop {
            match self.lexer.peek() {
                None => return Err(self.error(ErrorCode::UnterminatedSubst("backquoted command substitution"))),
                Some(b'`') => {
                    self.lexer.bump();
                    break;
                }
                Some(b'\\') if matches!(self.lexer.peek_at(1), Some(b'`') | Some(b'\\')) => {
                    self.lexer.bump();
                    if let Some(c) = self.lexer.bump() {
                        raw.push(c);
                    }
                }
                Some(b) => {
                    self.lexer.bump();
                    raw.push(b);
                }
            }
        }
        self.lexer.pop_mode();
        let end = self.lexer.here();

        let mut inner = Parser::new(&raw, self.variant);
        inner.filename = self.filename.clone();
        inner.keep_comments = self.keep_comments;
        let body = inner.stmt_list(&[])?;
        let trailing = inner.take_pending_comments();

        Ok(CmdSubst { pos, end, style: CmdSubstStyle::Backquote, body, trailing_comments: trailing })
    }

    /// Parses the inside of `$((...))` or `$[...]`, consuming the closing
    /// delimiter (`))` or `]`).
    fn bracketed_arithm(&mut self, dollar_bracket: bool) -> Result<ArithmExpr> {
        self.lexer.push_mode(Mode::Arithm);
        let expr = self.arithm_expr(1)?;
        self.skip_arith_blanks();
        self.lexer.pop_mode();
        if dollar_bracket {
            if !self.lexer.eat(b']') {
                return Err(self.error(ErrorCode::UnterminatedArithm));
            }
        } else if !(self.lexer.eat(b')') && self.lexer.eat(b')')) {
            return Err(self.error(ErrorCode::UnterminatedArithm));
        }
        Ok(expr)
    }

    /// Parses an arithmetic expression that stops at one of `terminators`
    /// without consuming it (used for slice/index sub-expressions whose
    /// closing delimiter is owned by the caller).
    fn bracketed_arithm_until(&mut self, terminators: &[u8]) -> Result<ArithmExpr> {
        self.lexer.push_mode(Mode::Arithm);
        let saved_extra = self.arith_terminators.clone();
        self.arith_terminators = terminators.to_vec();
        let expr = self.arithm_expr(1);
        self.arith_terminators = saved_extra;
        self.lexer.pop_mode();
        expr
    }

    fn ext_glob(&mut self, introducer: u8) -> Result<ExtGlobPart> {
        let pos = self.lexer.here();
        let op = match introducer {
            b'?' => GlobOp::ZeroOrOne,
            b'*' => GlobOp::Any,
            b'+' => GlobOp::OneOrMore,
            b'@' => GlobOp::Exactly,
            b'!' => GlobOp::Not,
            _ => unreachable!(),
        };
        self.lexer.bump(); // introducer
        self.lexer.bump(); // '('
        let mut patterns = Vec::new();
        loop {
            let w = self.word(WordOpts::CASE_PATTERN)?;
            patterns.push(w);
            if self.lexer.eat(b'|') {
                continue;
            }
            if self.lexer.eat(b')') {
                break;
            }
            return Err(self.error(ErrorCode::UnterminatedExtGlob));
        }
        let end = self.lexer.here();
        Ok(ExtGlobPart { pos, end, op, patterns })
    }

    fn proc_subst(&mut self, op: ProcSubstOp) -> Result<ProcSubstPart> {
        let pos = self.lexer.here();
        self.lexer.bump(); // introducer (<, >, =)
        self.lexer.bump(); // '('
        let body = self.stmt_list(&[])?;
        self.skip_separators();
        if !self.lexer.eat(b')') {
            return Err(self.error(ErrorCode::UnterminatedProcSubst));
        }
        let end = self.lexer.here();
        Ok(ProcSubstPart { pos, end, op, body })
    }

    // -- helpers shared with arith.rs / test_expr.rs --

    pub(crate) fn arith_operand_word(&mut self) -> Result<Word> {
        self.word(WordOpts::ARITH)
    }

    pub(crate) fn test_operand_word(&mut self) -> Result<Word> {
        self.word(WordOpts::TEST_OPERAND)
    }

    pub(crate) fn test_regex_operand(&mut self) -> Result<Word> {
        self.word(WordOpts::TEST_REGEX)
    }
}
