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

//! Printer style options.
//!
//! Mirrors how [`crate::parser::Parser`] configures itself: a `#[must_use]`
//! builder with chainable, self-consuming setters, so a caller writes
//! `PrinterOptions::new().indent(2).binary_next_line(true)`.

/// The closed set of printer style knobs, with their defaults.
#[must_use]
#[derive(Clone, Copy, Debug)]
pub struct PrinterOptions {
    pub(crate) indent: u32,
    pub(crate) binary_next_line: bool,
    pub(crate) switch_case_indent: bool,
    pub(crate) space_redirects: bool,
    pub(crate) keep_padding: bool,
    pub(crate) minify: bool,
    pub(crate) single_line: bool,
    pub(crate) function_next_line: bool,
    pub(crate) keep_comments: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        PrinterOptions {
            indent: 0,
            binary_next_line: false,
            switch_case_indent: false,
            space_redirects: false,
            keep_padding: false,
            minify: false,
            single_line: false,
            function_next_line: false,
            keep_comments: true,
        }
    }
}

impl PrinterOptions {
    /// Starts from the default options (tabs, no minification, no
    /// collapsing, comments kept).
    pub fn new() -> Self {
        PrinterOptions::default()
    }

    /// Tab width: `0` emits a tab per indent level, `n >= 1` emits `n`
    /// spaces per level.
    pub fn indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }

    /// Places `&&`/`||`/`|` at the start of the continuation line instead of
    /// the end of the line it follows.
    pub fn binary_next_line(mut self, on: bool) -> Self {
        self.binary_next_line = on;
        self
    }

    /// Indents `case` arms one extra level inside their `case ... esac`.
    pub fn switch_case_indent(mut self, on: bool) -> Self {
        self.switch_case_indent = on;
        self
    }

    /// Emits `> file` instead of `>file`.
    pub fn space_redirects(mut self, on: bool) -> Self {
        self.space_redirects = on;
        self
    }

    /// Preserves multi-space alignment between tokens and inline comments.
    pub fn keep_padding(mut self, on: bool) -> Self {
        self.keep_padding = on;
        self
    }

    /// Strips all non-mandatory whitespace and comments.
    pub fn minify(mut self, on: bool) -> Self {
        self.minify = on;
        self
    }

    /// Collapses a compound command's body to one line where semantically
    /// equivalent (forbidden, per statement, when a heredoc or unescaped
    /// literal newline is present -- the printer falls back to multi-line
    /// for that statement only).
    pub fn single_line(mut self, on: bool) -> Self {
        self.single_line = on;
        self
    }

    /// Places a function's opening `{` on the line after its header.
    pub fn function_next_line(mut self, on: bool) -> Self {
        self.function_next_line = on;
        self
    }

    /// Honors comment nodes. When `false`, comments are silently dropped
    /// even if the tree carries them.
    pub fn keep_comments(mut self, on: bool) -> Self {
        self.keep_comments = on;
        self
    }
}
