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

//! End-to-end scenarios spanning the lexer, parser and printer together.
//! Colocated `#[cfg(test)]` modules inside each source file cover one
//! module's own behavior; this suite covers the cross-cutting universal
//! properties and concrete scenarios that only make sense once the whole
//! pipeline is wired up.

use assert_matches::assert_matches;

use shell_syntax::brace_expand;
use shell_syntax::parser::{ErrorCode, Parser};
use shell_syntax::printer::Printer;
use shell_syntax::syntax::{Command, File, WordPart};
use shell_syntax::token::LangVariant;

fn parse(src: &str, variant: LangVariant) -> File {
    Parser::new(src.as_bytes(), variant).parse_file("").unwrap()
}

fn print(file: &File) -> String {
    let mut out = Vec::new();
    Printer::new().print(&mut out, file).unwrap();
    String::from_utf8(out).unwrap()
}

// -- universal property 1/2: positions are well-formed --

#[test]
fn every_statement_end_is_at_or_after_its_start() {
    let file = parse("foo; if a\nthen b\nfi; bar | baz", LangVariant::Posix);
    for stmt in &file.statements {
        assert!(stmt.end >= stmt.pos, "{:?} ends before it starts", stmt);
    }
}

#[test]
fn word_positions_stay_inside_the_source_range() {
    let src = "echo hello world";
    let file = parse(src, LangVariant::Posix);
    let Some(Command::Call(call)) = file.statements[0].command.as_ref() else {
        panic!("expected a call");
    };
    for word in &call.words {
        assert!(word.pos.offset() <= src.len());
        assert!(word.end.offset() <= src.len() + 1);
    }
}

// -- universal property 3/4: idempotent formatting --

#[test]
fn reparsing_the_canonical_form_reaches_the_same_tree_shape() {
    for src in [
        "foo; bar",
        "if a\nthen b\nfi",
        "for i in 1 2 3\ndo echo $i\ndone",
        "case $x in\nfoo)bar;;\nesac",
        "foo | bar && baz",
    ] {
        let first = parse(src, LangVariant::Posix);
        let once = print(&first);
        let second = parse(&once, LangVariant::Posix);
        let twice = print(&second);
        assert_eq!(once, twice, "printing is not idempotent for {src:?}");
        assert_eq!(
            second.statements.len(),
            first.statements.len(),
            "reparse changed the statement count for {src:?}"
        );
    }
}

// -- universal property 5: dialect gating --

#[test]
fn double_bracket_test_is_rejected_under_posix() {
    let err = Parser::new(b"[[ a ]]", LangVariant::Posix).parse_file("").unwrap_err();
    assert_matches!(
        err.code,
        ErrorCode::FeatureNotInLang { feature: "[[ ]]", tried: LangVariant::Posix, .. }
    );
    assert_eq!(err.pos.line(), 1);
    assert_eq!(err.pos.column(), 1);
}

#[test]
fn double_bracket_test_is_accepted_under_bash() {
    let file = parse("[[ -n $a ]]", LangVariant::Bash);
    assert_matches!(file.statements[0].command, Some(Command::TestClause(_)));
}

// -- universal property 6: comment coverage --

#[test]
fn comments_are_attached_up_to_but_not_including_the_newline() {
    let file = Parser::new(b"foo # a comment\n", LangVariant::Posix)
        .parse_file("")
        .unwrap();
    let inline = file.statements[0].inline_comment.as_ref().expect("inline comment");
    assert_eq!(inline.text, " a comment");
}

#[test]
fn disabling_comments_drops_every_comment_node() {
    let file = Parser::new(b"# leading\nfoo # inline\n", LangVariant::Posix)
        .keep_comments(false)
        .parse_file("")
        .unwrap();
    assert!(file.statements[0].comments.is_empty());
    assert!(file.statements[0].inline_comment.is_none());
}

// -- universal property 7: heredoc byte fidelity --

#[test]
fn unquoted_heredoc_body_concatenates_to_the_original_bytes() {
    let file = parse("cat <<EOF\nhello $name\nEOF\n", LangVariant::Posix);
    let redirect = &file.statements[0].redirects[0];
    let shell_syntax::syntax::RedirTarget::HereDoc(heredoc) = &redirect.target else {
        panic!("expected a heredoc target");
    };
    let joined: String = heredoc
        .body
        .parts
        .iter()
        .map(|p| match p {
            WordPart::Lit(s) => s.clone(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(joined, "hello $name\n");
}

#[test]
fn dash_heredoc_strips_only_leading_tabs() {
    let file = parse("cat <<-EOF\n\t\tindented\nEOF\n", LangVariant::Posix);
    let redirect = &file.statements[0].redirects[0];
    let shell_syntax::syntax::RedirTarget::HereDoc(heredoc) = &redirect.target else {
        panic!("expected a heredoc target");
    };
    assert!(heredoc.dash);
    let text = heredoc.body.as_lit().expect("raw heredoc text");
    assert_eq!(text, "indented\n");
}

#[test]
fn round_tripped_heredoc_still_prints_its_body_verbatim() {
    let file = parse("cat <<EOF\nbar\nEOF", LangVariant::Posix);
    assert_eq!(print(&file), "cat <<EOF\nbar\nEOF\n");
}

// -- universal property 8: brace expansion is pure and total --

#[test]
fn brace_expansion_is_a_pure_function_of_the_word() {
    let file = parse("echo a{b,c}d", LangVariant::Bash);
    let Some(Command::Call(call)) = file.statements[0].command.as_ref() else {
        panic!("expected a call");
    };
    let expanded = brace_expand::split(&call.words[1]);
    let texts: Vec<&str> = expanded.iter().map(|w| w.as_lit().unwrap()).collect();
    assert_eq!(texts, vec!["abd", "acd"]);

    // calling split again on the same (unmodified) word gives the same
    // answer -- it never mutates its input or hidden state.
    let expanded_again = brace_expand::split(&call.words[1]);
    let texts_again: Vec<&str> = expanded_again.iter().map(|w| w.as_lit().unwrap()).collect();
    assert_eq!(texts, texts_again);
}

// -- concrete end-to-end scenarios --

#[test]
fn sequence_of_two_commands_becomes_one_statement_per_line() {
    assert_eq!(print(&parse("foo; bar", LangVariant::Posix)), "foo\nbar\n");
}

#[test]
fn if_then_collapses_its_header_onto_one_line() {
    assert_eq!(
        print(&parse("if a\nthen b\nfi", LangVariant::Posix)),
        "if a; then\n\tb\nfi\n"
    );
}

#[test]
fn case_clause_canonicalizes_pattern_grouping() {
    let file = parse("case $i in\n1)foo;;\n2|3*)bar;;\nesac", LangVariant::Bash);
    let Some(Command::Case(case)) = file.statements[0].command.as_ref() else {
        panic!("expected a case command");
    };
    let pattern_texts: Vec<Vec<&str>> = case
        .items
        .iter()
        .map(|item| item.patterns.iter().map(|w| w.as_lit().unwrap()).collect())
        .collect();
    assert_eq!(pattern_texts, vec![vec!["1"], vec!["2", "3*"]]);
}
