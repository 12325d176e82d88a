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

//! The brace-expansion splitter.
//!
//! [`split`] is a pure function of a single [`Word`]: it never touches the
//! lexer, the parser, or any other tree. It only looks at the word's
//! contiguous runs of unquoted [`WordPart::Lit`] text, since `{a,b}` and
//! `{x..y}` are only recognized there -- a brace sequence inside a quoted
//! part is already frozen as literal text by the time it reaches here.
//! Non-literal parts (parameter expansions, command substitutions, ...) are
//! carried through unchanged and cloned into every alternative.
//!
//! Malformed brace syntax (an unterminated `{`, or one with neither a `,`
//! nor a valid `..` range inside it) is left untouched: the input word comes
//! back as the only element of the result.

use crate::syntax::{Word, WordPart};

/// Splits `word` into its brace-expansion alternatives.
///
/// Returns `vec![word.clone()]` if `word` contains no valid brace
/// construct.
#[must_use]
pub fn split(word: &Word) -> Vec<Word> {
    let segments = segment(word);
    let mut alternatives: Vec<Vec<WordPart>> = vec![vec![]];

    for seg in segments {
        let variants: Vec<WordPart> = match seg {
            Segment::Fixed(part) => vec![part],
            Segment::Text(text) => expand_text(&text).into_iter().map(WordPart::Lit).collect(),
        };
        let mut next = Vec::with_capacity(alternatives.len() * variants.len());
        for prefix in &alternatives {
            for variant in &variants {
                let mut parts = prefix.clone();
                parts.push(variant.clone());
                next.push(parts);
            }
        }
        alternatives = next;
    }

    alternatives
        .into_iter()
        .map(|parts| Word {
            pos: word.pos,
            end: word.end,
            parts,
        })
        .collect()
}

enum Segment {
    Fixed(WordPart),
    Text(String),
}

/// Groups `word`'s parts into fixed (non-literal) parts and merged runs of
/// literal text, preserving order.
fn segment(word: &Word) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut run = String::new();
    for part in &word.parts {
        match part {
            WordPart::Lit(s) => run.push_str(s),
            other => {
                if !run.is_empty() {
                    out.push(Segment::Text(std::mem::take(&mut run)));
                }
                out.push(Segment::Fixed(other.clone()));
            }
        }
    }
    if !run.is_empty() || out.is_empty() {
        out.push(Segment::Text(run));
    }
    out
}

/// Expands one run of literal text, recursively, into its alternatives.
fn expand_text(s: &str) -> Vec<String> {
    let Some((open, close)) = find_top_level_brace(s) else {
        return vec![s.to_owned()];
    };

    let prefix = &s[..open];
    let body = &s[open + 1..close];
    let suffix = &s[close + 1..];

    let alts: Vec<String> = match parse_range(body) {
        Some(range) => range,
        None => {
            let items = split_top_level_commas(body);
            if items.len() < 2 {
                return vec![s.to_owned()];
            }
            items.into_iter().map(str::to_owned).collect()
        }
    };

    let suffix_variants = expand_text(suffix);
    let mut out = Vec::new();
    for alt in &alts {
        for alt_variant in expand_text(alt) {
            for suffix_variant in &suffix_variants {
                out.push(format!("{prefix}{alt_variant}{suffix_variant}"));
            }
        }
    }
    out
}

/// Finds the leftmost unescaped `{` and its matching `}`, accounting for
/// nested brace depth. Returns `None` if there is no unescaped `{`, or the
/// first one found is never closed (bash then treats it as ordinary text,
/// and so does this implementation).
fn find_top_level_brace(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'{' => {
                let mut depth = 1usize;
                let mut j = i + 1;
                while j < bytes.len() {
                    match bytes[j] {
                        b'\\' => j += 2,
                        b'{' => {
                            depth += 1;
                            j += 1;
                        }
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                return Some((i, j));
                            }
                            j += 1;
                        }
                        _ => j += 1,
                    }
                }
                return None;
            }
            _ => i += 1,
        }
    }
    None
}

/// Splits `body` on commas that are not nested inside a deeper `{...}`.
fn split_top_level_commas(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                items.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    items.push(&body[start..]);
    items
}

/// Recognizes `X..Y` or `X..Y..Z`, numeric or single-letter. A zero step
/// (e.g. `"a{1..4..0}"`) is treated as 1, in whichever direction `X..Y`
/// already implies.
fn parse_range(body: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = body.split("..").collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    if let (Ok(start), Ok(end)) = (parts[0].parse::<i64>(), parts[1].parse::<i64>()) {
        let step = numeric_step(parts.get(2).copied());
        return Some(integer_range(start, end, step).map(|v| v.to_string()).collect());
    }

    let (mut c0, mut c1) = (parts[0].chars(), parts[1].chars());
    if let (Some(a), None, Some(b), None) = (c0.next(), c0.next(), c1.next(), c1.next()) {
        if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() {
            let step = numeric_step(parts.get(2).copied());
            return Some(
                integer_range(a as i64, b as i64, step)
                    .map(|v| ((v as u8) as char).to_string())
                    .collect(),
            );
        }
    }
    None
}

fn numeric_step(raw: Option<&str>) -> i64 {
    let step = raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(1);
    if step == 0 {
        1
    } else {
        step.abs()
    }
}

fn integer_range(start: i64, end: i64, step: i64) -> Box<dyn Iterator<Item = i64>> {
    if start <= end {
        Box::new((start..=end).step_by(step as usize))
    } else {
        Box::new((end..=start).step_by(step as usize).rev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Pos;

    fn lit(s: &str) -> Word {
        Word {
            pos: Pos::UNKNOWN,
            end: Pos::UNKNOWN,
            parts: vec![WordPart::Lit(s.to_owned())],
        }
    }

    fn lits(words: &[Word]) -> Vec<&str> {
        words.iter().map(|w| w.as_lit().unwrap()).collect()
    }

    #[test]
    fn comma_list() {
        let out = split(&lit("a{b,c}d"));
        assert_eq!(lits(&out), vec!["abd", "acd"]);
    }

    #[test]
    fn numeric_range() {
        let out = split(&lit("a{1..3}"));
        assert_eq!(lits(&out), vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn zero_step_treated_as_one_upward() {
        let out = split(&lit("a{1..4..0}"));
        assert_eq!(lits(&out), vec!["a1", "a2", "a3", "a4"]);
    }

    #[test]
    fn descending_range() {
        let out = split(&lit("{3..1}"));
        assert_eq!(lits(&out), vec!["3", "2", "1"]);
    }

    #[test]
    fn alphabetic_range() {
        let out = split(&lit("{a..c}"));
        assert_eq!(lits(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_braces_return_input_unchanged() {
        let w = lit("a{bc");
        let out = split(&w);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_lit(), Some("a{bc"));

        let w = lit("a{bc}d");
        let out = split(&w);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_lit(), Some("a{bc}d"));
    }

    #[test]
    fn nested_braces_multiply() {
        let out = split(&lit("a{b,c{d,e}}f"));
        let mut texts = lits(&out);
        texts.sort_unstable();
        assert_eq!(texts, vec!["abf", "acdf", "acef"]);
    }

    #[test]
    fn non_literal_parts_are_preserved_in_every_alternative() {
        let w = Word {
            pos: Pos::UNKNOWN,
            end: Pos::UNKNOWN,
            parts: vec![
                WordPart::Lit("a{b,c}".to_owned()),
                WordPart::SglQuoted("Q".to_owned()),
            ],
        };
        let out = split(&w);
        assert_eq!(out.len(), 2);
        for word in &out {
            assert!(matches!(word.parts.last(), Some(WordPart::SglQuoted(s)) if s == "Q"));
        }
    }
}
