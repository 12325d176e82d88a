//! Quoting of strings for shell script generation.
//!
//! [`quote`] turns an arbitrary string into a shell word that, when parsed by
//! the requested [`Dialect`], expands back to the original string as a single
//! field. Quoting rules are shared across dialects (all are POSIX-rooted),
//! but [`quote`] is fallible because a string containing a NUL byte cannot be
//! represented as a shell word in any dialect.
//!
//! # Decision rules
//!
//! - If the string is non-empty and contains no character that needs
//!   quoting, it is returned unchanged.
//! - Otherwise, if the string contains no single quote, the whole string is
//!   single-quoted.
//! - Otherwise, the whole string is double-quoted, with `"`, `` ` ``, `$` and
//!   `\` backslash-escaped.
//!
//! The following need quoting:
//!
//! - `;`, `&`, `|`, `(`, `)`, `<`, `>`
//! - whitespace (space, tab, newline, ...)
//! - `$`, `` ` ``, `\`, `"`, `'`
//! - `=`, `*`, `?`
//! - `#` or `~` at the start of the string
//! - `{` preceding a `}`
//! - `[` preceding a `]`
//!
//! # Examples
//!
//! ```
//! use shell_quote::{quote, Dialect};
//! use std::borrow::Cow::{Borrowed, Owned};
//!
//! assert_eq!(quote("foo", Dialect::Bash).unwrap(), Borrowed("foo"));
//! assert_eq!(quote("bar $baz", Dialect::Bash).unwrap(), Owned::<str>("'bar $baz'".to_owned()));
//! assert_eq!(quote("won't", Dialect::Bash).unwrap(), Owned::<str>("\"won't\"".to_owned()));
//! assert!(quote("foo\u{0}", Dialect::Bash).is_err());
//! ```

use std::borrow::Cow::{self, Borrowed, Owned};
use thiserror::Error;

/// Shell dialect a quoted string is destined for.
///
/// All dialects currently share the same quoting rules; the parameter exists
/// so callers can thread a single [`Dialect`] value through quoting and
/// parsing without the two falling out of sync, and so future dialect-only
/// quoting quirks have somewhere to live.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Dialect {
    /// Plain POSIX shell
    Posix,
    /// Bash
    Bash,
    /// mksh / the Korn shell family
    MirBSDKorn,
    /// zsh
    Zsh,
}

/// Error produced by [`quote`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum QuoteError {
    /// The input contains a NUL byte, which cannot appear in a shell word.
    #[error("string contains a NUL byte, which cannot be quoted")]
    NullByte,
}

/// Quotes `s` so it parses back as a single word under `dialect`.
///
/// Returns `Borrowed(s)` if no quoting is needed, `Owned(_)` otherwise. See
/// the [module documentation](self) for the decision rules.
///
/// # Errors
///
/// Returns [`QuoteError::NullByte`] if `s` contains a NUL byte.
pub fn quote(s: &str, dialect: Dialect) -> Result<Cow<'_, str>, QuoteError> {
    let _ = dialect; // rules are currently dialect-independent
    if s.contains('\0') {
        return Err(QuoteError::NullByte);
    }

    if !s.is_empty() && !str_needs_quoting(s) {
        return Ok(Borrowed(s));
    }

    if !s.contains('\'') {
        return Ok(Owned(format!("'{s}'")));
    }

    let mut result = String::with_capacity(s.len().saturating_add(8));
    result.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    Ok(Owned(result))
}

fn str_needs_quoting(s: &str) -> bool {
    if s.chars().any(char_needs_quoting) {
        return true;
    }

    if matches!(s.chars().next(), Some('#' | '~')) {
        return true;
    }

    if let Some(i) = s.find('{') {
        if s[i + 1..].contains('}') {
            return true;
        }
    }

    if let Some(i) = s.find('[') {
        if s[i + 1..].contains(']') {
            return true;
        }
    }

    false
}

fn char_needs_quoting(c: char) -> bool {
    match c {
        ';' | '&' | '|' | '(' | ')' | '<' | '>' => true,
        '$' | '`' | '\\' | '"' | '\'' | '=' | '*' | '?' => true,
        _ => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_quoting_needed() {
        for s in ["a", "z", "_", "!#%+,-./:@^~", "{", "{x", "}", "x}", "[", "[x", "]", "x]"] {
            assert_eq!(quote(s, Dialect::Posix).unwrap(), Borrowed(s));
        }
    }

    #[test]
    fn single_quoted() {
        assert_eq!(quote("", Dialect::Bash).unwrap(), Owned::<str>("''".to_owned()));
        for c in ";&|()<> \t\n$`\\\"=*?#~".chars() {
            let s = c.to_string();
            assert_eq!(quote(&s, Dialect::Bash).unwrap(), Owned::<str>(format!("'{s}'")));
        }
        assert_eq!(quote("{}", Dialect::Bash).unwrap(), Owned::<str>("'{}'".to_owned()));
        assert_eq!(quote("[a]", Dialect::Bash).unwrap(), Owned::<str>("'[a]'".to_owned()));
    }

    #[test]
    fn double_quoted() {
        assert_eq!(quote("won't", Dialect::Bash).unwrap(), Owned::<str>("\"won't\"".to_owned()));
        assert_eq!(quote("'$foo'", Dialect::Zsh).unwrap(), Owned::<str>(r#""'\$foo'""#.to_owned()));
    }

    #[test]
    fn null_byte_is_rejected() {
        assert_matches::assert_matches!(quote("foo\0", Dialect::Bash), Err(QuoteError::NullByte));
        assert_matches::assert_matches!(quote("\0", Dialect::Posix), Err(QuoteError::NullByte));
    }

    #[test]
    fn dialect_does_not_change_output_today() {
        for d in [Dialect::Posix, Dialect::Bash, Dialect::MirBSDKorn, Dialect::Zsh] {
            assert_eq!(quote("plain", d).unwrap(), Borrowed("plain"));
        }
    }
}
