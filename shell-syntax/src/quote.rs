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

//! Bridges [`LangVariant`] to the sibling [`shell_quote`] crate's
//! [`Dialect`](shell_quote::Dialect), so callers that already hold the
//! parser's dialect selector do not need to import and convert it
//! themselves.

pub use shell_quote::{quote, QuoteError};

use crate::token::LangVariant;
use shell_quote::Dialect;

impl From<LangVariant> for Dialect {
    fn from(variant: LangVariant) -> Self {
        match variant {
            LangVariant::Posix => Dialect::Posix,
            LangVariant::Bash | LangVariant::Bats => Dialect::Bash,
            LangVariant::MirBSDKorn => Dialect::MirBSDKorn,
            LangVariant::Zsh => Dialect::Zsh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow::Owned;

    #[test]
    fn lang_variant_maps_to_dialect() {
        assert_eq!(Dialect::from(LangVariant::Bats), Dialect::Bash);
        assert_eq!(Dialect::from(LangVariant::MirBSDKorn), Dialect::MirBSDKorn);
    }

    #[test]
    fn quote_is_reexported() {
        assert_eq!(
            quote("bar $baz", LangVariant::Bash.into()).unwrap(),
            Owned::<str>("'bar $baz'".to_owned())
        );
    }
}
