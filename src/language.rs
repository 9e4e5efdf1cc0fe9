//! The closed set of language identifiers the engine accepts
//!
//! Identifiers are versioned by
//! [`LANGUAGE_SET_VERSION`](crate::interpreter::constants::LANGUAGE_SET_VERSION).
//! Catalog languages whose "interpreter" only extracts printable literals are not
//! part of the set and fail to parse with [`UnknownLanguage`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Brainfuck,
    Ook,
    Befunge,
    Whitespace,
    False,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language identifier '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::Brainfuck,
            Language::Ook,
            Language::Befunge,
            Language::Whitespace,
            Language::False,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            Language::Brainfuck => "brainfuck",
            Language::Ook => "ook",
            Language::Befunge => "befunge",
            Language::Whitespace => "whitespace",
            Language::False => "false",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Language::Brainfuck => "Brainfuck",
            Language::Ook => "Ook!",
            Language::Befunge => "Befunge",
            Language::Whitespace => "Whitespace",
            Language::False => "FALSE",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!("brainfuck".parse::<Language>(), Ok(Language::Brainfuck));
        assert_eq!("Befunge".parse::<Language>(), Ok(Language::Befunge));
        assert_eq!(" false ".parse::<Language>(), Ok(Language::False));
    }

    #[test]
    fn test_literal_extraction_languages_are_unknown() {
        for id in ["lolcode", "arnoldc", "hq9plus", "cow", ""] {
            assert!(id.parse::<Language>().is_err(), "{id} should be rejected");
        }
    }

    #[test]
    fn test_id_round_trips_through_display() {
        for lang in Language::all() {
            assert_eq!(lang.to_string().parse::<Language>(), Ok(*lang));
        }
    }
}
