//! Build lookup key dispatch

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// How to find a build: by number or by ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildLookup {
    /// Match on build number
    Number(u64),
    /// Match on build ID (hash)
    Id(String),
}

fn numeric_key() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(r"^[0-9]+$").expect("hardcoded numeric pattern is valid"))
}

impl BuildLookup {
    /// Interpret a user-supplied key
    ///
    /// Keys made only of ASCII digits are build numbers; anything else is an
    /// ID. A number too large for `u64` saturates, which no build can match.
    pub fn parse(key: &str) -> Self {
        if numeric_key().is_match(key) {
            Self::Number(key.parse().unwrap_or(u64::MAX))
        } else {
            Self::Id(key.to_string())
        }
    }
}

impl fmt::Display for BuildLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "number {number}"),
            Self::Id(id) => write!(f, "id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_are_numbers() {
        assert_eq!(BuildLookup::parse("20240601"), BuildLookup::Number(20_240_601));
        assert_eq!(BuildLookup::parse("12345"), BuildLookup::Number(12345));
    }

    #[test]
    fn test_hashes_are_ids() {
        assert_eq!(
            BuildLookup::parse("f00dcafe"),
            BuildLookup::Id("f00dcafe".to_string())
        );
        assert_eq!(
            BuildLookup::parse("a1b2c3"),
            BuildLookup::Id("a1b2c3".to_string())
        );
    }

    #[test]
    fn test_mixed_and_signed_keys_are_ids() {
        assert!(matches!(BuildLookup::parse("-12"), BuildLookup::Id(_)));
        assert!(matches!(BuildLookup::parse("12 "), BuildLookup::Id(_)));
        assert!(matches!(BuildLookup::parse(""), BuildLookup::Id(_)));
    }

    #[test]
    fn test_non_ascii_digits_are_ids() {
        // Arabic-Indic digits
        assert!(matches!(BuildLookup::parse("١٢٣"), BuildLookup::Id(_)));
    }

    #[test]
    fn test_overflowing_number_saturates() {
        assert_eq!(
            BuildLookup::parse("99999999999999999999999"),
            BuildLookup::Number(u64::MAX)
        );
    }
}
