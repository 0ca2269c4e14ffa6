//! Crude suffix-stripping normalizer.
//!
//! This is deliberately not a linguistic stemmer: it removes at most one
//! suffix from a fixed list, tried in list order, so "encryption" becomes
//! "encrypt" via "ion" before "tion" is ever considered. Query terms and
//! indexed terms go through the same normalizer, so the approximation is
//! consistent on both sides.

use serde::{Deserialize, Serialize};

/// Suffixes tried in order; the first match wins.
pub const DEFAULT_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "ion", "tion", "sion", "ness", "ment",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Normalizer {
    suffixes: Vec<String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_suffixes(DEFAULT_SUFFIXES.iter().copied())
    }

    pub fn with_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Reduce a lowercase token to its stem.
    ///
    /// A suffix is only stripped when the token is longer than the suffix
    /// plus two characters, so the stem never drops below three characters.
    pub fn normalize(&self, token: &str) -> String {
        let token_len = token.chars().count();

        for suffix in &self.suffixes {
            if token.ends_with(suffix.as_str()) && token_len > suffix.chars().count() + 2 {
                return token[..token.len() - suffix.len()].to_string();
            }
        }

        token.to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_first_matching_suffix() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("reporting"), "report");
        assert_eq!(normalizer.normalize("classified"), "classifi");
        assert_eq!(normalizer.normalize("quickly"), "quick");
        assert_eq!(normalizer.normalize("awareness"), "aware");
        // "ion" is listed before "tion"
        assert_eq!(normalizer.normalize("encryption"), "encrypt");
    }

    #[test]
    fn test_strips_at_most_one_suffix() {
        let normalizer = Normalizer::new();
        // "ing" matches first; "ed" left behind is not stripped
        assert_eq!(normalizer.normalize("seeding"), "seed");
        assert_eq!(normalizer.normalize("lovelier"), "loveli");
    }

    #[test]
    fn test_short_tokens_are_untouched() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("ring"), "ring");
        assert_eq!(normalizer.normalize("bed"), "bed");
        assert_eq!(normalizer.normalize("ed"), "ed");
        assert_eq!(normalizer.normalize("sing"), "sing");
        assert_eq!(normalizer.normalize("bring"), "bring");
        assert_eq!(normalizer.normalize("bringing"), "bring");
    }

    #[test]
    fn test_unmatched_token_is_returned_unchanged() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("password"), "password");
        assert_eq!(normalizer.normalize("vpn"), "vpn");
    }

    #[test]
    fn test_custom_suffixes() {
        let normalizer = Normalizer::with_suffixes(["s", ""]);
        assert_eq!(normalizer.suffixes(), &["s".to_string()]);
        assert_eq!(normalizer.normalize("passwords"), "password");
        assert_eq!(normalizer.normalize("reporting"), "reporting");
    }

    #[test]
    fn test_multibyte_tokens() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("déjàing"), "déjà");
        assert_eq!(normalizer.normalize("éing"), "éing");
    }
}
