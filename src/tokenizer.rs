use crate::normalizer::Normalizer;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
            "by", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
            "did", "will", "would", "could", "should",
        ]
        .iter()
        .copied()
        .collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    normalizer: Normalizer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_normalizer(Normalizer::new())
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Split text into words on any run of non letter/digit characters
    fn split(&self, text: &str) -> Vec<String> {
        text.chars()
            .fold(vec![String::new()], |mut tokens, c| {
                if c.is_alphanumeric() {
                    if let Some(last) = tokens.last_mut() {
                        last.push(c);
                    }
                } else if tokens.last().map_or(false, |s| !s.is_empty()) {
                    tokens.push(String::new());
                }
                tokens
            })
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Convert tokens to lowercase
    fn lowercase_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().map(|t| t.to_lowercase()).collect()
    }

    /// Remove single-character tokens and stopwords
    fn stopword_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| t.chars().nth(1).is_some() && !is_stopword(t))
            .collect()
    }

    /// Apply suffix stripping
    fn normalize_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .map(|t| self.normalizer.normalize(&t))
            .collect()
    }

    /// Lowercase word tokens in input order, stopwords removed.
    ///
    /// The index of a token in the returned sequence is its position.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens = self.split(text);
        let tokens = self.lowercase_filter(tokens);
        self.stopword_filter(tokens)
    }

    /// Full analysis pipeline: tokenize then normalize each token
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        self.normalize_filter(tokens)
    }
}
