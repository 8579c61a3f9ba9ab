//! Word tokenizer for the TF-IDF vectorizer

use regex::Regex;
use std::sync::LazyLock;

/// Runs of two or more word characters. Single letters and digits are not terms.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    lowercase: bool,
}

impl Tokenizer {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if self.lowercase {
            let lowered = text.to_lowercase();
            Self::split(&lowered)
        } else {
            Self::split(text)
        }
    }

    fn split(text: &str) -> Vec<String> {
        TOKEN_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}
