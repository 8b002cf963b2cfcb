//! Unicode-aware tokenization
//!
//! This module provides UAX #29 compliant word segmentation reduced to
//! runs of Unicode letters, the token shape the sampler models.

use unicode_segmentation::UnicodeSegmentation;

/// A Unicode-aware tokenizer producing lowercased letter-run tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self
    }

    /// Tokenize text into lowercased letter runs.
    ///
    /// Each UAX #29 word is reduced to its maximal runs of Unicode
    /// letters, so `"alpha3beta"` yields `["alpha", "beta"]` and
    /// digit-only or punctuation-only words yield nothing. Contractions
    /// split at the apostrophe (`"don't"` → `["don", "t"]`).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in text.unicode_words() {
            let mut run = String::new();
            for c in word.chars() {
                if c.is_alphabetic() {
                    run.extend(c.to_lowercase());
                } else if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
            }
            if !run.is_empty() {
                tokens.push(run);
            }
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello world. This is a test.");

        assert_eq!(tokens, vec!["hello", "world", "this", "is", "a", "test"]);
    }

    #[test]
    fn test_lowercasing() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("ALPHA Beta gAmMa");

        assert_eq!(tokens, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_digits_split_letter_runs() {
        let tokenizer = Tokenizer::new();

        assert_eq!(tokenizer.tokenize("alpha3beta"), vec!["alpha", "beta"]);
        assert!(tokenizer.tokenize("12345").is_empty());
        assert_eq!(tokenizer.tokenize("v2 engine"), vec!["v", "engine"]);
    }

    #[test]
    fn test_contractions_split() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("don't we're");

        assert_eq!(tokens, vec!["don", "t", "we", "re"]);
    }

    #[test]
    fn test_unicode_handling() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Café résumé naïve");

        assert_eq!(tokens, vec!["café", "résumé", "naïve"]);
    }

    #[test]
    fn test_punctuation_only() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("... --- !!!").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \n\t ").is_empty());
    }
}
