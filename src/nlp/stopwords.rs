//! Stopword filtering
//!
//! A mutable stopword set shared by corpus construction. The model
//! inserts very short tokens into the set as it encounters them, so the
//! filter stays writable after creation.

use rustc_hash::FxHashSet;

/// Built-in English stopword list
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// A set of words excluded from topic modeling
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    words: FxHashSet<String>,
}

impl StopwordFilter {
    /// Create an empty filter
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a filter seeded with the built-in English list
    pub fn english() -> Self {
        Self {
            words: ENGLISH.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Builder method: extend the filter with additional words
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Add a single word, returning whether it was newly inserted
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    /// Check whether a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words in the filter
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list() {
        let filter = StopwordFilter::english();
        assert!(filter.is_stopword("the"));
        assert!(filter.is_stopword("and"));
        assert!(!filter.is_stopword("topic"));
    }

    #[test]
    fn test_empty_filter() {
        let filter = StopwordFilter::empty();
        assert!(filter.is_empty());
        assert!(!filter.is_stopword("the"));
    }

    #[test]
    fn test_with_words() {
        let filter = StopwordFilter::english().with_words(["lorem", "ipsum"]);
        assert!(filter.is_stopword("lorem"));
        assert!(filter.is_stopword("ipsum"));
        assert!(filter.is_stopword("the"));
    }

    #[test]
    fn test_insert() {
        let mut filter = StopwordFilter::empty();
        assert!(filter.insert("ab"));
        assert!(!filter.insert("ab")); // already present
        assert!(filter.is_stopword("ab"));
        assert_eq!(filter.len(), 1);
    }
}
