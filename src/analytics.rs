//! Vocabulary analytics over a fitted model
//!
//! Entropy and specificity describe how concentrated a word's topic
//! assignments are; `most_frequent_words` produces the ranked
//! vocabulary slices served by the query API.

use crate::corpus::{Vocabulary, WordId};
use crate::counts::CountStore;
use crate::types::VocabularyEntry;

/// Rankings are cut to this many words before per-word analytics run
pub const MAX_RANKED_WORDS: usize = 499;

/// Shannon entropy in nats over the strictly positive entries of
/// `counts`, computed as `ln(Σc) − (1/Σc)·Σ(c·ln c)`. Zero for an
/// all-zero vector.
pub fn entropy(counts: &[u32]) -> f64 {
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    let mut weighted = 0.0;
    for &c in counts {
        if c > 0 {
            let c = c as f64;
            weighted += c * c.ln();
        }
    }
    total.ln() - weighted / total
}

/// How concentrated a word's assignments are in a single topic:
/// `1 − entropy / ln(K)`, clamped to `[0, 1]`.
///
/// A word that was never modeled scores 0. With a single topic every
/// modeled word is trivially concentrated and scores 1.
pub fn specificity(topic_counts: &[u32], num_topics: usize) -> f64 {
    let total: u64 = topic_counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }
    if num_topics <= 1 {
        return 1.0;
    }
    (1.0 - entropy(topic_counts) / (num_topics as f64).ln()).clamp(0.0, 1.0)
}

/// Rank the vocabulary by frequency.
///
/// With `topic` given, words are ranked by their count within that
/// topic; otherwise by global raw frequency (stopword occurrences
/// included). The ranking is truncated to [`MAX_RANKED_WORDS`] before
/// specificity is computed for the survivors.
pub fn most_frequent_words(
    vocabulary: &Vocabulary,
    counts: &CountStore,
    include_stopwords: bool,
    topic: Option<usize>,
) -> Vec<VocabularyEntry> {
    let mut ranked: Vec<(WordId, u64)> = (0..vocabulary.len() as WordId)
        .filter(|&word| include_stopwords || !vocabulary.is_stopword(word))
        .map(|word| {
            let count = match topic {
                Some(t) => counts.topic_row(word)[t] as u64,
                None => vocabulary.raw_count(word),
            };
            (word, count)
        })
        .collect();

    // Stable sort keeps discovery order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_RANKED_WORDS);

    let num_topics = counts.num_topics();
    ranked
        .into_iter()
        .map(|(word, count)| VocabularyEntry {
            word: vocabulary.word(word).to_string(),
            count,
            is_stopword: vocabulary.is_stopword(word),
            specificity: specificity(counts.topic_row(word), num_topics),
        })
        .collect()
}
