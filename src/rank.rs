//! Topic/word ranking
//!
//! Built once when a fit completes and cached on the model: for each
//! topic, the words carrying a non-zero count, sorted descending by
//! that count. The sort is stable, so ties keep vocabulary discovery
//! order.

use crate::corpus::{Vocabulary, WordId};
use crate::counts::CountStore;

/// Cached per-topic word rankings of a fitted model
#[derive(Debug, Clone)]
pub struct TopicWordRanks {
    per_topic: Vec<Vec<(WordId, u32)>>,
}

impl TopicWordRanks {
    /// Rank every (word, topic) pair with a non-zero count.
    pub fn build(vocabulary: &Vocabulary, counts: &CountStore) -> Self {
        let num_topics = counts.num_topics();
        let mut per_topic: Vec<Vec<(WordId, u32)>> = vec![Vec::new(); num_topics];

        // Walk words in id order so equal counts keep discovery order
        // under the stable sort below.
        for word in 0..vocabulary.len() as WordId {
            for (topic, &count) in counts.topic_row(word).iter().enumerate() {
                if count > 0 {
                    per_topic[topic].push((word, count));
                }
            }
        }

        for ranking in &mut per_topic {
            ranking.sort_by(|a, b| b.1.cmp(&a.1));
        }

        Self { per_topic }
    }

    /// The ranked `(word, count)` list for one topic
    pub fn words(&self, topic: usize) -> &[(WordId, u32)] {
        &self.per_topic[topic]
    }

    /// The top `n` words of a topic joined space-delimited
    pub fn top_words(&self, topic: usize, n: usize, vocabulary: &Vocabulary) -> String {
        let mut out = String::new();
        for (i, &(word, _)) in self.per_topic[topic].iter().take(n).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(vocabulary.word(word));
        }
        out
    }
}
