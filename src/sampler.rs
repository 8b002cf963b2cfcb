//! Collapsed Gibbs sampler
//!
//! One sweep visits every non-stopword token in document order, then
//! token order, and resamples its topic conditioned on every other
//! current assignment. The per-topic weight is
//!
//! ```text
//! weight[t] = (α + doc_topic[t]) · (β + word_topic[w][t]) / (V·β + tokens_per_topic[t])
//! ```
//!
//! The reciprocal of the denominator is cached per topic and refreshed
//! only for the retracted and committed topics, so a resample touches
//! two normalizer entries instead of K.

use crate::corpus::Document;
use crate::counts::CountStore;
use rand::Rng;

/// Assign every non-stopword token a uniformly random topic and build
/// the count tables from scratch.
///
/// Existing counts are discarded first, so this doubles as the reset
/// path when a model is re-fitted.
pub fn assign_initial_topics<R: Rng>(
    documents: &mut [Document],
    counts: &mut CountStore,
    rng: &mut R,
) {
    let num_topics = counts.num_topics();
    counts.reset();

    for doc in documents.iter_mut() {
        doc.topic_counts.fill(0);
        for token in doc.tokens.iter_mut() {
            if token.is_stopword {
                continue;
            }
            let topic = rng.gen_range(0..num_topics);
            token.topic = topic;
            counts.increment(token.word, topic);
            doc.topic_counts[topic] += 1;
        }
    }
}

/// Sweep state: smoothing constants, cached normalizers, and the
/// per-topic weight scratch buffer.
#[derive(Debug)]
pub struct GibbsSampler {
    alpha: f64,
    beta: f64,
    /// `vocabulary_size · β`, the smoothing mass of the denominator
    vocab_beta: f64,
    /// `1 / (V·β + tokens_per_topic[t])` for each topic
    normalizer: Vec<f64>,
    weights: Vec<f64>,
}

impl GibbsSampler {
    /// Build a sampler over the current counts.
    ///
    /// `vocabulary_size` is the number of distinct non-stopword word
    /// types, not the full interned vocabulary.
    pub fn new(alpha: f64, beta: f64, vocabulary_size: usize, counts: &CountStore) -> Self {
        let vocab_beta = vocabulary_size as f64 * beta;
        let normalizer = counts
            .tokens_per_topic()
            .iter()
            .map(|&n| 1.0 / (vocab_beta + n as f64))
            .collect();

        Self {
            alpha,
            beta,
            vocab_beta,
            normalizer,
            weights: vec![0.0; counts.num_topics()],
        }
    }

    /// Run one full sweep, resampling every non-stopword token once.
    pub fn sweep<R: Rng>(
        &mut self,
        documents: &mut [Document],
        counts: &mut CountStore,
        rng: &mut R,
    ) {
        let num_topics = counts.num_topics();

        for doc in documents.iter_mut() {
            for i in 0..doc.tokens.len() {
                let token = doc.tokens[i];
                if token.is_stopword {
                    continue;
                }
                let word = token.word;
                let old = token.topic;

                // Retract the token from all three tables.
                counts.decrement(word, old);
                let doc_count = &mut doc.topic_counts[old];
                assert!(
                    *doc_count > 0,
                    "document topic count underflow for topic {}",
                    old
                );
                *doc_count -= 1;

                self.normalizer[old] =
                    1.0 / (self.vocab_beta + counts.tokens_per_topic()[old] as f64);

                // Conditional weights over all topics.
                let row = counts.topic_row(word);
                let mut total = 0.0;
                for t in 0..num_topics {
                    let weight = (self.alpha + doc.topic_counts[t] as f64)
                        * (self.beta + row[t] as f64)
                        * self.normalizer[t];
                    self.weights[t] = weight;
                    total += weight;
                }

                // Inverse-CDF draw; rounding residue lands on the last topic.
                let mut remaining = rng.gen_range(0.0..total);
                let mut new_topic = num_topics - 1;
                for (t, &weight) in self.weights.iter().enumerate() {
                    remaining -= weight;
                    if remaining <= 0.0 {
                        new_topic = t;
                        break;
                    }
                }

                // Commit.
                counts.increment(word, new_topic);
                doc.topic_counts[new_topic] += 1;
                self.normalizer[new_topic] =
                    1.0 / (self.vocab_beta + counts.tokens_per_topic()[new_topic] as f64);
                doc.tokens[i].topic = new_topic;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{build_corpus, Corpus};
    use crate::nlp::stopwords::StopwordFilter;
    use crate::types::DocumentInput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_corpus(num_topics: usize) -> Corpus {
        build_corpus(
            vec![
                DocumentInput::new(1, "alpha alpha beta topics words"),
                DocumentInput::new(2, "gamma gamma delta words words"),
                DocumentInput::new(3, "alpha delta topics topics gamma"),
            ],
            StopwordFilter::empty(),
            num_topics,
        )
    }

    fn assert_counts_consistent(corpus: &Corpus, counts: &CountStore) {
        let total_nonstop: usize = corpus
            .documents
            .iter()
            .map(|d| d.nonstop_token_count())
            .sum();
        assert_eq!(counts.total_tokens(), total_nonstop as u64);

        for doc in &corpus.documents {
            let sum: u32 = doc.topic_counts.iter().sum();
            assert_eq!(sum as usize, doc.nonstop_token_count());
            for token in &doc.tokens {
                assert!(token.topic < counts.num_topics());
            }
        }

        for id in 0..corpus.vocabulary.len() as u32 {
            if corpus.vocabulary.is_stopword(id) {
                assert_eq!(counts.word_total(id), 0);
            } else {
                assert_eq!(counts.word_total(id), corpus.vocabulary.raw_count(id));
            }
        }
    }

    #[test]
    fn test_initial_assignment_populates_counts() {
        let mut corpus = sample_corpus(3);
        let mut counts = CountStore::new(corpus.vocabulary.len(), 3);
        let mut rng = StdRng::seed_from_u64(7);

        assign_initial_topics(&mut corpus.documents, &mut counts, &mut rng);
        assert_counts_consistent(&corpus, &counts);
    }

    #[test]
    fn test_sweep_preserves_invariants() {
        let mut corpus = sample_corpus(3);
        let mut counts = CountStore::new(corpus.vocabulary.len(), 3);
        let mut rng = StdRng::seed_from_u64(7);

        assign_initial_topics(&mut corpus.documents, &mut counts, &mut rng);
        let mut sampler =
            GibbsSampler::new(0.1, 0.01, corpus.vocabulary.modeled_types(), &counts);

        for _ in 0..20 {
            sampler.sweep(&mut corpus.documents, &mut counts, &mut rng);
            assert_counts_consistent(&corpus, &counts);
        }
    }

    #[test]
    fn test_stopwords_never_sampled() {
        let mut corpus = build_corpus(
            vec![DocumentInput::new(1, "alpha the beta the gamma")],
            StopwordFilter::english(),
            2,
        );
        let mut counts = CountStore::new(corpus.vocabulary.len(), 2);
        let mut rng = StdRng::seed_from_u64(3);

        assign_initial_topics(&mut corpus.documents, &mut counts, &mut rng);
        let mut sampler =
            GibbsSampler::new(0.1, 0.01, corpus.vocabulary.modeled_types(), &counts);
        sampler.sweep(&mut corpus.documents, &mut counts, &mut rng);

        let the = corpus.vocabulary.id("the").unwrap();
        assert_eq!(counts.word_total(the), 0);
        assert_eq!(counts.total_tokens(), 3);
    }

    #[test]
    fn test_seeded_sweeps_deterministic() {
        let run = |seed: u64| {
            let mut corpus = sample_corpus(4);
            let mut counts = CountStore::new(corpus.vocabulary.len(), 4);
            let mut rng = StdRng::seed_from_u64(seed);
            assign_initial_topics(&mut corpus.documents, &mut counts, &mut rng);
            let mut sampler =
                GibbsSampler::new(0.1, 0.01, corpus.vocabulary.modeled_types(), &counts);
            for _ in 0..10 {
                sampler.sweep(&mut corpus.documents, &mut counts, &mut rng);
            }
            let topics: Vec<usize> = corpus
                .documents
                .iter()
                .flat_map(|d| d.tokens.iter().map(|t| t.topic))
                .collect();
            (topics, counts.tokens_per_topic().to_vec())
        };

        assert_eq!(run(42), run(42));
        // A different seed is allowed to differ (and essentially always does).
        assert_ne!(run(42).0, run(43).0);
    }

    #[test]
    fn test_single_topic_is_fixed_point() {
        let mut corpus = sample_corpus(1);
        let mut counts = CountStore::new(corpus.vocabulary.len(), 1);
        let mut rng = StdRng::seed_from_u64(1);

        assign_initial_topics(&mut corpus.documents, &mut counts, &mut rng);
        let mut sampler =
            GibbsSampler::new(0.1, 0.01, corpus.vocabulary.modeled_types(), &counts);
        sampler.sweep(&mut corpus.documents, &mut counts, &mut rng);

        assert_counts_consistent(&corpus, &counts);
        assert!(corpus
            .documents
            .iter()
            .all(|d| d.tokens.iter().all(|t| t.topic == 0)));
    }
}
