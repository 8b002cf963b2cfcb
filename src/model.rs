//! Topic model lifecycle: staged construction, fitting, and queries
//!
//! Construction tokenizes the corpus and interns the vocabulary;
//! fitting is a separate, explicit step that seeds random assignments
//! and drives the Gibbs sampler for the configured number of sweeps.
//! Query methods are available once a fit has completed and read from
//! state that is frozen until the next fit.

use crate::analytics;
use crate::corpus::{build_corpus, Document, Vocabulary};
use crate::counts::CountStore;
use crate::errors::{LdaError, Result};
use crate::nlp::stopwords::StopwordFilter;
use crate::rank::TopicWordRanks;
use crate::sampler::{assign_initial_topics, GibbsSampler};
use crate::scoring;
use crate::types::{
    CancelToken, DocumentInput, LdaConfig, ScoredDocument, SkippedDocument, SweepProgress,
    TopicDocuments, TopicWords, VocabularyEntry,
};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// State derived from the final counts when a fit completes
#[derive(Debug)]
struct FittedView {
    rankings: TopicWordRanks,
    topic_scores: Vec<f64>,
}

/// A latent topic model over a fixed corpus.
///
/// ```
/// use latent_topics::{DocumentInput, LdaConfig, StopwordFilter, TopicModel};
///
/// let config = LdaConfig::new().with_num_topics(2).with_sweeps(50);
/// let docs = vec![
///     DocumentInput::new(1, "apples oranges pears apples"),
///     DocumentInput::new(2, "engines pistons gears engines"),
/// ];
/// let mut model = TopicModel::new(config, docs, StopwordFilter::english()).unwrap();
/// model.fit_seeded(42).unwrap();
/// let topics = model.topic_words().unwrap();
/// assert_eq!(topics.len(), 2);
/// ```
#[derive(Debug)]
pub struct TopicModel {
    config: LdaConfig,
    documents: Vec<Document>,
    vocabulary: Vocabulary,
    stopwords: StopwordFilter,
    skipped: Vec<SkippedDocument>,
    counts: CountStore,
    completed_sweeps: usize,
    fitted: Option<FittedView>,
}

impl TopicModel {
    /// Build a model over the given corpus.
    ///
    /// Validates the configuration, tokenizes every document, and
    /// interns the vocabulary. No topic assignment happens yet; call
    /// one of the `fit` methods next. Documents that produce no tokens
    /// are dropped and reported via
    /// [`skipped_documents`](TopicModel::skipped_documents).
    pub fn new(
        config: LdaConfig,
        documents: Vec<DocumentInput>,
        stopwords: StopwordFilter,
    ) -> Result<Self> {
        config.validate()?;

        let corpus = build_corpus(documents, stopwords, config.num_topics);
        let counts = CountStore::new(corpus.vocabulary.len(), config.num_topics);

        Ok(Self {
            config,
            documents: corpus.documents,
            vocabulary: corpus.vocabulary,
            stopwords: corpus.stopwords,
            skipped: corpus.skipped,
            counts,
            completed_sweeps: 0,
            fitted: None,
        })
    }

    /// Fit with a fresh entropy-seeded generator.
    pub fn fit(&mut self) -> Result<()> {
        let mut rng = StdRng::from_entropy();
        self.fit_with(&mut rng, |_| {}, &CancelToken::new())
    }

    /// Fit with a deterministic seed; identical seeds on identical
    /// corpora produce identical models.
    pub fn fit_seeded(&mut self, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.fit_with(&mut rng, |_| {}, &CancelToken::new())
    }

    /// Fit with an injected generator, a per-sweep progress observer,
    /// and a cancellation token.
    ///
    /// Runs synchronously on the calling thread; spawn a thread around
    /// it for background fitting. Cancellation is honored between
    /// sweeps only, returning [`LdaError::Cancelled`] and leaving the
    /// model unfitted (a later fit restarts from fresh assignments).
    pub fn fit_with<R, F>(&mut self, rng: &mut R, mut observer: F, cancel: &CancelToken) -> Result<()>
    where
        R: Rng,
        F: FnMut(SweepProgress),
    {
        self.fitted = None;
        self.completed_sweeps = 0;

        assign_initial_topics(&mut self.documents, &mut self.counts, rng);
        self.debug_check_invariants();

        let total = if self.config.extra_sweep {
            self.config.sweeps + 1
        } else {
            self.config.sweeps
        };
        let mut sampler = GibbsSampler::new(
            self.config.doc_topic_smoothing,
            self.config.topic_word_smoothing,
            self.vocabulary.modeled_types(),
            &self.counts,
        );

        debug!(
            "fitting {} documents ({} modeled word types) with {} topics over {} sweeps",
            self.documents.len(),
            self.vocabulary.modeled_types(),
            self.config.num_topics,
            total
        );

        while self.completed_sweeps < total {
            if cancel.is_cancelled() {
                debug!("fit cancelled after {} sweeps", self.completed_sweeps);
                return Err(LdaError::cancelled(self.completed_sweeps));
            }

            sampler.sweep(&mut self.documents, &mut self.counts, rng);
            self.completed_sweeps += 1;
            self.debug_check_invariants();

            trace!("sweep {}/{} complete", self.completed_sweeps, total);
            if self.completed_sweeps % 50 == 0 {
                debug!("sweep {}/{} complete", self.completed_sweeps, total);
            }
            observer(SweepProgress {
                completed: self.completed_sweeps,
                total,
            });
        }

        self.freeze();
        Ok(())
    }

    /// Build the cached rankings and topic scores; runs exactly once
    /// per completed fit.
    fn freeze(&mut self) {
        let topic_scores = scoring::topic_scores(
            &self.documents,
            self.config.doc_sort_smoothing,
            self.config.num_topics,
        );
        let rankings = TopicWordRanks::build(&self.vocabulary, &self.counts);
        self.fitted = Some(FittedView {
            rankings,
            topic_scores,
        });
    }

    fn fitted_view(&self) -> Result<&FittedView> {
        self.fitted.as_ref().ok_or(LdaError::NotFitted)
    }

    /// Count-table consistency checks, compiled out of release builds.
    fn debug_check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            let total: usize = self
                .documents
                .iter()
                .map(|d| d.nonstop_token_count())
                .sum();
            debug_assert_eq!(self.counts.total_tokens(), total as u64);

            for doc in &self.documents {
                debug_assert_eq!(
                    doc.topic_counts.iter().sum::<u32>() as usize,
                    doc.nonstop_token_count()
                );
            }

            for word in 0..self.vocabulary.len() as u32 {
                let expected = if self.vocabulary.is_stopword(word) {
                    0
                } else {
                    self.vocabulary.raw_count(word)
                };
                debug_assert_eq!(self.counts.word_total(word), expected);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Top words and document-share score for every topic.
    pub fn topic_words(&self) -> Result<Vec<TopicWords>> {
        let view = self.fitted_view()?;
        Ok((0..self.config.num_topics)
            .map(|topic| TopicWords {
                topic_id: topic,
                top_words: view
                    .rankings
                    .top_words(topic, self.config.top_words, &self.vocabulary),
                score: view.topic_scores[topic],
            })
            .collect())
    }

    /// For every topic: its ranked documents and topic vocabulary.
    ///
    /// A document appears under a topic only when at least one of its
    /// tokens is assigned there.
    pub fn documents_by_topic(&self) -> Result<Vec<TopicDocuments>> {
        self.fitted_view()?;
        let gamma = self.config.doc_sort_smoothing;
        let num_topics = self.config.num_topics;

        Ok((0..num_topics)
            .map(|topic| {
                let documents = scoring::ranked_documents(&self.documents, topic, gamma, num_topics)
                    .into_iter()
                    .map(|(i, score)| {
                        let doc = &self.documents[i];
                        ScoredDocument {
                            id: doc.id.clone(),
                            text: doc.original_text.clone(),
                            score,
                        }
                    })
                    .collect();
                let topic_vocabulary = analytics::most_frequent_words(
                    &self.vocabulary,
                    &self.counts,
                    self.config.include_stopwords_in_output,
                    Some(topic),
                );
                TopicDocuments {
                    topic,
                    documents,
                    topic_vocabulary,
                }
            })
            .collect())
    }

    /// The vocabulary ranked by global frequency, or by frequency
    /// within one topic.
    pub fn vocabulary(&self, topic: Option<usize>) -> Result<Vec<VocabularyEntry>> {
        self.fitted_view()?;
        if let Some(t) = topic {
            if t >= self.config.num_topics {
                return Err(LdaError::invalid_topic(t, self.config.num_topics));
            }
        }
        Ok(analytics::most_frequent_words(
            &self.vocabulary,
            &self.counts,
            self.config.include_stopwords_in_output,
            topic,
        ))
    }

    // ========================================================================
    // Diagnostics (available before fitting)
    // ========================================================================

    /// Number of topics (K)
    pub fn num_topics(&self) -> usize {
        self.config.num_topics
    }

    /// Documents kept in the corpus
    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    /// Distinct non-stopword word types
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.modeled_types()
    }

    /// Sweeps finished in the most recent (or current) fit
    pub fn completed_sweeps(&self) -> usize {
        self.completed_sweeps
    }

    /// Whether a fit has completed and queries are available
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Documents dropped during corpus construction
    pub fn skipped_documents(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    /// The stopword set after corpus construction, short-token inserts
    /// included
    pub fn stopword_filter(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// The kept documents with their current topic counts
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Total non-stopword tokens currently assigned to each topic
    pub fn tokens_per_topic(&self) -> &[u64] {
        self.counts.tokens_per_topic()
    }

    /// Per-topic assignment counts for one word, if it was ever seen
    pub fn topic_counts_for_word(&self, word: &str) -> Option<&[u32]> {
        self.vocabulary.id(word).map(|id| self.counts.topic_row(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cluster_docs() -> Vec<DocumentInput> {
        vec![
            DocumentInput::new(1, "alpha alpha beta"),
            DocumentInput::new(2, "gamma gamma delta"),
        ]
    }

    fn model(config: LdaConfig) -> TopicModel {
        TopicModel::new(config, two_cluster_docs(), StopwordFilter::empty()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = TopicModel::new(
            LdaConfig::new().with_num_topics(0),
            two_cluster_docs(),
            StopwordFilter::empty(),
        )
        .unwrap_err();
        assert!(matches!(err, LdaError::InvalidConfig { .. }));
    }

    #[test]
    fn test_queries_require_fit() {
        let m = model(LdaConfig::new().with_num_topics(2));
        assert!(!m.is_fitted());
        assert!(matches!(m.topic_words(), Err(LdaError::NotFitted)));
        assert!(matches!(m.documents_by_topic(), Err(LdaError::NotFitted)));
        assert!(matches!(m.vocabulary(None), Err(LdaError::NotFitted)));
    }

    #[test]
    fn test_fit_then_query() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(20));
        m.fit_seeded(11).unwrap();

        assert!(m.is_fitted());
        assert_eq!(m.vocabulary_size(), 4);

        let topics = m.topic_words().unwrap();
        assert_eq!(topics.len(), 2);
        let score_sum: f64 = topics.iter().map(|t| t.score).sum();
        assert!((score_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extra_sweep_default_count() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(3));
        let mut sweeps_seen = 0;
        let mut rng = StdRng::seed_from_u64(5);
        m.fit_with(&mut rng, |_| sweeps_seen += 1, &CancelToken::new())
            .unwrap();

        assert_eq!(sweeps_seen, 4);
        assert_eq!(m.completed_sweeps(), 4);
    }

    #[test]
    fn test_exact_sweep_count_opt_in() {
        let mut m = model(
            LdaConfig::new()
                .with_num_topics(2)
                .with_sweeps(3)
                .with_exact_sweeps(),
        );
        let mut sweeps_seen = 0;
        let mut rng = StdRng::seed_from_u64(5);
        m.fit_with(&mut rng, |_| sweeps_seen += 1, &CancelToken::new())
            .unwrap();

        assert_eq!(sweeps_seen, 3);
        assert_eq!(m.completed_sweeps(), 3);
    }

    #[test]
    fn test_progress_reports_monotonic() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(5));
        let mut seen = Vec::new();
        let mut rng = StdRng::seed_from_u64(9);
        m.fit_with(&mut rng, |p| seen.push(p), &CancelToken::new())
            .unwrap();

        assert_eq!(seen.len(), 6);
        for (i, progress) in seen.iter().enumerate() {
            assert_eq!(progress.completed, i + 1);
            assert_eq!(progress.total, 6);
        }
    }

    #[test]
    fn test_cancellation_before_first_sweep() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(100));
        let token = CancelToken::new();
        token.cancel();
        let mut rng = StdRng::seed_from_u64(1);

        let err = m.fit_with(&mut rng, |_| {}, &token).unwrap_err();
        assert!(matches!(err, LdaError::Cancelled { completed_sweeps: 0 }));
        assert!(!m.is_fitted());
    }

    #[test]
    fn test_cancellation_mid_fit() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(100));
        let token = CancelToken::new();
        let observer_token = token.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let err = m
            .fit_with(
                &mut rng,
                |p| {
                    if p.completed == 3 {
                        observer_token.cancel();
                    }
                },
                &token,
            )
            .unwrap_err();
        assert!(matches!(err, LdaError::Cancelled { completed_sweeps: 3 }));

        // The model recovers by refitting from scratch.
        m.fit_seeded(2).unwrap();
        assert!(m.is_fitted());
    }

    #[test]
    fn test_seeded_fits_identical() {
        let mut a = model(LdaConfig::new().with_num_topics(3).with_sweeps(30));
        let mut b = model(LdaConfig::new().with_num_topics(3).with_sweeps(30));
        a.fit_seeded(77).unwrap();
        b.fit_seeded(77).unwrap();

        assert_eq!(a.tokens_per_topic(), b.tokens_per_topic());
        for word in ["alpha", "beta", "gamma", "delta"] {
            assert_eq!(a.topic_counts_for_word(word), b.topic_counts_for_word(word));
        }

        let topics_a = serde_json::to_string(&a.topic_words().unwrap()).unwrap();
        let topics_b = serde_json::to_string(&b.topic_words().unwrap()).unwrap();
        assert_eq!(topics_a, topics_b);
    }

    #[test]
    fn test_refit_replaces_previous_state() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(10));
        m.fit_seeded(1).unwrap();
        let first = m.tokens_per_topic().to_vec();

        m.fit_seeded(1).unwrap();
        assert_eq!(m.tokens_per_topic(), &first[..]);
        assert_eq!(m.completed_sweeps(), 11);
    }

    #[test]
    fn test_invalid_topic_query() {
        let mut m = model(LdaConfig::new().with_num_topics(2).with_sweeps(1));
        m.fit_seeded(4).unwrap();

        let err = m.vocabulary(Some(2)).unwrap_err();
        assert!(matches!(
            err,
            LdaError::InvalidTopic {
                topic: 2,
                num_topics: 2
            }
        ));
        assert!(m.vocabulary(Some(1)).is_ok());
    }

    #[test]
    fn test_empty_corpus_fits() {
        let mut m =
            TopicModel::new(LdaConfig::new().with_num_topics(2), Vec::new(), StopwordFilter::empty())
                .unwrap();
        m.fit_seeded(1).unwrap();

        assert_eq!(m.num_documents(), 0);
        assert_eq!(m.vocabulary_size(), 0);
        let topics = m.topic_words().unwrap();
        assert_eq!(topics.len(), 2);
        assert!(topics.iter().all(|t| t.top_words.is_empty() && t.score == 0.0));
        assert!(m.documents_by_topic().unwrap().iter().all(|g| g.documents.is_empty()));
    }

    #[test]
    fn test_skipped_documents_reported() {
        let mut m = TopicModel::new(
            LdaConfig::new().with_num_topics(2),
            vec![
                DocumentInput::new(1, "alpha beta gamma"),
                DocumentInput::new(2, ""),
            ],
            StopwordFilter::empty(),
        )
        .unwrap();

        assert_eq!(m.skipped_documents().len(), 1);
        assert_eq!(m.num_documents(), 1);
        m.fit_seeded(3).unwrap();
        assert_eq!(m.documents_by_topic().unwrap().len(), 2);
    }
}
