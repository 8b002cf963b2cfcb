//! Core types for latent_topics
//!
//! This module defines the configuration struct, the document input
//! shapes accepted by the model, the query output records, and the
//! small coordination types used by the fit loop (progress reports and
//! cancellation tokens).

use crate::errors::{LdaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for topic model fitting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LdaConfig {
    /// Number of latent topics (K)
    pub num_topics: usize,
    /// Number of Gibbs sweeps to run over the corpus
    pub sweeps: usize,
    /// Dirichlet prior on document-topic distributions (α)
    pub doc_topic_smoothing: f64,
    /// Dirichlet prior on topic-word distributions (β)
    pub topic_word_smoothing: f64,
    /// Pseudo-count used when scoring documents against a topic (γ)
    pub doc_sort_smoothing: f64,
    /// Number of top words reported per topic
    pub top_words: usize,
    /// Include stopwords in vocabulary query output
    pub include_stopwords_in_output: bool,
    /// Run one sweep beyond the requested count.
    ///
    /// On by default, matching the long-observed behavior of this
    /// sampler's consumers; call [`LdaConfig::with_exact_sweeps`] to run
    /// exactly `sweeps` sweeps instead.
    pub extra_sweep: bool,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            num_topics: 10,
            sweeps: 50,
            doc_topic_smoothing: 0.1,
            topic_word_smoothing: 0.01,
            doc_sort_smoothing: 10.0,
            top_words: 10,
            include_stopwords_in_output: false,
            extra_sweep: true,
        }
    }
}

impl LdaConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    ///
    /// Rejects every setting that would make a sweep divide by zero or
    /// sample from an empty distribution, before any counts are built.
    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            return Err(LdaError::invalid_config("num_topics must be >= 1"));
        }

        for (name, value) in [
            ("doc_topic_smoothing", self.doc_topic_smoothing),
            ("topic_word_smoothing", self.topic_word_smoothing),
            ("doc_sort_smoothing", self.doc_sort_smoothing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LdaError::invalid_config(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }

        if self.top_words == 0 {
            return Err(LdaError::invalid_config("top_words must be >= 1"));
        }

        Ok(())
    }

    /// Builder method: set the number of topics
    pub fn with_num_topics(mut self, num_topics: usize) -> Self {
        self.num_topics = num_topics;
        self
    }

    /// Builder method: set the number of sweeps
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Builder method: set the document-topic smoothing (α)
    pub fn with_doc_topic_smoothing(mut self, alpha: f64) -> Self {
        self.doc_topic_smoothing = alpha;
        self
    }

    /// Builder method: set the topic-word smoothing (β)
    pub fn with_topic_word_smoothing(mut self, beta: f64) -> Self {
        self.topic_word_smoothing = beta;
        self
    }

    /// Builder method: set the document scoring smoothing (γ)
    pub fn with_doc_sort_smoothing(mut self, gamma: f64) -> Self {
        self.doc_sort_smoothing = gamma;
        self
    }

    /// Builder method: set the number of top words reported per topic
    pub fn with_top_words(mut self, top_words: usize) -> Self {
        self.top_words = top_words;
        self
    }

    /// Builder method: include stopwords in vocabulary output
    pub fn with_stopwords_in_output(mut self, include: bool) -> Self {
        self.include_stopwords_in_output = include;
        self
    }

    /// Builder method: run exactly `sweeps` sweeps, disabling the
    /// trailing extra sweep.
    pub fn with_exact_sweeps(mut self) -> Self {
        self.extra_sweep = false;
        self
    }
}

// ============================================================================
// Document input
// ============================================================================

/// Opaque document identifier: either a string or an integer key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{}", n),
            DocumentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(n: i64) -> Self {
        DocumentId::Number(n)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId::Text(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId::Text(s)
    }
}

/// Document body: raw text to be tokenized, or a pre-tokenized word list
/// accepted verbatim (no lowercasing or re-segmentation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentText {
    Raw(String),
    Tokens(Vec<String>),
}

impl From<&str> for DocumentText {
    fn from(s: &str) -> Self {
        DocumentText::Raw(s.to_string())
    }
}

impl From<String> for DocumentText {
    fn from(s: String) -> Self {
        DocumentText::Raw(s)
    }
}

impl From<Vec<String>> for DocumentText {
    fn from(tokens: Vec<String>) -> Self {
        DocumentText::Tokens(tokens)
    }
}

/// One corpus item handed to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: DocumentId,
    pub text: DocumentText,
}

impl DocumentInput {
    /// Create a new document input
    pub fn new(id: impl Into<DocumentId>, text: impl Into<DocumentText>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A document that was dropped during corpus construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub id: DocumentId,
    pub reason: SkipReason,
}

/// Why a document was dropped from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The text (or token list) was empty
    EmptyText,
    /// The text contained no letter sequences to tokenize
    NoTokens,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyText => f.write_str("empty text"),
            SkipReason::NoTokens => f.write_str("no tokenizable content"),
        }
    }
}

// ============================================================================
// Query output
// ============================================================================

/// Top words and document-share score for one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicWords {
    pub topic_id: usize,
    /// Space-delimited top words, most frequent first
    pub top_words: String,
    /// Fraction of documents whose dominant topic this is
    pub score: f64,
}

/// A document ranked against one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub text: String,
    /// Smoothed share of the document's tokens assigned to the topic
    pub score: f64,
}

/// One vocabulary word with its frequency and analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub count: u64,
    pub is_stopword: bool,
    /// How concentrated the word is in a single topic, in `[0, 1]`
    pub specificity: f64,
}

/// The documents and vocabulary attached to one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDocuments {
    pub topic: usize,
    /// Documents with a non-zero count for the topic, best share first
    pub documents: Vec<ScoredDocument>,
    /// Vocabulary ranked by frequency within the topic
    pub topic_vocabulary: Vec<VocabularyEntry>,
}

// ============================================================================
// Fit coordination
// ============================================================================

/// Progress report delivered to the fit observer after each sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepProgress {
    /// Sweeps finished so far
    pub completed: usize,
    /// Total sweeps this fit will run
    pub total: usize,
}

/// Cooperative cancellation flag for a running fit.
///
/// Clone the token, hand one copy to the thread driving
/// [`fit_with`](crate::model::TopicModel::fit_with), and call
/// [`cancel`](CancelToken::cancel) from anywhere. The fit loop checks
/// the flag between sweeps only, so count-table invariants are never
/// broken by a cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
