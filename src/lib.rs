//! # latent_topics
//!
//! Latent Dirichlet Allocation topic modeling via collapsed Gibbs
//! sampling.
//!
//! This library discovers latent topics in a document corpus: each
//! document is treated as a mixture of K topics and each topic as a
//! distribution over vocabulary words. Inference runs as full-corpus
//! sweeps that resample every token's topic conditioned on all other
//! current assignments.
//!
//! ## Features
//!
//! - **Staged API**: tokenize and intern at construction, fit as an
//!   explicit step that can run on a worker thread
//! - **Reproducible**: all randomness flows through an injectable,
//!   seedable generator
//! - **Observable**: per-sweep progress callbacks and cooperative
//!   cancellation between sweeps
//! - **Unicode-aware**: UAX #29 word segmentation reduced to letter
//!   runs
//!
//! ## Example
//!
//! ```
//! use latent_topics::{DocumentInput, LdaConfig, StopwordFilter, TopicModel};
//!
//! let config = LdaConfig::new().with_num_topics(2).with_sweeps(100);
//! let docs = vec![
//!     DocumentInput::new(1, "the stars orbit within distant galaxies"),
//!     DocumentInput::new(2, "galaxies collide and stars scatter"),
//!     DocumentInput::new(3, "the senate passed the budget bill"),
//!     DocumentInput::new(4, "the bill funds the senate committees"),
//! ];
//!
//! let mut model = TopicModel::new(config, docs, StopwordFilter::english()).unwrap();
//! model.fit_seeded(7).unwrap();
//!
//! for topic in model.topic_words().unwrap() {
//!     println!("topic {}: {} (score {:.2})", topic.topic_id, topic.top_words, topic.score);
//! }
//! ```

pub mod analytics;
pub mod corpus;
pub mod counts;
pub mod errors;
pub mod model;
pub mod nlp;
pub mod rank;
pub mod sampler;
pub mod scoring;
pub mod types;

// Re-export commonly used types
pub use errors::{LdaError, Result};
pub use model::TopicModel;
pub use nlp::{stopwords::StopwordFilter, tokenizer::Tokenizer};
pub use types::{
    CancelToken, DocumentId, DocumentInput, DocumentText, LdaConfig, ScoredDocument, SkipReason,
    SkippedDocument, SweepProgress, TopicDocuments, TopicWords, VocabularyEntry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
