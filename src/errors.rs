//! Error types for latent_topics
//!
//! This module defines the error types used throughout the library.
//! All errors are designed to be informative and actionable.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LdaError>;

/// Main error type for latent_topics
#[derive(Error, Debug, Clone)]
pub enum LdaError {
    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A query was issued before the model was fitted
    #[error("Model has not been fitted; call fit() first")]
    NotFitted,

    /// A topic index outside `[0, num_topics)` was supplied
    #[error("Topic index {topic} out of range (num_topics = {num_topics})")]
    InvalidTopic { topic: usize, num_topics: usize },

    /// Fitting was cancelled between sweeps via a `CancelToken`
    /// Note: The model is left unfitted; a later fit restarts cleanly
    #[error("Fit cancelled after {completed_sweeps} sweeps")]
    Cancelled { completed_sweeps: usize },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl LdaError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid topic error
    pub fn invalid_topic(topic: usize, num_topics: usize) -> Self {
        Self::InvalidTopic { topic, num_topics }
    }

    /// Create a cancellation error
    pub fn cancelled(completed_sweeps: usize) -> Self {
        Self::Cancelled { completed_sweeps }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error was caused by cancellation
    /// (the counts are populated but the model is not frozen)
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl From<serde_json::Error> for LdaError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
