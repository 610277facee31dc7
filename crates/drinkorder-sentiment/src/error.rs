use std::time::Duration;

use thiserror::Error;

/// Failures inside the sentiment engine.
///
/// None of these reach callers of
/// [`SentimentClassifier::classify`](crate::SentimentClassifier::classify);
/// they are logged and collapsed into a neutral label.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TEI error: {0}")]
    Tei(String),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("engine load failed: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("{operation} timed out after {}ms", .limit.as_millis())]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("{0} panicked")]
    Panicked(&'static str),
}
