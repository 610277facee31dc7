//! Seams between the classifier and the model that backs it.

use std::future::Future;

use crate::error::SentimentError;
use crate::types::RawPrediction;

/// A loaded sentiment model.
///
/// Shared read-only by every concurrent `classify` call once loaded.
pub trait SentimentEngine: Send + Sync + 'static {
    /// Run inference on `text`.
    fn predict(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<RawPrediction, SentimentError>> + Send;
}

/// Acquires a [`SentimentEngine`]. Called at most once per successful
/// initialization; the classifier serializes calls.
pub trait EngineLoader: Send + Sync + 'static {
    type Engine: SentimentEngine;

    /// Fetch and deserialize the model. Potentially slow.
    fn load(&self) -> impl Future<Output = Result<Self::Engine, SentimentError>> + Send;
}
