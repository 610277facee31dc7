//! TEI (Text Embeddings Inference) sequence-classification engine.
//!
//! Talks to a TEI server hosting a sentiment model such as
//! `distilbert-base-uncased-finetuned-sst-2-english`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{EngineLoader, SentimentEngine};
use crate::error::SentimentError;
use crate::types::{RawLabel, RawPrediction};

/// Per-request HTTP timeout. The classifier applies its own deadline on top.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    model_id: String,
    #[serde(default)]
    model_type: serde_json::Value,
}

/// Loads a [`TeiEngine`] after confirming the server hosts a classifier.
#[derive(Debug, Clone)]
pub struct TeiLoader {
    url: String,
    request_timeout: Duration,
}

impl TeiLoader {
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            url: tei_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl EngineLoader for TeiLoader {
    type Engine = TeiEngine;

    /// Query `/info` and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the client cannot be built or the
    /// server is unreachable, and [`SentimentError::Tei`] if `/info` returns a
    /// non-success status, cannot be parsed, or describes a model that is not
    /// a sequence classifier.
    async fn load(&self) -> Result<TeiEngine, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        let response = client.get(format!("{}/info", self.url)).send().await?;
        if !response.status().is_success() {
            return Err(SentimentError::Tei(format!(
                "TEI /info returned status {}",
                response.status()
            )));
        }

        let info: InfoResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Tei(format!("TEI /info parse error: {e}")))?;

        if info.model_type.get("classifier").is_none() {
            return Err(SentimentError::Tei(format!(
                "model '{}' is not a sequence classifier",
                info.model_id
            )));
        }

        tracing::info!(model_id = %info.model_id, url = %self.url, "connected to TEI classifier");
        Ok(TeiEngine {
            client,
            predict_url: format!("{}/predict", self.url),
            model_id: info.model_id,
        })
    }
}

/// TEI HTTP client bound to one classification model.
#[derive(Debug, Clone)]
pub struct TeiEngine {
    client: reqwest::Client,
    predict_url: String,
    model_id: String,
}

impl TeiEngine {
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl SentimentEngine for TeiEngine {
    /// Classify one text and return the highest-scoring label.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] on network failure, or
    /// [`SentimentError::Inference`] if TEI rejects the input or returns no labels.
    async fn predict(&self, text: &str) -> Result<RawPrediction, SentimentError> {
        let request = PredictRequest {
            inputs: text,
            truncate: true,
        };
        let response = self
            .client
            .post(&self.predict_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SentimentError::Inference(format!(
                "TEI /predict returned status {}",
                response.status()
            )));
        }

        let scores: Vec<LabelScore> = response
            .json()
            .await
            .map_err(|e| SentimentError::Inference(format!("TEI response parse error: {e}")))?;

        let best = scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SentimentError::Inference("TEI returned no labels".to_string()))?;

        Ok(RawPrediction::new(RawLabel::parse(&best.label), best.score))
    }
}
