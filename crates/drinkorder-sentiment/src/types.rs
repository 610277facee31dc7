use std::path::PathBuf;
use std::time::Duration;

use drinkorder_core::{AppConfig, LoadRetry, SentimentBackend};

/// Label in the engine's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLabel {
    Positive,
    Negative,
    /// Anything the engine emits outside the binary positive/negative pair.
    Unrecognized(String),
}

impl RawLabel {
    /// Map an engine label such as `POSITIVE` or `neg` onto the closed set.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("positive") || trimmed.eq_ignore_ascii_case("pos") {
            RawLabel::Positive
        } else if trimmed.eq_ignore_ascii_case("negative") || trimmed.eq_ignore_ascii_case("neg")
        {
            RawLabel::Negative
        } else {
            RawLabel::Unrecognized(trimmed.to_string())
        }
    }
}

/// One engine prediction: a raw label and its confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub label: RawLabel,
    pub score: f32,
}

impl RawPrediction {
    #[must_use]
    pub fn new(label: RawLabel, score: f32) -> Self {
        Self { label, score }
    }
}

/// Policy applied after the engine failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRetryPolicy {
    /// Sticky failure: no further load attempts for the process lifetime.
    Never,
    /// Allow another attempt once `base * 2^(failures - 1)` (capped at `max`,
    /// with ±25% jitter) has elapsed since the last failure.
    Backoff { base: Duration, max: Duration },
}

impl LoadRetryPolicy {
    /// Delay before the next load attempt after `failures` consecutive
    /// failures, without jitter. `None` means never retry.
    #[must_use]
    pub fn delay_after(&self, failures: u32) -> Option<Duration> {
        match *self {
            LoadRetryPolicy::Never => None,
            LoadRetryPolicy::Backoff { base, max } => {
                let exponent = failures.saturating_sub(1).min(16);
                Some(base.saturating_mul(1u32 << exponent).min(max))
            }
        }
    }
}

/// Runtime observation of the classifier's engine slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// No load attempt has completed yet (or one is in flight).
    Uninitialized,
    Ready,
    /// The last load attempt failed; classification returns neutral.
    Unavailable,
}

impl EngineStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EngineStatus::Uninitialized => "uninitialized",
            EngineStatus::Ready => "ready",
            EngineStatus::Unavailable => "unavailable",
        }
    }
}

/// Settings for [`SentimentClassifier`](crate::SentimentClassifier) and its engine.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub backend: SentimentBackend,
    pub tei_url: Option<String>,
    pub lexicon_path: Option<PathBuf>,
    pub load_timeout: Duration,
    pub inference_timeout: Duration,
    pub retry: LoadRetryPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: SentimentBackend::Lexicon,
            tei_url: None,
            lexicon_path: None,
            load_timeout: Duration::from_secs(120),
            inference_timeout: Duration::from_secs(10),
            retry: LoadRetryPolicy::Never,
        }
    }
}

impl ClassifierConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let retry = match config.sentiment_load_retry {
            LoadRetry::Never => LoadRetryPolicy::Never,
            LoadRetry::Backoff => LoadRetryPolicy::Backoff {
                base: Duration::from_secs(config.sentiment_retry_backoff_base_secs),
                max: Duration::from_secs(config.sentiment_retry_backoff_max_secs),
            },
        };

        Self {
            backend: config.sentiment_backend,
            tei_url: config.sentiment_tei_url.clone(),
            lexicon_path: config.sentiment_lexicon_path.clone(),
            load_timeout: Duration::from_secs(config.sentiment_load_timeout_secs),
            inference_timeout: Duration::from_millis(config.sentiment_inference_timeout_ms),
            retry,
        }
    }
}
