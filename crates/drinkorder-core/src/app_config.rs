use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which engine the review sentiment classifier loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBackend {
    /// Sequence-classification model served by a Text Embeddings Inference server.
    Tei,
    /// Built-in (or file-provided) word lexicon. Needs no network.
    Lexicon,
}

impl std::fmt::Display for SentimentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentBackend::Tei => write!(f, "tei"),
            SentimentBackend::Lexicon => write!(f, "lexicon"),
        }
    }
}

/// What the classifier does after its engine failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRetry {
    /// The failure is sticky until the process restarts.
    Never,
    /// Retry on a later call once an exponential back-off window has passed.
    Backoff,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub sentiment_backend: SentimentBackend,
    pub sentiment_tei_url: Option<String>,
    pub sentiment_lexicon_path: Option<PathBuf>,
    pub sentiment_load_timeout_secs: u64,
    pub sentiment_inference_timeout_ms: u64,
    pub sentiment_load_retry: LoadRetry,
    pub sentiment_retry_backoff_base_secs: u64,
    pub sentiment_retry_backoff_max_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("sentiment_backend", &self.sentiment_backend)
            .field("sentiment_tei_url", &self.sentiment_tei_url)
            .field("sentiment_lexicon_path", &self.sentiment_lexicon_path)
            .field(
                "sentiment_load_timeout_secs",
                &self.sentiment_load_timeout_secs,
            )
            .field(
                "sentiment_inference_timeout_ms",
                &self.sentiment_inference_timeout_ms,
            )
            .field("sentiment_load_retry", &self.sentiment_load_retry)
            .field(
                "sentiment_retry_backoff_base_secs",
                &self.sentiment_retry_backoff_base_secs,
            )
            .field(
                "sentiment_retry_backoff_max_secs",
                &self.sentiment_retry_backoff_max_secs,
            )
            .finish()
    }
}
