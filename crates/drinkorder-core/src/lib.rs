//! Shared domain types and configuration for the drink-ordering service.

mod app_config;
mod config;
pub mod orders;
pub mod reviews;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LoadRetry, SentimentBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::OrderStatus;
pub use reviews::{text_changed, ReviewDraft, ReviewError, SentimentLabel, MAX_REVIEW_TEXT_CHARS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
