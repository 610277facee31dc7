use crate::app_config::{AppConfig, Environment, LoadRetry, SentimentBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("DRINKORDER_ENV", "development"));
    let bind_addr = parse_addr("DRINKORDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("DRINKORDER_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("DRINKORDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DRINKORDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DRINKORDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let sentiment_backend =
        parse_sentiment_backend(&or_default("DRINKORDER_SENTIMENT_BACKEND", "lexicon"))?;
    let sentiment_tei_url = lookup("DRINKORDER_SENTIMENT_TEI_URL")
        .ok()
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty());
    if sentiment_backend == SentimentBackend::Tei && sentiment_tei_url.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "DRINKORDER_SENTIMENT_TEI_URL".to_string(),
        ));
    }
    let sentiment_lexicon_path = lookup("DRINKORDER_SENTIMENT_LEXICON_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let sentiment_load_timeout_secs = parse_u64("DRINKORDER_SENTIMENT_LOAD_TIMEOUT_SECS", "120")?;
    let sentiment_inference_timeout_ms =
        parse_u64("DRINKORDER_SENTIMENT_INFERENCE_TIMEOUT_MS", "10000")?;
    let sentiment_load_retry =
        parse_load_retry(&or_default("DRINKORDER_SENTIMENT_LOAD_RETRY", "never"))?;
    let sentiment_retry_backoff_base_secs =
        parse_u64("DRINKORDER_SENTIMENT_RETRY_BACKOFF_BASE_SECS", "30")?;
    let sentiment_retry_backoff_max_secs =
        parse_u64("DRINKORDER_SENTIMENT_RETRY_BACKOFF_MAX_SECS", "900")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        sentiment_backend,
        sentiment_tei_url,
        sentiment_lexicon_path,
        sentiment_load_timeout_secs,
        sentiment_inference_timeout_ms,
        sentiment_load_retry,
        sentiment_retry_backoff_base_secs,
        sentiment_retry_backoff_max_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_sentiment_backend(s: &str) -> Result<SentimentBackend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "tei" => Ok(SentimentBackend::Tei),
        "lexicon" => Ok(SentimentBackend::Lexicon),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DRINKORDER_SENTIMENT_BACKEND".to_string(),
            reason: format!("expected 'tei' or 'lexicon', got '{other}'"),
        }),
    }
}

fn parse_load_retry(s: &str) -> Result<LoadRetry, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "never" => Ok(LoadRetry::Never),
        "backoff" => Ok(LoadRetry::Backoff),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DRINKORDER_SENTIMENT_LOAD_RETRY".to_string(),
            reason: format!("expected 'never' or 'backoff', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
