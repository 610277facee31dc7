//! Offline unit tests for drinkorder-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use drinkorder_core::{AppConfig, Environment, LoadRetry, SentimentBackend, SentimentLabel};
use drinkorder_db::{DbError, PoolConfig, ReviewFilter, ReviewRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn make_review_row(sentiment: &str) -> ReviewRow {
    ReviewRow {
        id: 1,
        drink_id: 2,
        customer_id: 3,
        rating: 5,
        text: Some("I loved this!".to_string()),
        sentiment: sentiment.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        sentiment_backend: SentimentBackend::Lexicon,
        sentiment_tei_url: None,
        sentiment_lexicon_path: None,
        sentiment_load_timeout_secs: 120,
        sentiment_inference_timeout_ms: 10_000,
        sentiment_load_retry: LoadRetry::Never,
        sentiment_retry_backoff_base_secs: 30,
        sentiment_retry_backoff_max_secs: 900,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn review_row_parses_stored_sentiment() {
    let row = make_review_row("negative");
    assert_eq!(row.sentiment_label().unwrap(), SentimentLabel::Negative);
}

#[test]
fn review_row_rejects_unknown_stored_sentiment() {
    let row = make_review_row("ecstatic");
    assert!(matches!(
        row.sentiment_label(),
        Err(DbError::InvalidStoredValue(_))
    ));
}

#[test]
fn review_filter_defaults_to_unfiltered() {
    let filter = ReviewFilter::default();
    assert!(filter.drink_id.is_none());
    assert!(filter.sentiment.is_none());
}
