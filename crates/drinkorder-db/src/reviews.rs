//! Database operations for the `reviews` table.

use chrono::{DateTime, Utc};
use drinkorder_core::{ReviewDraft, SentimentLabel};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub drink_id: i64,
    pub customer_id: i64,
    pub rating: i16,
    pub text: Option<String>,
    /// One of `positive`, `negative`, `neutral` (enforced by a CHECK constraint).
    pub sentiment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewRow {
    /// Parse the stored sentiment column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidStoredValue`] if the column holds something
    /// other than the three known labels.
    pub fn sentiment_label(&self) -> Result<SentimentLabel, DbError> {
        self.sentiment
            .parse()
            .map_err(|e: drinkorder_core::ReviewError| DbError::InvalidStoredValue(e.to_string()))
    }
}

/// Optional filters for [`list_reviews`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    pub drink_id: Option<i64>,
    pub sentiment: Option<SentimentLabel>,
}

const REVIEW_COLUMNS: &str =
    "id, drink_id, customer_id, rating, text, sentiment, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a validated review together with its computed sentiment.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including an unknown
/// `drink_id` or `customer_id`).
pub async fn insert_review(
    pool: &PgPool,
    drink_id: i64,
    customer_id: i64,
    draft: &ReviewDraft,
    sentiment: SentimentLabel,
) -> Result<ReviewRow, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews (drink_id, customer_id, rating, text, sentiment) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(drink_id)
    .bind(customer_id)
    .bind(draft.rating)
    .bind(draft.text.as_deref())
    .bind(sentiment.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch one review by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_review(pool: &PgPool, review_id: i64) -> Result<Option<ReviewRow>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
    ))
    .bind(review_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Read a review and hold a row lock on it until the surrounding
/// transaction ends.
///
/// Concurrent edits of the same review queue behind this lock, so each
/// one compares its new text against the text the previous edit stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn lock_review_for_update(
    conn: &mut PgConnection,
    review_id: i64,
) -> Result<Option<ReviewRow>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1 FOR UPDATE"
    ))
    .bind(review_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Overwrite a review's rating, text and sentiment.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no review has `review_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_review(
    conn: &mut PgConnection,
    review_id: i64,
    draft: &ReviewDraft,
    sentiment: SentimentLabel,
) -> Result<ReviewRow, DbError> {
    sqlx::query_as::<_, ReviewRow>(&format!(
        "UPDATE reviews \
         SET rating = $2, text = $3, sentiment = $4, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review_id)
    .bind(draft.rating)
    .bind(draft.text.as_deref())
    .bind(sentiment.as_str())
    .fetch_optional(conn)
    .await?
    .ok_or(DbError::NotFound)
}

/// Store a freshly computed sentiment without touching the review text.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no review has `review_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_review_sentiment(
    pool: &PgPool,
    review_id: i64,
    sentiment: SentimentLabel,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE reviews SET sentiment = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(review_id)
    .bind(sentiment.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// List reviews newest first, optionally filtered by drink and sentiment.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews(
    pool: &PgPool,
    filter: ReviewFilter,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE ($1::BIGINT IS NULL OR drink_id = $1) \
           AND ($2::TEXT IS NULL OR sentiment = $2) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $3"
    ))
    .bind(filter.drink_id)
    .bind(filter.sentiment.map(SentimentLabel::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Page through all reviews in id order, starting after `after_id`.
///
/// Used by bulk re-classification; pass the last id of the previous page.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_for_reclassification(
    pool: &PgPool,
    after_id: i64,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE id > $1 \
         ORDER BY id \
         LIMIT $2"
    ))
    .bind(after_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
