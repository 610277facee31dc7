//! Review handlers. Every write runs the review through the sentiment hook
//! before it is stored.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use drinkorder_core::{ReviewDraft, SentimentLabel};
use drinkorder_db::{DbError, ReviewFilter, ReviewRow};
use drinkorder_sentiment::{sentiment_for_edited_review, sentiment_for_new_review};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateReviewRequest {
    pub drink_id: i64,
    pub customer_id: i64,
    pub rating: i16,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateReviewRequest {
    pub rating: i16,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewsQuery {
    pub drink_id: Option<i64>,
    pub sentiment: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReviewItem {
    pub id: i64,
    pub drink_id: i64,
    pub customer_id: i64,
    pub rating: i16,
    pub text: Option<String>,
    pub sentiment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned from `PUT`; `reclassified` is false when the text was unchanged.
#[derive(Debug, Serialize)]
pub(super) struct UpdatedReviewItem {
    #[serde(flatten)]
    pub review: ReviewItem,
    pub reclassified: bool,
}

impl From<ReviewRow> for ReviewItem {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            drink_id: row.drink_id,
            customer_id: row.customer_id,
            rating: row.rating,
            text: row.text,
            sentiment: row.sentiment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_draft(req_id: &str, draft: &ReviewDraft) -> Result<(), ApiError> {
    draft
        .validate()
        .map_err(|e| ApiError::new(req_id, "validation_error", e.to_string()))
}

fn parse_sentiment_filter(
    req_id: &str,
    raw: Option<&str>,
) -> Result<Option<SentimentLabel>, ApiError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.to_ascii_lowercase()
                .parse::<SentimentLabel>()
                .map_err(|e| ApiError::new(req_id, "validation_error", e.to_string()))
        })
        .transpose()
}

/// Unknown `drink_id` / `customer_id` surface as foreign-key violations.
fn map_insert_error(req_id: &str, e: &DbError) -> ApiError {
    if let DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.code().as_deref() == Some("23503") {
            return ApiError::new(req_id, "not_found", "drink or customer not found");
        }
    }
    map_db_error(req_id.to_owned(), e)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reviews: validate, classify, store.
pub(super) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewItem>>), ApiError> {
    let rid = &req_id.0;
    let draft = ReviewDraft {
        rating: body.rating,
        text: body.text,
    };
    validate_draft(rid, &draft)?;

    let sentiment = sentiment_for_new_review(&state.classifier, draft.text.as_deref()).await;

    let row = drinkorder_db::insert_review(
        &state.pool,
        body.drink_id,
        body.customer_id,
        &draft,
        sentiment,
    )
    .await
    .map_err(|e| map_insert_error(rid, &e))?;

    tracing::debug!(review_id = row.id, sentiment = %sentiment, "review created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ReviewItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/reviews/:review_id: replace rating and text.
///
/// The row stays locked from read to write, so concurrent edits of one
/// review are applied one after the other and each sees the text the
/// previous edit stored.
pub(super) async fn update_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(review_id): Path<i64>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<UpdatedReviewItem>>, ApiError> {
    let rid = &req_id.0;
    let draft = ReviewDraft {
        rating: body.rating,
        text: body.text,
    };
    validate_draft(rid, &draft)?;

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?;

    let current = drinkorder_db::lock_review_for_update(&mut tx, review_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "review not found"))?;
    let previous_sentiment = current
        .sentiment_label()
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let update = sentiment_for_edited_review(
        &state.classifier,
        review_id,
        current.text.as_deref(),
        previous_sentiment,
        draft.text.as_deref(),
    )
    .await;

    let row = drinkorder_db::update_review(&mut tx, review_id, &draft, update.sentiment)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tx.commit()
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data: UpdatedReviewItem {
            review: ReviewItem::from(row),
            reclassified: update.reclassified,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/reviews/:review_id
pub(super) async fn get_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(review_id): Path<i64>,
) -> Result<Json<ApiResponse<ReviewItem>>, ApiError> {
    let row = drinkorder_db::get_review(&state.pool, review_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "review not found"))?;

    Ok(Json(ApiResponse {
        data: ReviewItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/reviews?drink_id=&sentiment=&limit=
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let sentiment = parse_sentiment_filter(&req_id.0, query.sentiment.as_deref())?;
    let filter = ReviewFilter {
        drink_id: query.drink_id,
        sentiment,
    };

    let rows = drinkorder_db::list_reviews(&state.pool, filter, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
