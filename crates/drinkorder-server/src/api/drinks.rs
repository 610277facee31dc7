use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use drinkorder_db::{DrinkFilter, DrinkRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DrinkItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub is_available: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    pub id: i64,
    pub name: String,
    pub drink_count: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct DrinksQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct AvailabilityRequest {
    pub is_available: bool,
}

impl From<DrinkRow> for DrinkItem {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category_name,
            description: row.description,
            price: row.price,
            is_available: row.is_available,
            updated_at: row.updated_at,
        }
    }
}

/// GET /api/v1/drinks?category=&q=&available_only=
pub(super) async fn list_drinks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DrinksQuery>,
) -> Result<Json<ApiResponse<Vec<DrinkItem>>>, ApiError> {
    let filter = DrinkFilter {
        category: query.category,
        search: query.q,
        available_only: query.available_only,
    };
    let rows = drinkorder_db::list_drinks(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DrinkItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/drinks/:drink_id/availability
pub(super) async fn set_availability(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(drink_id): Path<i64>,
    Json(body): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<DrinkItem>>, ApiError> {
    let row = drinkorder_db::set_drink_availability(&state.pool, drink_id, body.is_available)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(drink_id, is_available = body.is_available, "drink availability changed");

    Ok(Json(ApiResponse {
        data: DrinkItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/categories
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryItem>>>, ApiError> {
    let rows = drinkorder_db::list_categories(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| CategoryItem {
            id: row.id,
            name: row.name,
            drink_count: row.drink_count,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
