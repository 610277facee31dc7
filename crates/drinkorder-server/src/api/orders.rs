use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use drinkorder_db::OrderRow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OrderItem {
    pub id: i64,
    pub customer_id: i64,
    pub customer: String,
    pub status: String,
    pub total_price: Decimal,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub served_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct FavoriteItem {
    pub drink_id: i64,
    pub drink_name: String,
    pub total_quantity: i64,
    pub order_count: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct FavoritesQuery {
    pub limit: Option<i64>,
}

impl From<OrderRow> for OrderItem {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            customer: row.customer_username,
            status: row.status,
            total_price: row.total_price,
            item_count: row.item_count,
            created_at: row.created_at,
            served_at: row.served_at,
        }
    }
}

/// GET /api/v1/orders/pending: the bartender queue, oldest first.
pub(super) async fn list_pending_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<OrderItem>>>, ApiError> {
    let rows = drinkorder_db::list_pending_orders(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(OrderItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/orders/:order_id/serve
///
/// Unknown and already-served orders are both `not_found`.
pub(super) async fn serve_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(order_id): Path<i64>,
) -> Result<Json<ApiResponse<OrderItem>>, ApiError> {
    let row = drinkorder_db::serve_order(&state.pool, order_id)
        .await
        .map_err(|e| match e {
            drinkorder_db::DbError::NotFound => {
                ApiError::new(req_id.0.clone(), "not_found", "no pending order with that id")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    tracing::info!(order_id, "order served");

    Ok(Json(ApiResponse {
        data: OrderItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/customers/:customer_id/favorites?limit=
pub(super) async fn list_customer_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(customer_id): Path<i64>,
    Query(query): Query<FavoritesQuery>,
) -> Result<Json<ApiResponse<Vec<FavoriteItem>>>, ApiError> {
    let rows = drinkorder_db::list_customer_favorites(
        &state.pool,
        customer_id,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| FavoriteItem {
            drink_id: row.drink_id,
            drink_name: row.drink_name,
            total_quantity: row.total_quantity,
            order_count: row.order_count,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
