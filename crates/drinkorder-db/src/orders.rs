//! Database operations for `orders` and `order_items`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// An order with its customer and item count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub customer_id: i64,
    pub customer_username: String,
    /// `pending` or `served`.
    pub status: String,
    pub total_price: Decimal,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub served_at: Option<DateTime<Utc>>,
}

/// A drink a customer has ordered, with the total quantity across orders.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteDrinkRow {
    pub drink_id: i64,
    pub drink_name: String,
    pub total_quantity: i64,
    pub order_count: i64,
}

/// List pending orders, oldest first, for the bartender queue.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_orders(pool: &PgPool) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT o.id, o.customer_id, cu.username AS customer_username, o.status, \
                o.total_price, \
                COALESCE(SUM(oi.quantity), 0)::BIGINT AS item_count, \
                o.created_at, o.served_at \
         FROM orders o \
         JOIN customers cu ON cu.id = o.customer_id \
         LEFT JOIN order_items oi ON oi.order_id = o.id \
         WHERE o.status = 'pending' \
         GROUP BY o.id, cu.username \
         ORDER BY o.created_at, o.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Move a pending order to `served`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the order does not exist or was
/// already served, or [`DbError::Sqlx`] if the update fails.
pub async fn serve_order(pool: &PgPool, order_id: i64) -> Result<OrderRow, DbError> {
    sqlx::query_as::<_, OrderRow>(
        "WITH served AS ( \
             UPDATE orders SET status = 'served', served_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING * \
         ) \
         SELECT s.id, s.customer_id, cu.username AS customer_username, s.status, \
                s.total_price, \
                (SELECT COALESCE(SUM(oi.quantity), 0)::BIGINT \
                 FROM order_items oi WHERE oi.order_id = s.id) AS item_count, \
                s.created_at, s.served_at \
         FROM served s \
         JOIN customers cu ON cu.id = s.customer_id",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Rank the drinks a customer has ordered by total quantity.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_customer_favorites(
    pool: &PgPool,
    customer_id: i64,
    limit: i64,
) -> Result<Vec<FavoriteDrinkRow>, DbError> {
    let rows = sqlx::query_as::<_, FavoriteDrinkRow>(
        "SELECT d.id AS drink_id, d.name AS drink_name, \
                SUM(oi.quantity)::BIGINT AS total_quantity, \
                COUNT(DISTINCT o.id) AS order_count \
         FROM orders o \
         JOIN order_items oi ON oi.order_id = o.id \
         JOIN drinks d ON d.id = oi.drink_id \
         WHERE o.customer_id = $1 \
         GROUP BY d.id, d.name \
         ORDER BY total_quantity DESC, d.name \
         LIMIT $2",
    )
    .bind(customer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
