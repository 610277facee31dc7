//! Database operations for `drinks` and `categories`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A drink joined with its category name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with the number of drinks filed under it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub drink_count: i64,
}

/// Optional filters for [`list_drinks`].
#[derive(Debug, Clone, Default)]
pub struct DrinkFilter {
    /// Exact category name, compared case-insensitively.
    pub category: Option<String>,
    /// Substring matched case-insensitively against name and description.
    pub search: Option<String>,
    pub available_only: bool,
}

/// List drinks ordered by category then name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_drinks(pool: &PgPool, filter: &DrinkFilter) -> Result<Vec<DrinkRow>, DbError> {
    let pattern = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let rows = sqlx::query_as::<_, DrinkRow>(
        "SELECT d.id, d.category_id, c.name AS category_name, d.name, d.description, \
                d.price, d.is_available, d.created_at, d.updated_at \
         FROM drinks d \
         JOIN categories c ON c.id = d.category_id \
         WHERE ($1::TEXT IS NULL OR LOWER(c.name) = LOWER($1)) \
           AND ($2::TEXT IS NULL OR d.name ILIKE $2 OR d.description ILIKE $2) \
           AND (NOT $3 OR d.is_available) \
         ORDER BY c.name, d.name, d.id",
    )
    .bind(filter.category.as_deref())
    .bind(pattern)
    .bind(filter.available_only)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark a drink as available or sold out.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no drink has `drink_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_drink_availability(
    pool: &PgPool,
    drink_id: i64,
    is_available: bool,
) -> Result<DrinkRow, DbError> {
    sqlx::query_as::<_, DrinkRow>(
        "WITH updated AS ( \
             UPDATE drinks SET is_available = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING * \
         ) \
         SELECT u.id, u.category_id, c.name AS category_name, u.name, u.description, \
                u.price, u.is_available, u.created_at, u.updated_at \
         FROM updated u \
         JOIN categories c ON c.id = u.category_id",
    )
    .bind(drink_id)
    .bind(is_available)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// List every category with its drink count, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT c.id, c.name, COUNT(d.id) AS drink_count \
         FROM categories c \
         LEFT JOIN drinks d ON d.category_id = c.id \
         GROUP BY c.id, c.name \
         ORDER BY c.name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("mojito"), "mojito");
    }
}
