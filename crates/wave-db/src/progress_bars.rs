//! Database operations for the `progress_bars` table (many rows per shop).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `progress_bars` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressBarRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub is_enabled: bool,
    pub title: String,
    pub goal_amount: Decimal,
    pub goal_text: String,
    pub background_color: String,
    pub progress_color: String,
    pub text_color: String,
    pub show_percentage: bool,
    pub show_amount: bool,
    pub height: i32,
    pub border_radius: i32,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for creating or fully replacing a progress bar.
#[derive(Debug, Clone)]
pub struct NewProgressBar {
    pub is_enabled: bool,
    pub title: String,
    pub goal_amount: Decimal,
    pub goal_text: String,
    pub background_color: String,
    pub progress_color: String,
    pub text_color: String,
    pub show_percentage: bool,
    pub show_amount: bool,
    pub height: i32,
    pub border_radius: i32,
    pub display_order: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all progress bars for a shop, ordered by display order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_progress_bars(pool: &PgPool, shop: &str) -> Result<Vec<ProgressBarRow>, DbError> {
    let rows = sqlx::query_as::<_, ProgressBarRow>(
        "SELECT id, public_id, shop, is_enabled, title, goal_amount, goal_text, \
                background_color, progress_color, text_color, show_percentage, show_amount, \
                height, border_radius, display_order, created_at, updated_at \
         FROM progress_bars \
         WHERE shop = $1 \
         ORDER BY display_order, id",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns only enabled progress bars for a shop, ordered by display order.
///
/// This is the storefront read path.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_enabled_progress_bars(
    pool: &PgPool,
    shop: &str,
) -> Result<Vec<ProgressBarRow>, DbError> {
    let rows = sqlx::query_as::<_, ProgressBarRow>(
        "SELECT id, public_id, shop, is_enabled, title, goal_amount, goal_text, \
                background_color, progress_color, text_color, show_percentage, show_amount, \
                height, border_radius, display_order, created_at, updated_at \
         FROM progress_bars \
         WHERE shop = $1 AND is_enabled = true \
         ORDER BY display_order, id",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Creates a new progress bar row and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_progress_bar(
    pool: &PgPool,
    shop: &str,
    bar: &NewProgressBar,
) -> Result<ProgressBarRow, DbError> {
    let row = sqlx::query_as::<_, ProgressBarRow>(
        "INSERT INTO progress_bars \
           (shop, is_enabled, title, goal_amount, goal_text, background_color, \
            progress_color, text_color, show_percentage, show_amount, height, \
            border_radius, display_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING id, public_id, shop, is_enabled, title, goal_amount, goal_text, \
                   background_color, progress_color, text_color, show_percentage, show_amount, \
                   height, border_radius, display_order, created_at, updated_at",
    )
    .bind(shop)
    .bind(bar.is_enabled)
    .bind(&bar.title)
    .bind(bar.goal_amount)
    .bind(&bar.goal_text)
    .bind(&bar.background_color)
    .bind(&bar.progress_color)
    .bind(&bar.text_color)
    .bind(bar.show_percentage)
    .bind(bar.show_amount)
    .bind(bar.height)
    .bind(bar.border_radius)
    .bind(bar.display_order)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fully replaces a progress bar's fields, scoped to the owning shop.
///
/// Returns `None` when no progress bar with that id belongs to the shop.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_progress_bar(
    pool: &PgPool,
    shop: &str,
    id: i64,
    bar: &NewProgressBar,
) -> Result<Option<ProgressBarRow>, DbError> {
    let row = sqlx::query_as::<_, ProgressBarRow>(
        "UPDATE progress_bars \
         SET is_enabled = $3, title = $4, goal_amount = $5, goal_text = $6, \
             background_color = $7, progress_color = $8, text_color = $9, \
             show_percentage = $10, show_amount = $11, height = $12, \
             border_radius = $13, display_order = $14, updated_at = NOW() \
         WHERE id = $1 AND shop = $2 \
         RETURNING id, public_id, shop, is_enabled, title, goal_amount, goal_text, \
                   background_color, progress_color, text_color, show_percentage, show_amount, \
                   height, border_radius, display_order, created_at, updated_at",
    )
    .bind(id)
    .bind(shop)
    .bind(bar.is_enabled)
    .bind(&bar.title)
    .bind(bar.goal_amount)
    .bind(&bar.goal_text)
    .bind(&bar.background_color)
    .bind(&bar.progress_color)
    .bind(&bar.text_color)
    .bind(bar.show_percentage)
    .bind(bar.show_amount)
    .bind(bar.height)
    .bind(bar.border_radius)
    .bind(bar.display_order)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a progress bar, scoped to the owning shop.
///
/// Returns `true` when a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_progress_bar(pool: &PgPool, shop: &str, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM progress_bars WHERE id = $1 AND shop = $2")
        .bind(id)
        .bind(shop)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
