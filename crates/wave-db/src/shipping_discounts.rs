//! Database operations for the `shipping_discounts` table.
//!
//! One row per shop: the durable free-shipping configuration synced from the
//! shop's progress bar. `configuration` holds the exact JSON document the
//! checkout pipeline embeds as the discount metafield value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `shipping_discounts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShippingDiscountRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub title: String,
    pub goal_amount: Decimal,
    pub goal_text: String,
    pub configuration: serde_json::Value,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns the shop's synced shipping discount, or `None` when never synced.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_shipping_discount(
    pool: &PgPool,
    shop: &str,
) -> Result<Option<ShippingDiscountRow>, DbError> {
    let row = sqlx::query_as::<_, ShippingDiscountRow>(
        "SELECT id, public_id, shop, title, goal_amount, goal_text, configuration, \
                starts_at, created_at, updated_at \
         FROM shipping_discounts \
         WHERE shop = $1",
    )
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts the shop's shipping discount configuration and returns the row.
///
/// `starts_at` and `created_at` are preserved on conflict; only the goal
/// fields, title, configuration document and `updated_at` move.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_shipping_discount(
    pool: &PgPool,
    shop: &str,
    title: &str,
    goal_amount: Decimal,
    goal_text: &str,
    configuration: &serde_json::Value,
) -> Result<ShippingDiscountRow, DbError> {
    let row = sqlx::query_as::<_, ShippingDiscountRow>(
        "INSERT INTO shipping_discounts (shop, title, goal_amount, goal_text, configuration) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (shop) DO UPDATE SET \
           title = EXCLUDED.title, \
           goal_amount = EXCLUDED.goal_amount, \
           goal_text = EXCLUDED.goal_text, \
           configuration = EXCLUDED.configuration, \
           updated_at = NOW() \
         RETURNING id, public_id, shop, title, goal_amount, goal_text, configuration, \
                   starts_at, created_at, updated_at",
    )
    .bind(shop)
    .bind(title)
    .bind(goal_amount)
    .bind(goal_text)
    .bind(configuration)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
