//! Database operations for the `recommendation_settings` table (one row per shop).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `recommendation_settings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecommendationSettingsRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub is_enabled: bool,
    pub title: String,
    pub number_of_products: i32,
    pub layout: String,
    pub show_price: bool,
    pub show_add_to_cart: bool,
    pub card_background_color: String,
    pub card_border_radius: i32,
    pub title_color: String,
    pub title_font_size: i32,
    pub price_color: String,
    pub price_font_size: i32,
    pub button_background_color: String,
    pub button_text_color: String,
    pub button_font_size: i32,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for a full recommendation settings upsert.
#[derive(Debug, Clone)]
pub struct NewRecommendationSettings {
    pub is_enabled: bool,
    pub title: String,
    pub number_of_products: i32,
    pub layout: String,
    pub show_price: bool,
    pub show_add_to_cart: bool,
    pub card_background_color: String,
    pub card_border_radius: i32,
    pub title_color: String,
    pub title_font_size: i32,
    pub price_color: String,
    pub price_font_size: i32,
    pub button_background_color: String,
    pub button_text_color: String,
    pub button_font_size: i32,
    pub display_order: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the shop's recommendation settings, or `None` when never saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_recommendation_settings(
    pool: &PgPool,
    shop: &str,
) -> Result<Option<RecommendationSettingsRow>, DbError> {
    let row = sqlx::query_as::<_, RecommendationSettingsRow>(
        "SELECT id, public_id, shop, is_enabled, title, number_of_products, layout, \
                show_price, show_add_to_cart, card_background_color, card_border_radius, \
                title_color, title_font_size, price_color, price_font_size, \
                button_background_color, button_text_color, button_font_size, \
                display_order, created_at, updated_at \
         FROM recommendation_settings \
         WHERE shop = $1",
    )
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts the full recommendation settings document for a shop.
///
/// `created_at` is preserved on conflict; only `updated_at` moves.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_recommendation_settings(
    pool: &PgPool,
    shop: &str,
    settings: &NewRecommendationSettings,
) -> Result<RecommendationSettingsRow, DbError> {
    let row = sqlx::query_as::<_, RecommendationSettingsRow>(
        "INSERT INTO recommendation_settings \
           (shop, is_enabled, title, number_of_products, layout, show_price, \
            show_add_to_cart, card_background_color, card_border_radius, title_color, \
            title_font_size, price_color, price_font_size, button_background_color, \
            button_text_color, button_font_size, display_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
         ON CONFLICT (shop) DO UPDATE SET \
           is_enabled = EXCLUDED.is_enabled, \
           title = EXCLUDED.title, \
           number_of_products = EXCLUDED.number_of_products, \
           layout = EXCLUDED.layout, \
           show_price = EXCLUDED.show_price, \
           show_add_to_cart = EXCLUDED.show_add_to_cart, \
           card_background_color = EXCLUDED.card_background_color, \
           card_border_radius = EXCLUDED.card_border_radius, \
           title_color = EXCLUDED.title_color, \
           title_font_size = EXCLUDED.title_font_size, \
           price_color = EXCLUDED.price_color, \
           price_font_size = EXCLUDED.price_font_size, \
           button_background_color = EXCLUDED.button_background_color, \
           button_text_color = EXCLUDED.button_text_color, \
           button_font_size = EXCLUDED.button_font_size, \
           display_order = EXCLUDED.display_order, \
           updated_at = NOW() \
         RETURNING id, public_id, shop, is_enabled, title, number_of_products, layout, \
                   show_price, show_add_to_cart, card_background_color, card_border_radius, \
                   title_color, title_font_size, price_color, price_font_size, \
                   button_background_color, button_text_color, button_font_size, \
                   display_order, created_at, updated_at",
    )
    .bind(shop)
    .bind(settings.is_enabled)
    .bind(&settings.title)
    .bind(settings.number_of_products)
    .bind(&settings.layout)
    .bind(settings.show_price)
    .bind(settings.show_add_to_cart)
    .bind(&settings.card_background_color)
    .bind(settings.card_border_radius)
    .bind(&settings.title_color)
    .bind(settings.title_font_size)
    .bind(&settings.price_color)
    .bind(settings.price_font_size)
    .bind(&settings.button_background_color)
    .bind(&settings.button_text_color)
    .bind(settings.button_font_size)
    .bind(settings.display_order)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
