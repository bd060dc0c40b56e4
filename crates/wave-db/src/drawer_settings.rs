//! Database operations for the `drawer_settings` table (one row per shop).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `drawer_settings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrawerSettingsRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub is_enabled: bool,
    pub position: String,
    pub width: i32,
    pub background_color: String,
    pub text_color: String,
    pub close_button_color: String,
    pub show_trigger_button: bool,
    pub open_on_cart_click: bool,
    pub component_order: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for a full drawer settings upsert.
#[derive(Debug, Clone)]
pub struct NewDrawerSettings {
    pub is_enabled: bool,
    pub position: String,
    pub width: i32,
    pub background_color: String,
    pub text_color: String,
    pub close_button_color: String,
    pub show_trigger_button: bool,
    pub open_on_cart_click: bool,
    pub component_order: Vec<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the shop's drawer settings, or `None` when never saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_drawer_settings(
    pool: &PgPool,
    shop: &str,
) -> Result<Option<DrawerSettingsRow>, DbError> {
    let row = sqlx::query_as::<_, DrawerSettingsRow>(
        "SELECT id, public_id, shop, is_enabled, position, width, background_color, \
                text_color, close_button_color, show_trigger_button, open_on_cart_click, \
                component_order, created_at, updated_at \
         FROM drawer_settings \
         WHERE shop = $1",
    )
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts the full drawer settings document for a shop and returns the row.
///
/// `created_at` is preserved on conflict; only `updated_at` moves.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_drawer_settings(
    pool: &PgPool,
    shop: &str,
    settings: &NewDrawerSettings,
) -> Result<DrawerSettingsRow, DbError> {
    let row = sqlx::query_as::<_, DrawerSettingsRow>(
        "INSERT INTO drawer_settings \
           (shop, is_enabled, position, width, background_color, text_color, \
            close_button_color, show_trigger_button, open_on_cart_click, component_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (shop) DO UPDATE SET \
           is_enabled = EXCLUDED.is_enabled, \
           position = EXCLUDED.position, \
           width = EXCLUDED.width, \
           background_color = EXCLUDED.background_color, \
           text_color = EXCLUDED.text_color, \
           close_button_color = EXCLUDED.close_button_color, \
           show_trigger_button = EXCLUDED.show_trigger_button, \
           open_on_cart_click = EXCLUDED.open_on_cart_click, \
           component_order = EXCLUDED.component_order, \
           updated_at = NOW() \
         RETURNING id, public_id, shop, is_enabled, position, width, background_color, \
                   text_color, close_button_color, show_trigger_button, open_on_cart_click, \
                   component_order, created_at, updated_at",
    )
    .bind(shop)
    .bind(settings.is_enabled)
    .bind(&settings.position)
    .bind(settings.width)
    .bind(&settings.background_color)
    .bind(&settings.text_color)
    .bind(&settings.close_button_color)
    .bind(settings.show_trigger_button)
    .bind(settings.open_on_cart_click)
    .bind(&settings.component_order)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Updates only the component display order, leaving other settings untouched.
///
/// Inserts a row with column defaults when the shop has never saved settings,
/// mirroring the upsert semantics of the full write path.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_component_order(
    pool: &PgPool,
    shop: &str,
    component_order: &[String],
) -> Result<DrawerSettingsRow, DbError> {
    let row = sqlx::query_as::<_, DrawerSettingsRow>(
        "INSERT INTO drawer_settings (shop, component_order) \
         VALUES ($1, $2) \
         ON CONFLICT (shop) DO UPDATE SET \
           component_order = EXCLUDED.component_order, \
           updated_at = NOW() \
         RETURNING id, public_id, shop, is_enabled, position, width, background_color, \
                   text_color, close_button_color, show_trigger_button, open_on_cart_click, \
                   component_order, created_at, updated_at",
    )
    .bind(shop)
    .bind(component_order)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
