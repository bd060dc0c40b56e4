//! Database operations for the `announcements` table (many rows per shop).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `announcements` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnnouncementRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub is_enabled: bool,
    pub title: String,
    pub message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: i32,
    pub font_weight: String,
    pub link: Option<String>,
    pub link_text: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for creating or fully replacing an announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub is_enabled: bool,
    pub title: String,
    pub message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: i32,
    pub font_weight: String,
    pub link: Option<String>,
    pub link_text: Option<String>,
    pub display_order: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all announcements for a shop, ordered by display order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_announcements(pool: &PgPool, shop: &str) -> Result<Vec<AnnouncementRow>, DbError> {
    let rows = sqlx::query_as::<_, AnnouncementRow>(
        "SELECT id, public_id, shop, is_enabled, title, message, background_color, \
                text_color, font_size, font_weight, link, link_text, display_order, \
                created_at, updated_at \
         FROM announcements \
         WHERE shop = $1 \
         ORDER BY display_order, id",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns only enabled announcements for a shop, ordered by display order.
///
/// This is the storefront read path.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_enabled_announcements(
    pool: &PgPool,
    shop: &str,
) -> Result<Vec<AnnouncementRow>, DbError> {
    let rows = sqlx::query_as::<_, AnnouncementRow>(
        "SELECT id, public_id, shop, is_enabled, title, message, background_color, \
                text_color, font_size, font_weight, link, link_text, display_order, \
                created_at, updated_at \
         FROM announcements \
         WHERE shop = $1 AND is_enabled = true \
         ORDER BY display_order, id",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Creates a new announcement row and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_announcement(
    pool: &PgPool,
    shop: &str,
    announcement: &NewAnnouncement,
) -> Result<AnnouncementRow, DbError> {
    let row = sqlx::query_as::<_, AnnouncementRow>(
        "INSERT INTO announcements \
           (shop, is_enabled, title, message, background_color, text_color, \
            font_size, font_weight, link, link_text, display_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id, public_id, shop, is_enabled, title, message, background_color, \
                   text_color, font_size, font_weight, link, link_text, display_order, \
                   created_at, updated_at",
    )
    .bind(shop)
    .bind(announcement.is_enabled)
    .bind(&announcement.title)
    .bind(&announcement.message)
    .bind(&announcement.background_color)
    .bind(&announcement.text_color)
    .bind(announcement.font_size)
    .bind(&announcement.font_weight)
    .bind(announcement.link.as_deref())
    .bind(announcement.link_text.as_deref())
    .bind(announcement.display_order)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fully replaces an announcement's fields, scoped to the owning shop.
///
/// Returns `None` when no announcement with that id belongs to the shop.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_announcement(
    pool: &PgPool,
    shop: &str,
    id: i64,
    announcement: &NewAnnouncement,
) -> Result<Option<AnnouncementRow>, DbError> {
    let row = sqlx::query_as::<_, AnnouncementRow>(
        "UPDATE announcements \
         SET is_enabled = $3, title = $4, message = $5, background_color = $6, \
             text_color = $7, font_size = $8, font_weight = $9, link = $10, \
             link_text = $11, display_order = $12, updated_at = NOW() \
         WHERE id = $1 AND shop = $2 \
         RETURNING id, public_id, shop, is_enabled, title, message, background_color, \
                   text_color, font_size, font_weight, link, link_text, display_order, \
                   created_at, updated_at",
    )
    .bind(id)
    .bind(shop)
    .bind(announcement.is_enabled)
    .bind(&announcement.title)
    .bind(&announcement.message)
    .bind(&announcement.background_color)
    .bind(&announcement.text_color)
    .bind(announcement.font_size)
    .bind(&announcement.font_weight)
    .bind(announcement.link.as_deref())
    .bind(announcement.link_text.as_deref())
    .bind(announcement.display_order)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes an announcement, scoped to the owning shop.
///
/// Returns `true` when a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_announcement(pool: &PgPool, shop: &str, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = $1 AND shop = $2")
        .bind(id)
        .bind(shop)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
