//! Announcement handlers: per-shop banner messages shown inside the drawer.
//!
//! - `GET    /api/v1/shops/:shop/announcements`     — ordered list
//! - `POST   /api/v1/shops/:shop/announcements`     — create
//! - `PATCH  /api/v1/shops/:shop/announcements/:id` — full replace
//! - `DELETE /api/v1/shops/:shop/announcements/:id` — delete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wave_core::drawer::defaults;

use crate::middleware::RequestId;

use super::drawer::validate_hex_color;
use super::{map_db_error, validate_shop, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct AnnouncementItem {
    pub id: i64,
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

impl AnnouncementItem {
    pub(super) fn from_row(row: wave_db::AnnouncementRow) -> Self {
        Self {
            id: row.id,
            shop: row.shop,
            is_enabled: row.is_enabled,
            title: row.title,
            message: row.message,
            background_color: row.background_color,
            text_color: row.text_color,
            font_size: row.font_size,
            font_weight: row.font_weight,
            link: row.link,
            link_text: row.link_text,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create/replace body. Missing fields take the admin form's defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct AnnouncementRequest {
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

impl Default for AnnouncementRequest {
    fn default() -> Self {
        Self {
            is_enabled: false,
            title: String::new(),
            message: String::new(),
            background_color: defaults::announcement::BACKGROUND_COLOR.to_owned(),
            text_color: defaults::announcement::TEXT_COLOR.to_owned(),
            font_size: defaults::announcement::FONT_SIZE,
            font_weight: defaults::announcement::FONT_WEIGHT.to_owned(),
            link: None,
            link_text: None,
            display_order: 0,
        }
    }
}

fn validate_announcement(req_id: &str, body: &AnnouncementRequest) -> Result<(), ApiError> {
    validate_hex_color(req_id, "background_color", &body.background_color)?;
    validate_hex_color(req_id, "text_color", &body.text_color)?;
    if body.font_size < 1 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("font_size must be positive, got {}", body.font_size),
        ));
    }
    Ok(())
}

fn to_new_announcement(body: AnnouncementRequest) -> wave_db::NewAnnouncement {
    wave_db::NewAnnouncement {
        is_enabled: body.is_enabled,
        title: body.title,
        message: body.message,
        background_color: body.background_color,
        text_color: body.text_color,
        font_size: body.font_size,
        font_weight: body.font_weight,
        link: body.link.filter(|l| !l.is_empty()),
        link_text: body.link_text.filter(|l| !l.is_empty()),
        display_order: body.display_order,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/:shop/announcements — all rows, ordered by display order.
pub(super) async fn list_announcements(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<Vec<AnnouncementItem>>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let rows = wave_db::list_announcements(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(AnnouncementItem::from_row).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/shops/:shop/announcements — create a new announcement.
pub(super) async fn create_announcement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<AnnouncementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AnnouncementItem>>), ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_announcement(rid, &body)?;

    let row = wave_db::create_announcement(&state.pool, &shop, &to_new_announcement(body))
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: AnnouncementItem::from_row(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/shops/:shop/announcements/:id — replace an announcement.
pub(super) async fn update_announcement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((shop, id)): Path<(String, i64)>,
    Json(body): Json<AnnouncementRequest>,
) -> Result<Json<ApiResponse<AnnouncementItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_announcement(rid, &body)?;

    let row = wave_db::update_announcement(&state.pool, &shop, id, &to_new_announcement(body))
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(rid, "not_found", format!("announcement {id} not found"))
        })?;

    Ok(Json(ApiResponse {
        data: AnnouncementItem::from_row(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/shops/:shop/announcements/:id — delete an announcement.
pub(super) async fn delete_announcement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((shop, id)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let deleted = wave_db::delete_announcement(&state.pool, &shop, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("announcement {id} not found"),
        ));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
