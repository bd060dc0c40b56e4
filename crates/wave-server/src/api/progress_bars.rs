//! Progress bar handlers: the free-shipping goal widget.
//!
//! - `GET    /api/v1/shops/:shop/progress-bars`      — ordered list
//! - `POST   /api/v1/shops/:shop/progress-bars`      — create
//! - `PATCH  /api/v1/shops/:shop/progress-bars/:id`  — full replace
//! - `DELETE /api/v1/shops/:shop/progress-bars/:id`  — delete
//! - `GET    /api/v1/shops/:shop/shipping-discount`  — synced discount config
//!
//! Saving an enabled bar with a positive goal also upserts the shop's durable
//! shipping discount configuration, which is what the checkout pipeline embeds
//! as the discount metafield value.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wave_core::drawer::defaults;

use crate::middleware::RequestId;

use super::drawer::validate_hex_color;
use super::{map_db_error, validate_shop, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct ProgressBarItem {
    pub id: i64,
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

impl ProgressBarItem {
    pub(super) fn from_row(row: wave_db::ProgressBarRow) -> Self {
        Self {
            id: row.id,
            shop: row.shop,
            is_enabled: row.is_enabled,
            title: row.title,
            goal_amount: row.goal_amount,
            goal_text: row.goal_text,
            background_color: row.background_color,
            progress_color: row.progress_color,
            text_color: row.text_color,
            show_percentage: row.show_percentage,
            show_amount: row.show_amount,
            height: row.height,
            border_radius: row.border_radius,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ShippingDiscountItem {
    pub shop: String,
    pub title: String,
    pub goal_amount: Decimal,
    pub goal_text: String,
    pub configuration: serde_json::Value,
    pub starts_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/replace body. Missing fields take the admin form's defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct ProgressBarRequest {
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

impl Default for ProgressBarRequest {
    fn default() -> Self {
        Self {
            is_enabled: false,
            title: String::new(),
            goal_amount: defaults::progress_bar::GOAL_AMOUNT
                .parse()
                .unwrap_or(Decimal::ONE_HUNDRED),
            goal_text: defaults::progress_bar::GOAL_TEXT.to_owned(),
            background_color: defaults::progress_bar::BACKGROUND_COLOR.to_owned(),
            progress_color: defaults::progress_bar::PROGRESS_COLOR.to_owned(),
            text_color: defaults::progress_bar::TEXT_COLOR.to_owned(),
            show_percentage: true,
            show_amount: true,
            height: defaults::progress_bar::HEIGHT,
            border_radius: defaults::progress_bar::BORDER_RADIUS,
            display_order: 0,
        }
    }
}

fn validate_progress_bar(req_id: &str, body: &ProgressBarRequest) -> Result<(), ApiError> {
    if body.goal_amount < Decimal::ZERO {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("goal_amount must not be negative, got {}", body.goal_amount),
        ));
    }
    validate_hex_color(req_id, "background_color", &body.background_color)?;
    validate_hex_color(req_id, "progress_color", &body.progress_color)?;
    validate_hex_color(req_id, "text_color", &body.text_color)?;
    if body.height < 1 || body.border_radius < 0 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "height must be positive and border_radius non-negative",
        ));
    }
    Ok(())
}

fn to_new_progress_bar(body: ProgressBarRequest) -> wave_db::NewProgressBar {
    wave_db::NewProgressBar {
        is_enabled: body.is_enabled,
        title: body.title,
        goal_amount: body.goal_amount,
        goal_text: body.goal_text,
        background_color: body.background_color,
        progress_color: body.progress_color,
        text_color: body.text_color,
        show_percentage: body.show_percentage,
        show_amount: body.show_amount,
        height: body.height,
        border_radius: body.border_radius,
        display_order: body.display_order,
    }
}

// ---------------------------------------------------------------------------
// Shipping discount sync
// ---------------------------------------------------------------------------

/// Upsert the shop's durable discount configuration from a saved bar.
///
/// Only runs for an enabled bar with a positive goal and non-empty goal text.
/// A sync failure is logged and swallowed: the bar write already succeeded,
/// and the merchant can re-save to retry.
async fn sync_shipping_discount(
    pool: &sqlx::PgPool,
    shop: &str,
    bar: &wave_db::NewProgressBar,
) {
    if !bar.is_enabled || bar.goal_amount <= Decimal::ZERO || bar.goal_text.trim().is_empty() {
        return;
    }

    let title = format!("Wave Free Shipping - {}", bar.goal_text);
    let configuration = serde_json::json!({
        "goalAmount": bar.goal_amount,
        "goalText": bar.goal_text,
    });

    match wave_db::upsert_shipping_discount(
        pool,
        shop,
        &title,
        bar.goal_amount,
        &bar.goal_text,
        &configuration,
    )
    .await
    {
        Ok(row) => {
            tracing::info!(shop, title = %row.title, goal = %row.goal_amount, "synced shipping discount configuration");
        }
        Err(e) => {
            tracing::error!(shop, error = %e, "failed to sync shipping discount configuration");
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/:shop/progress-bars — all rows, ordered by display order.
pub(super) async fn list_progress_bars(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<Vec<ProgressBarItem>>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let rows = wave_db::list_progress_bars(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ProgressBarItem::from_row).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/shops/:shop/progress-bars — create a new progress bar.
pub(super) async fn create_progress_bar(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<ProgressBarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProgressBarItem>>), ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_progress_bar(rid, &body)?;

    let bar = to_new_progress_bar(body);
    let row = wave_db::create_progress_bar(&state.pool, &shop, &bar)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    sync_shipping_discount(&state.pool, &shop, &bar).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProgressBarItem::from_row(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/shops/:shop/progress-bars/:id — replace a progress bar.
pub(super) async fn update_progress_bar(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((shop, id)): Path<(String, i64)>,
    Json(body): Json<ProgressBarRequest>,
) -> Result<Json<ApiResponse<ProgressBarItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_progress_bar(rid, &body)?;

    let bar = to_new_progress_bar(body);
    let row = wave_db::update_progress_bar(&state.pool, &shop, id, &bar)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", format!("progress bar {id} not found")))?;

    sync_shipping_discount(&state.pool, &shop, &bar).await;

    Ok(Json(ApiResponse {
        data: ProgressBarItem::from_row(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/shops/:shop/progress-bars/:id — delete a progress bar.
pub(super) async fn delete_progress_bar(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((shop, id)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let deleted = wave_db::delete_progress_bar(&state.pool, &shop, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("progress bar {id} not found"),
        ));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/shops/:shop/shipping-discount — current synced configuration.
pub(super) async fn get_shipping_discount(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<ShippingDiscountItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let row = wave_db::get_shipping_discount(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                rid,
                "not_found",
                format!("no shipping discount configured for '{shop}'"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: ShippingDiscountItem {
            shop: row.shop,
            title: row.title,
            goal_amount: row.goal_amount,
            goal_text: row.goal_text,
            configuration: row.configuration,
            starts_at: row.starts_at,
            updated_at: row.updated_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_request_fills_in_defaults() {
        let body: ProgressBarRequest =
            serde_json::from_value(serde_json::json!({ "is_enabled": true })).expect("deserialize");
        assert!(body.is_enabled);
        assert_eq!(body.goal_amount, Decimal::ONE_HUNDRED);
        assert_eq!(body.goal_text, "Free Shipping");
        assert_eq!(body.progress_color, "#10b981");
    }

    #[test]
    fn goal_amount_accepts_decimal_strings() {
        let body: ProgressBarRequest =
            serde_json::from_value(serde_json::json!({ "goal_amount": "75.50" }))
                .expect("deserialize");
        assert_eq!(body.goal_amount.to_string(), "75.50");
    }

    #[test]
    fn validation_rejects_negative_goal() {
        let body: ProgressBarRequest =
            serde_json::from_value(serde_json::json!({ "goal_amount": "-1" }))
                .expect("deserialize");
        assert!(validate_progress_bar("req-1", &body).is_err());
    }
}
