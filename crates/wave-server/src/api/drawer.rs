//! Drawer settings handlers: per-shop appearance and component layout.
//!
//! - `GET /api/v1/shops/:shop/drawer`        — settings, or defaults when unset
//! - `PUT /api/v1/shops/:shop/drawer`        — full settings upsert
//! - `PUT /api/v1/shops/:shop/drawer/layout` — component-order-only update

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wave_core::drawer::{self, defaults, Position};

use crate::middleware::RequestId;

use super::{map_db_error, validate_shop, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Drawer settings as returned to the admin UI and the storefront payload.
///
/// Timestamps are `None` when the shop has never saved settings and the
/// response is synthesized from defaults.
#[derive(Debug, Serialize)]
pub(super) struct DrawerSettingsItem {
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
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DrawerSettingsItem {
    pub(super) fn from_row(row: wave_db::DrawerSettingsRow) -> Self {
        Self {
            shop: row.shop,
            is_enabled: row.is_enabled,
            position: row.position,
            width: row.width,
            background_color: row.background_color,
            text_color: row.text_color,
            close_button_color: row.close_button_color,
            show_trigger_button: row.show_trigger_button,
            open_on_cart_click: row.open_on_cart_click,
            component_order: row.component_order,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }

    pub(super) fn defaults_for_shop(shop: &str) -> Self {
        Self {
            shop: shop.to_owned(),
            is_enabled: false,
            position: defaults::drawer::POSITION.to_owned(),
            width: defaults::drawer::WIDTH,
            background_color: defaults::drawer::BACKGROUND_COLOR.to_owned(),
            text_color: defaults::drawer::TEXT_COLOR.to_owned(),
            close_button_color: defaults::drawer::CLOSE_BUTTON_COLOR.to_owned(),
            show_trigger_button: true,
            open_on_cart_click: true,
            component_order: drawer::default_component_order(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Full settings write. Missing fields take the same defaults the admin form
/// starts from, so a sparse body is a valid full document.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct UpdateDrawerSettingsRequest {
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

impl Default for UpdateDrawerSettingsRequest {
    fn default() -> Self {
        Self {
            is_enabled: false,
            position: defaults::drawer::POSITION.to_owned(),
            width: defaults::drawer::WIDTH,
            background_color: defaults::drawer::BACKGROUND_COLOR.to_owned(),
            text_color: defaults::drawer::TEXT_COLOR.to_owned(),
            close_button_color: defaults::drawer::CLOSE_BUTTON_COLOR.to_owned(),
            show_trigger_button: true,
            open_on_cart_click: true,
            component_order: drawer::default_component_order(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct UpdateLayoutRequest {
    pub component_order: Vec<String>,
}

impl Default for UpdateLayoutRequest {
    fn default() -> Self {
        Self {
            component_order: drawer::default_component_order(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

pub(super) fn validate_hex_color(req_id: &str, field: &str, value: &str) -> Result<(), ApiError> {
    if drawer::is_hex_color(value) {
        Ok(())
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' must be a hex color like #10b981, got '{value}'"),
        ))
    }
}

fn validate_component_order(req_id: &str, order: &[String]) -> Result<(), ApiError> {
    if order.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "component_order must not be empty",
        ));
    }
    for component in order {
        if !drawer::DEFAULT_COMPONENT_ORDER.contains(&component.as_str()) {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("unknown drawer component '{component}'"),
            ));
        }
    }
    Ok(())
}

fn validate_settings(req_id: &str, body: &UpdateDrawerSettingsRequest) -> Result<(), ApiError> {
    if Position::parse(&body.position).is_none() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("position must be 'left' or 'right', got '{}'", body.position),
        ));
    }
    if !(100..=1000).contains(&body.width) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("width must be 100–1000 pixels, got {}", body.width),
        ));
    }
    validate_hex_color(req_id, "background_color", &body.background_color)?;
    validate_hex_color(req_id, "text_color", &body.text_color)?;
    validate_hex_color(req_id, "close_button_color", &body.close_button_color)?;
    validate_component_order(req_id, &body.component_order)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/:shop/drawer — settings, or defaults when never saved.
pub(super) async fn get_drawer_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<DrawerSettingsItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let data = wave_db::get_drawer_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .map_or_else(
            || DrawerSettingsItem::defaults_for_shop(&shop),
            DrawerSettingsItem::from_row,
        );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/shops/:shop/drawer — full settings upsert.
pub(super) async fn upsert_drawer_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<UpdateDrawerSettingsRequest>,
) -> Result<Json<ApiResponse<DrawerSettingsItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_settings(rid, &body)?;

    let settings = wave_db::NewDrawerSettings {
        is_enabled: body.is_enabled,
        position: body.position,
        width: body.width,
        background_color: body.background_color,
        text_color: body.text_color,
        close_button_color: body.close_button_color,
        show_trigger_button: body.show_trigger_button,
        open_on_cart_click: body.open_on_cart_click,
        component_order: body.component_order,
    };

    let row = wave_db::upsert_drawer_settings(&state.pool, &shop, &settings)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: DrawerSettingsItem::from_row(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/shops/:shop/drawer/layout — component-order-only update.
///
/// Must not touch any other setting; shops reorder components without
/// re-submitting the full appearance form.
pub(super) async fn update_layout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<UpdateLayoutRequest>,
) -> Result<Json<ApiResponse<DrawerSettingsItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_component_order(rid, &body.component_order)?;

    let row = wave_db::update_component_order(&state.pool, &shop, &body.component_order)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: DrawerSettingsItem::from_row(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_settings_request_fills_in_defaults() {
        let body: UpdateDrawerSettingsRequest =
            serde_json::from_value(serde_json::json!({ "is_enabled": true })).expect("deserialize");
        assert!(body.is_enabled);
        assert_eq!(body.position, "right");
        assert_eq!(body.width, 400);
        assert_eq!(body.component_order.len(), 4);
    }

    #[test]
    fn settings_item_defaults_have_no_timestamps() {
        let item = DrawerSettingsItem::defaults_for_shop("demo.myshopify.com");
        assert!(item.created_at.is_none());
        assert!(item.updated_at.is_none());
        assert!(!item.is_enabled);
    }

    #[test]
    fn component_order_rejects_unknown_ids() {
        let result = validate_component_order("req-1", &["cart".to_string(), "hero".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn settings_validation_rejects_bad_color() {
        let body = UpdateDrawerSettingsRequest {
            text_color: "red".to_string(),
            ..UpdateDrawerSettingsRequest::default()
        };
        assert!(validate_settings("req-1", &body).is_err());
    }
}
