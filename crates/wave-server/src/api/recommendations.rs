//! Recommendation widget settings handlers.
//!
//! - `GET /api/v1/shops/:shop/recommendations` — settings, or defaults when unset
//! - `PUT /api/v1/shops/:shop/recommendations` — full settings upsert

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wave_core::drawer::{defaults, RecommendationLayout};

use crate::middleware::RequestId;

use super::drawer::validate_hex_color;
use super::{map_db_error, validate_shop, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Recommendation settings as returned to the admin UI and the storefront
/// payload. Timestamps are `None` when synthesized from defaults.
#[derive(Debug, Serialize)]
pub(super) struct RecommendationSettingsItem {
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
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecommendationSettingsItem {
    pub(super) fn from_row(row: wave_db::RecommendationSettingsRow) -> Self {
        Self {
            shop: row.shop,
            is_enabled: row.is_enabled,
            title: row.title,
            number_of_products: row.number_of_products,
            layout: row.layout,
            show_price: row.show_price,
            show_add_to_cart: row.show_add_to_cart,
            card_background_color: row.card_background_color,
            card_border_radius: row.card_border_radius,
            title_color: row.title_color,
            title_font_size: row.title_font_size,
            price_color: row.price_color,
            price_font_size: row.price_font_size,
            button_background_color: row.button_background_color,
            button_text_color: row.button_text_color,
            button_font_size: row.button_font_size,
            display_order: row.display_order,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }

    pub(super) fn defaults_for_shop(shop: &str) -> Self {
        Self {
            shop: shop.to_owned(),
            is_enabled: false,
            title: defaults::recommendation::TITLE.to_owned(),
            number_of_products: defaults::recommendation::NUMBER_OF_PRODUCTS,
            layout: defaults::recommendation::LAYOUT.to_owned(),
            show_price: true,
            show_add_to_cart: true,
            card_background_color: defaults::recommendation::CARD_BACKGROUND_COLOR.to_owned(),
            card_border_radius: defaults::recommendation::CARD_BORDER_RADIUS,
            title_color: defaults::recommendation::TITLE_COLOR.to_owned(),
            title_font_size: defaults::recommendation::TITLE_FONT_SIZE,
            price_color: defaults::recommendation::PRICE_COLOR.to_owned(),
            price_font_size: defaults::recommendation::PRICE_FONT_SIZE,
            button_background_color: defaults::recommendation::BUTTON_BACKGROUND_COLOR.to_owned(),
            button_text_color: defaults::recommendation::BUTTON_TEXT_COLOR.to_owned(),
            button_font_size: defaults::recommendation::BUTTON_FONT_SIZE,
            display_order: defaults::recommendation::DISPLAY_ORDER,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Full settings write. Missing fields take the admin form's defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct UpdateRecommendationSettingsRequest {
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

impl Default for UpdateRecommendationSettingsRequest {
    fn default() -> Self {
        Self {
            is_enabled: false,
            title: defaults::recommendation::TITLE.to_owned(),
            number_of_products: defaults::recommendation::NUMBER_OF_PRODUCTS,
            layout: defaults::recommendation::LAYOUT.to_owned(),
            show_price: true,
            show_add_to_cart: true,
            card_background_color: defaults::recommendation::CARD_BACKGROUND_COLOR.to_owned(),
            card_border_radius: defaults::recommendation::CARD_BORDER_RADIUS,
            title_color: defaults::recommendation::TITLE_COLOR.to_owned(),
            title_font_size: defaults::recommendation::TITLE_FONT_SIZE,
            price_color: defaults::recommendation::PRICE_COLOR.to_owned(),
            price_font_size: defaults::recommendation::PRICE_FONT_SIZE,
            button_background_color: defaults::recommendation::BUTTON_BACKGROUND_COLOR.to_owned(),
            button_text_color: defaults::recommendation::BUTTON_TEXT_COLOR.to_owned(),
            button_font_size: defaults::recommendation::BUTTON_FONT_SIZE,
            display_order: defaults::recommendation::DISPLAY_ORDER,
        }
    }
}

fn validate_settings(
    req_id: &str,
    body: &UpdateRecommendationSettingsRequest,
) -> Result<(), ApiError> {
    if RecommendationLayout::parse(&body.layout).is_none() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("layout must be 'grid' or 'list', got '{}'", body.layout),
        ));
    }
    if !(1..=12).contains(&body.number_of_products) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!(
                "number_of_products must be 1–12, got {}",
                body.number_of_products
            ),
        ));
    }
    validate_hex_color(req_id, "card_background_color", &body.card_background_color)?;
    validate_hex_color(req_id, "title_color", &body.title_color)?;
    validate_hex_color(req_id, "price_color", &body.price_color)?;
    validate_hex_color(
        req_id,
        "button_background_color",
        &body.button_background_color,
    )?;
    validate_hex_color(req_id, "button_text_color", &body.button_text_color)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/:shop/recommendations — settings, or defaults.
pub(super) async fn get_recommendation_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<RecommendationSettingsItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let data = wave_db::get_recommendation_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .map_or_else(
            || RecommendationSettingsItem::defaults_for_shop(&shop),
            RecommendationSettingsItem::from_row,
        );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/shops/:shop/recommendations — full settings upsert.
pub(super) async fn upsert_recommendation_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<UpdateRecommendationSettingsRequest>,
) -> Result<Json<ApiResponse<RecommendationSettingsItem>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_settings(rid, &body)?;

    let settings = wave_db::NewRecommendationSettings {
        is_enabled: body.is_enabled,
        title: body.title,
        number_of_products: body.number_of_products,
        layout: body.layout,
        show_price: body.show_price,
        show_add_to_cart: body.show_add_to_cart,
        card_background_color: body.card_background_color,
        card_border_radius: body.card_border_radius,
        title_color: body.title_color,
        title_font_size: body.title_font_size,
        price_color: body.price_color,
        price_font_size: body.price_font_size,
        button_background_color: body.button_background_color,
        button_text_color: body.button_text_color,
        button_font_size: body.button_font_size,
        display_order: body.display_order,
    };

    let row = wave_db::upsert_recommendation_settings(&state.pool, &shop, &settings)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: RecommendationSettingsItem::from_row(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_request_fills_in_defaults() {
        let body: UpdateRecommendationSettingsRequest =
            serde_json::from_value(serde_json::json!({ "is_enabled": true })).expect("deserialize");
        assert!(body.is_enabled);
        assert_eq!(body.title, "Recommended for you");
        assert_eq!(body.number_of_products, 4);
        assert_eq!(body.layout, "grid");
    }

    #[test]
    fn validation_rejects_unknown_layout() {
        let body: UpdateRecommendationSettingsRequest =
            serde_json::from_value(serde_json::json!({ "layout": "carousel" }))
                .expect("deserialize");
        assert!(validate_settings("req-1", &body).is_err());
    }

    #[test]
    fn validation_bounds_number_of_products() {
        let body: UpdateRecommendationSettingsRequest =
            serde_json::from_value(serde_json::json!({ "number_of_products": 0 }))
                .expect("deserialize");
        assert!(validate_settings("req-1", &body).is_err());

        let body: UpdateRecommendationSettingsRequest =
            serde_json::from_value(serde_json::json!({ "number_of_products": 13 }))
                .expect("deserialize");
        assert!(validate_settings("req-1", &body).is_err());
    }
}
