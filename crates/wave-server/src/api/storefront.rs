//! Public storefront endpoints consumed by the drawer widget.
//!
//! - `GET /storefront/v1/drawer?shop=…`                      — aggregated payload
//! - `GET /storefront/v1/recommendations?shop=…&product_id=…` — placeholder products

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::announcements::AnnouncementItem;
use super::drawer::DrawerSettingsItem;
use super::progress_bars::ProgressBarItem;
use super::recommendations::RecommendationSettingsItem;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct DrawerQuery {
    pub shop: Option<String>,
}

/// Everything the storefront widget needs to render the drawer.
///
/// When the drawer is disabled (or was never configured) only `enabled` is
/// serialized, so the widget can bail out on a minimal payload.
#[derive(Debug, Serialize)]
pub(super) struct StorefrontDrawerData {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DrawerSettingsItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcements: Option<Vec<AnnouncementItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_bars: Option<Vec<ProgressBarItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_settings: Option<RecommendationSettingsItem>,
}

impl StorefrontDrawerData {
    fn disabled() -> Self {
        Self {
            enabled: false,
            settings: None,
            announcements: None,
            progress_bars: None,
            recommendation_settings: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationsQuery {
    pub shop: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecommendedProduct {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /storefront/v1/drawer — the aggregated per-shop drawer payload.
///
/// Only enabled announcements and progress bars are included; the whole
/// payload collapses to `{ enabled: false }` unless the merchant has enabled
/// the drawer itself.
pub(super) async fn get_drawer_payload(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DrawerQuery>,
) -> Result<Json<ApiResponse<StorefrontDrawerData>>, ApiError> {
    let rid = &req_id.0;
    let Some(shop) = query.shop.filter(|s| !s.trim().is_empty()) else {
        return Err(ApiError::new(rid, "bad_request", "shop parameter is required"));
    };

    let (settings, announcements, progress_bars, recommendation_settings) = tokio::try_join!(
        wave_db::get_drawer_settings(&state.pool, &shop),
        wave_db::list_enabled_announcements(&state.pool, &shop),
        wave_db::list_enabled_progress_bars(&state.pool, &shop),
        wave_db::get_recommendation_settings(&state.pool, &shop),
    )
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let data = match settings {
        Some(row) if row.is_enabled => StorefrontDrawerData {
            enabled: true,
            settings: Some(DrawerSettingsItem::from_row(row)),
            announcements: Some(
                announcements
                    .into_iter()
                    .map(AnnouncementItem::from_row)
                    .collect(),
            ),
            progress_bars: Some(
                progress_bars
                    .into_iter()
                    .map(ProgressBarItem::from_row)
                    .collect(),
            ),
            recommendation_settings: recommendation_settings
                .map(RecommendationSettingsItem::from_row),
        },
        _ => StorefrontDrawerData::disabled(),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /storefront/v1/recommendations — placeholder recommendation data.
///
/// There is no recommendation algorithm; the widget contract only needs a
/// stable product shape until one exists.
pub(super) async fn get_recommendations(
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<ApiResponse<Vec<RecommendedProduct>>>, ApiError> {
    let rid = &req_id.0;
    let shop = query.shop.filter(|s| !s.trim().is_empty());
    let product_id = query.product_id.filter(|s| !s.trim().is_empty());
    if shop.is_none() || product_id.is_none() {
        return Err(ApiError::new(
            rid,
            "bad_request",
            "shop and product_id parameters are required",
        ));
    }

    Ok(Json(ApiResponse {
        data: placeholder_recommendations(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn placeholder_recommendations() -> Vec<RecommendedProduct> {
    (1..=4)
        .map(|n| RecommendedProduct {
            id: n.to_string(),
            title: format!("Recommended Product {n}"),
            price: "$29.99".to_string(),
            image: "https://via.placeholder.com/200".to_string(),
            url: format!("/products/recommended-{n}"),
        })
        .collect()
}
