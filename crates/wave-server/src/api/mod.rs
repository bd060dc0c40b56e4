mod announcements;
mod discount;
mod drawer;
mod progress_bars;
mod recommendations;
mod storefront;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &wave_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Validate the `{shop}` path segment shared by all admin routes.
pub(super) fn validate_shop(request_id: &str, shop: &str) -> Result<(), ApiError> {
    if shop.trim().is_empty() || shop.len() > 255 {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            "shop must be 1–255 characters",
        ));
    }
    Ok(())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/shops/{shop}/drawer",
            get(drawer::get_drawer_settings).put(drawer::upsert_drawer_settings),
        )
        .route(
            "/api/v1/shops/{shop}/drawer/layout",
            put(drawer::update_layout),
        )
        .route(
            "/api/v1/shops/{shop}/announcements",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route(
            "/api/v1/shops/{shop}/announcements/{id}",
            axum::routing::patch(announcements::update_announcement)
                .delete(announcements::delete_announcement),
        )
        .route(
            "/api/v1/shops/{shop}/progress-bars",
            get(progress_bars::list_progress_bars).post(progress_bars::create_progress_bar),
        )
        .route(
            "/api/v1/shops/{shop}/progress-bars/{id}",
            axum::routing::patch(progress_bars::update_progress_bar)
                .delete(progress_bars::delete_progress_bar),
        )
        .route(
            "/api/v1/shops/{shop}/recommendations",
            get(recommendations::get_recommendation_settings)
                .put(recommendations::upsert_recommendation_settings),
        )
        .route(
            "/api/v1/shops/{shop}/shipping-discount",
            get(progress_bars::get_shipping_discount),
        )
        .route("/api/v1/discount/run", post(discount::run_discount))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/storefront/v1/drawer", get(storefront::get_drawer_payload))
        .route(
            "/storefront/v1/recommendations",
            get(storefront::get_recommendations),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match wave_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validate_shop_rejects_empty_and_oversized_values() {
        assert!(validate_shop("req-1", "demo.myshopify.com").is_ok());
        assert!(validate_shop("req-1", "").is_err());
        assert!(validate_shop("req-1", "   ").is_err());
        assert!(validate_shop("req-1", &"x".repeat(256)).is_err());
    }

    fn test_app(pool: sqlx::PgPool) -> Router {
        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        build_app(AppState { pool }, auth, default_rate_limit_state())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    // -------------------------------------------------------------------------
    // Drawer settings
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn drawer_settings_get_returns_defaults_for_unknown_shop(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/shops/demo.myshopify.com/drawer"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["shop"], "demo.myshopify.com");
        assert_eq!(json["data"]["is_enabled"], false);
        assert_eq!(json["data"]["position"], "right");
        assert_eq!(json["data"]["width"], 400);
        assert_eq!(
            json["data"]["component_order"],
            serde_json::json!(["cart", "announcements", "progress", "recommendations"])
        );
        assert!(json["data"]["created_at"].is_null());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn drawer_settings_put_then_get_roundtrips(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer",
                serde_json::json!({
                    "is_enabled": true,
                    "position": "left",
                    "width": 420
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api/v1/shops/demo.myshopify.com/drawer"))
            .await
            .expect("response");
        let json = body_json(response).await;
        assert_eq!(json["data"]["is_enabled"], true);
        assert_eq!(json["data"]["position"], "left");
        assert_eq!(json["data"]["width"], 420);
        // Unsupplied fields take their documented defaults.
        assert_eq!(json["data"]["background_color"], "#ffffff");
        assert!(json["data"]["created_at"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn drawer_settings_put_rejects_unknown_position(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer",
                serde_json::json!({ "position": "top" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn drawer_layout_update_preserves_other_settings(pool: sqlx::PgPool) {
        let app = test_app(pool);
        app.clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer",
                serde_json::json!({ "is_enabled": true, "width": 450 }),
            ))
            .await
            .expect("seed settings");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer/layout",
                serde_json::json!({
                    "component_order": ["progress", "cart", "announcements", "recommendations"]
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["component_order"][0], "progress");
        assert_eq!(json["data"]["width"], 450, "layout update must not reset width");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn drawer_layout_update_rejects_unknown_component(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer/layout",
                serde_json::json!({ "component_order": ["cart", "banner"] }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // -------------------------------------------------------------------------
    // Announcements
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn announcement_create_update_delete_roundtrip(pool: sqlx::PgPool) {
        let app = test_app(pool);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/announcements",
                serde_json::json!({ "title": "Summer sale", "message": "20% off", "is_enabled": true }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let id = json["data"]["id"].as_i64().expect("id");
        assert_eq!(json["data"]["title"], "Summer sale");
        assert_eq!(json["data"]["background_color"], "#f3f4f6");

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/v1/shops/demo.myshopify.com/announcements/{id}"),
                serde_json::json!({ "title": "Flash sale", "message": "30% off" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["title"], "Flash sale");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!(
                        "/api/v1/shops/demo.myshopify.com/announcements/{id}"
                    ))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api/v1/shops/demo.myshopify.com/announcements"))
            .await
            .expect("response");
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn announcement_update_returns_404_for_foreign_shop(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/announcements",
                serde_json::json!({ "title": "mine" }),
            ))
            .await
            .expect("response");
        let id = body_json(response).await["data"]["id"]
            .as_i64()
            .expect("id");

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/v1/shops/other.myshopify.com/announcements/{id}"),
                serde_json::json!({ "title": "hijacked" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // -------------------------------------------------------------------------
    // Progress bars and shipping discount sync
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn enabled_progress_bar_syncs_shipping_discount(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/progress-bars",
                serde_json::json!({
                    "is_enabled": true,
                    "title": "Almost there",
                    "goal_amount": "150",
                    "goal_text": "Free Shipping"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get_request(
                "/api/v1/shops/demo.myshopify.com/shipping-discount",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["goal_text"], "Free Shipping");
        assert_eq!(json["data"]["title"], "Wave Free Shipping - Free Shipping");
        assert_eq!(json["data"]["configuration"]["goalAmount"], "150");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn disabled_progress_bar_does_not_sync_discount(pool: sqlx::PgPool) {
        let app = test_app(pool);
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/progress-bars",
                serde_json::json!({ "is_enabled": false, "goal_amount": "150" }),
            ))
            .await
            .expect("response");

        let response = app
            .oneshot(get_request(
                "/api/v1/shops/demo.myshopify.com/shipping-discount",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn progress_bar_rejects_negative_goal(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/progress-bars",
                serde_json::json!({ "goal_amount": "-10" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // -------------------------------------------------------------------------
    // Recommendation settings
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn recommendation_settings_default_then_upsert(pool: sqlx::PgPool) {
        let app = test_app(pool);

        let response = app
            .clone()
            .oneshot(get_request(
                "/api/v1/shops/demo.myshopify.com/recommendations",
            ))
            .await
            .expect("response");
        let json = body_json(response).await;
        assert_eq!(json["data"]["title"], "Recommended for you");
        assert_eq!(json["data"]["number_of_products"], 4);
        assert_eq!(json["data"]["layout"], "grid");

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/recommendations",
                serde_json::json!({ "is_enabled": true, "layout": "list", "number_of_products": 6 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["layout"], "list");
        assert_eq!(json["data"]["number_of_products"], 6);
    }

    // -------------------------------------------------------------------------
    // Storefront
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn storefront_drawer_requires_shop_parameter(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/storefront/v1/drawer"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn storefront_drawer_reports_disabled_when_never_configured(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(get_request(
                "/storefront/v1/drawer?shop=demo.myshopify.com",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["enabled"], false);
        assert!(json["data"].get("settings").is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn storefront_drawer_aggregates_enabled_components(pool: sqlx::PgPool) {
        let app = test_app(pool);
        app.clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/shops/demo.myshopify.com/drawer",
                serde_json::json!({ "is_enabled": true }),
            ))
            .await
            .expect("seed settings");
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/announcements",
                serde_json::json!({ "title": "visible", "is_enabled": true }),
            ))
            .await
            .expect("seed announcement");
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/announcements",
                serde_json::json!({ "title": "hidden", "is_enabled": false }),
            ))
            .await
            .expect("seed announcement");
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/shops/demo.myshopify.com/progress-bars",
                serde_json::json!({ "is_enabled": true, "goal_amount": "100" }),
            ))
            .await
            .expect("seed progress bar");

        let response = app
            .oneshot(get_request(
                "/storefront/v1/drawer?shop=demo.myshopify.com",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["enabled"], true);
        assert_eq!(json["data"]["settings"]["shop"], "demo.myshopify.com");
        let announcements = json["data"]["announcements"].as_array().expect("array");
        assert_eq!(announcements.len(), 1, "disabled announcements excluded");
        assert_eq!(announcements[0]["title"], "visible");
        assert_eq!(
            json["data"]["progress_bars"].as_array().map(Vec::len),
            Some(1)
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn storefront_recommendations_require_both_parameters(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(get_request(
                "/storefront/v1/recommendations?shop=demo.myshopify.com",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get_request(
                "/storefront/v1/recommendations?shop=demo.myshopify.com&product_id=42",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(!json["data"].as_array().expect("array").is_empty());
    }

    // -------------------------------------------------------------------------
    // Discount run endpoint
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn discount_run_grants_free_shipping_to_qualifying_cart(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/discount/run",
                serde_json::json!({
                    "discountNode": {
                        "metafield": {
                            "value": "{\"goalAmount\": \"100\", \"goalText\": \"Free Shipping\"}"
                        }
                    },
                    "cart": {
                        "cost": { "subtotalAmount": { "amount": "150.00" } },
                        "deliveryGroups": [ { "id": "dg1" }, { "id": "dg2" } ]
                    }
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["data"],
            serde_json::json!({
                "discounts": [
                    {
                        "message": "Free Shipping",
                        "targets": [
                            { "deliveryGroup": { "id": "dg1" } },
                            { "deliveryGroup": { "id": "dg2" } }
                        ],
                        "value": { "percentage": { "value": "100" } }
                    }
                ]
            })
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn discount_run_returns_empty_result_for_unconfigured_goal(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/discount/run",
                serde_json::json!({
                    "cart": {
                        "cost": { "subtotalAmount": { "amount": "500" } },
                        "deliveryGroups": [ { "id": "dg1" } ]
                    }
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["discounts"].as_array().map(Vec::len), Some(0));
    }
}
