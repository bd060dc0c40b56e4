//! The checkout pipeline's discount function endpoint.
//!
//! - `POST /api/v1/discount/run` — input envelope in, decision out

use axum::{Extension, Json};

use wave_core::discount::{self, RunInput, RunResult};

use crate::middleware::RequestId;

use super::{ApiResponse, ResponseMeta};

/// POST /api/v1/discount/run — evaluate a cart against its goal configuration.
///
/// Evaluation is total: a body that does not match the envelope shape is
/// normalized to the empty envelope, which yields the empty decision. The
/// endpoint always answers 200 with a well-formed decision so a malformed
/// request can never abort the caller's discount calculation.
pub(super) async fn run_discount(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<RunResult>> {
    let input: RunInput = serde_json::from_value(body).unwrap_or_default();
    let result = discount::run(&input);

    if result.discounts.is_empty() {
        tracing::debug!(request_id = %req_id.0, "cart does not qualify for free shipping");
    } else {
        tracing::debug!(
            request_id = %req_id.0,
            targets = result.discounts[0].targets.len(),
            "granting free shipping discount"
        );
    }

    Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    })
}
