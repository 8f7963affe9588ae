//! Health endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::routes::ApiState;

/// Health report for the control plane.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Provider names registered in the driver gateway
    pub providers: Vec<String>,
}

/// Report control-plane health, probing the resource store
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Control plane healthy", body = HealthResponse),
        (status = 503, description = "Resource store unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let providers = state.service.registered_providers();

    match state.service.ping_store().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                version: crate::VERSION.to_string(),
                providers,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Health probe failed against the resource store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "storage unavailable".to_string(),
                    version: crate::VERSION.to_string(),
                    providers,
                }),
            )
        }
    }
}
