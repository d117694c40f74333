use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::HealthStatus;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub ml_service: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`: composite status. Always 200; the body says whether
/// the ML service is reachable.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let report = ctx.health.check().await;

    Json(HealthResponse {
        status: report.status,
        ml_service: if report.delegate_up { "up" } else { "down" },
        version: crate::config::APP_VERSION,
    })
}

/// `GET /health`: process liveness, independent of the ML service.
pub async fn liveness() -> &'static str {
    "OK"
}
