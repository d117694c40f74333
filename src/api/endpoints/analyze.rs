use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{AnalysisRequest, Prediction};

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub prediction: Prediction,
}

/// `POST /api/analyze`: classify submitted text or the article at a URL.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected analyze body");
        ApiError::BadRequest("Invalid request body".into())
    })?;

    let prediction = ctx.orchestrator.analyze(&request).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        prediction,
    }))
}
