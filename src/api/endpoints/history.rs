use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Prediction;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub count: usize,
    pub history: Vec<Prediction>,
}

/// `GET /api/history`: every stored prediction, newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<HistoryResponse>, ApiError> {
    let mut history = ctx.store.list()?;
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(HistoryResponse {
        success: true,
        count: history.len(),
        history,
    }))
}
