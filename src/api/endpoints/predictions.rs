use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Prediction;

#[derive(Deserialize)]
pub struct PredictionQuery {
    pub id: Option<String>,
}

/// `GET /api/predictions?id=ID`: one stored prediction.
pub async fn get(
    State(ctx): State<ApiContext>,
    Query(query): Query<PredictionQuery>,
) -> Result<Json<Prediction>, ApiError> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prediction ID is required".into()))?;

    Ok(Json(ctx.store.get(&id)?))
}
