use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PredictionError;
use crate::models::PredictionResult;

/// Remote inference delegate abstraction (allows mocking).
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Classify `text`. Exactly one outbound attempt, no retries.
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictionError>;

    /// Liveness probe.
    async fn health_check(&self) -> Result<(), PredictionError>;
}

/// Request body for `POST {base}/predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

/// Response body from `POST {base}/predict`. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub result: String,
    pub confidence: f64,
    #[serde(default)]
    pub model_version: Option<String>,
}
