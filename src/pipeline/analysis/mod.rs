//! Analysis pipeline: validate → extract (URL only) → predict → stamp → store.
//!
//! Uses trait-based DI (`ContentSource`, `Predictor`, `PredictionStore`) so the
//! orchestrator stays testable with mocks and fake servers.

pub mod health;
pub mod orchestrator;

pub use health::{HealthAggregator, HealthReport};
pub use orchestrator::AnalysisOrchestrator;

use thiserror::Error;

use crate::models::{ErrorKind, RequestError};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::prediction::PredictionError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Extraction(e) => e.kind(),
            Self::Prediction(e) => e.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}
