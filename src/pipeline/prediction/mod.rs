pub mod client;
pub mod types;

pub use client::*;
pub use types::*;

use thiserror::Error;

use crate::models::ErrorKind;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("ML service is unavailable at {endpoint}: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("ML service health check failed (status {status})")]
    Unhealthy { status: u16 },

    /// The delegate answered `/predict` with something other than 200. Its
    /// body is logged, never carried here.
    #[error("prediction failed (status {status})")]
    Rejected { status: u16 },

    #[error("prediction failed: malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        if self.is_unavailable() {
            ErrorKind::ServiceUnavailable
        } else {
            ErrorKind::PredictionFailed
        }
    }

    /// True when the delegate could not be reached or reported itself down,
    /// as opposed to answering a prediction request badly.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Unhealthy { .. })
    }
}
