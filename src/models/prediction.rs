use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::RequestKind;

/// Why an inbound analysis request was rejected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid request type '{0}': must be 'text' or 'url'")]
    UnknownKind(String),
    #[error("content cannot be empty")]
    EmptyContent,
}

/// Inbound analysis request, as received on the wire.
///
/// `kind` stays a raw string here so that an unrecognized type is a
/// validation failure rather than a body-decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl AnalysisRequest {
    pub fn new(kind: RequestKind, content: impl Into<String>) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            content: content.into(),
        }
    }

    /// Check the request shape. Returns the parsed kind on success.
    pub fn validate(&self) -> Result<RequestKind, RequestError> {
        let kind = self
            .kind
            .parse::<RequestKind>()
            .map_err(|_| RequestError::UnknownKind(self.kind.clone()))?;
        if self.content.trim().is_empty() {
            return Err(RequestError::EmptyContent);
        }
        Ok(kind)
    }
}

/// Normalized delegate output, before the orchestrator stamps identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: f64,
    pub model_version: Option<String>,
    /// Wall-clock duration of the delegate round trip.
    pub processing_time_ms: u64,
}

/// A completed, stored veracity prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub request_type: RequestKind,
    /// The submitted text or URL, never the extracted page body.
    pub original_content: String,
    #[serde(rename = "result")]
    pub label: String,
    pub confidence: f64,
    pub model_version: Option<String>,
    pub processing_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    /// Combine a delegate result with request metadata.
    pub fn from_result(
        id: String,
        kind: RequestKind,
        original_content: &str,
        result: PredictionResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            request_type: kind,
            original_content: original_content.to_string(),
            label: result.label,
            confidence: result.confidence,
            model_version: result.model_version,
            processing_time_ms: result.processing_time_ms,
            created_at,
        }
    }
}
