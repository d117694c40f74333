use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::types::{PredictRequest, PredictResponse, Predictor};
use super::PredictionError;
use crate::config::{HEALTH_TIMEOUT, PREDICT_TIMEOUT};
use crate::models::PredictionResult;

/// Bytes of a failed `/predict` body kept for the warning log.
const ERROR_BODY_LOG_LIMIT: usize = 512;

/// HTTP client for the remote ML inference service.
pub struct PredictionClient {
    base_url: String,
    client: reqwest::Client,
    predict_timeout: Duration,
    health_timeout: Duration,
}

impl PredictionClient {
    /// Create a client for the delegate at `base_url` with the default
    /// per-request timeouts (30s predict, 5s health).
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeouts(base_url, PREDICT_TIMEOUT, HEALTH_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: &str,
        predict_timeout: Duration,
        health_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            predict_timeout,
            health_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// First chunk of `response`, cut to `ERROR_BODY_LOG_LIMIT` bytes.
async fn body_excerpt(mut response: reqwest::Response) -> String {
    match response.chunk().await {
        Ok(Some(chunk)) => {
            let end = chunk.len().min(ERROR_BODY_LOG_LIMIT);
            String::from_utf8_lossy(&chunk[..end]).into_owned()
        }
        _ => String::new(),
    }
}

#[async_trait]
impl Predictor for PredictionClient {
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictionError> {
        let endpoint = self.endpoint("predict");
        let unavailable = |source: reqwest::Error| PredictionError::Unavailable {
            endpoint: endpoint.clone(),
            source,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&endpoint)
            .timeout(self.predict_timeout)
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if status != StatusCode::OK {
            let excerpt = body_excerpt(response).await;
            tracing::warn!(
                status = status.as_u16(),
                body = %excerpt,
                "ML service rejected prediction"
            );
            return Err(PredictionError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(unavailable)?;
        let elapsed = started.elapsed();

        let parsed: PredictResponse =
            serde_json::from_slice(&body).map_err(PredictionError::MalformedResponse)?;

        Ok(PredictionResult {
            label: parsed.result,
            confidence: parsed.confidence,
            model_version: parsed.model_version,
            processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    }

    async fn health_check(&self) -> Result<(), PredictionError> {
        let endpoint = self.endpoint("health");
        let response = self
            .client
            .get(&endpoint)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|source| PredictionError::Unavailable {
                endpoint: endpoint.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(PredictionError::Unhealthy {
                status: status.as_u16(),
            }),
        }
    }
}

/// What a `MockPredictor` answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    Label { label: String, confidence: f64 },
    /// Label is `"{prefix}{text}"`, so every input gets a distinct answer.
    Echo { prefix: String },
    Rejected { status: u16 },
}

/// Mock predictor for testing. Returns a configurable reply and counts calls.
pub struct MockPredictor {
    reply: MockReply,
    healthy: bool,
    predict_calls: AtomicUsize,
    health_calls: AtomicUsize,
}

impl MockPredictor {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            healthy: true,
            predict_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
        }
    }

    pub fn labelled(label: &str, confidence: f64) -> Self {
        Self::new(MockReply::Label {
            label: label.to_string(),
            confidence,
        })
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictionError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        let (label, confidence) = match &self.reply {
            MockReply::Label { label, confidence } => (label.clone(), *confidence),
            MockReply::Echo { prefix } => (format!("{prefix}{text}"), 0.5),
            MockReply::Rejected { status } => {
                return Err(PredictionError::Rejected { status: *status })
            }
        };
        Ok(PredictionResult {
            label,
            confidence,
            model_version: Some("mock".into()),
            processing_time_ms: 0,
        })
    }

    async fn health_check(&self) -> Result<(), PredictionError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            Ok(())
        } else {
            Err(PredictionError::Unhealthy { status: 503 })
        }
    }
}
