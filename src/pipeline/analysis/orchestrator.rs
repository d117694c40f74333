use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::AnalysisError;
use crate::models::{AnalysisRequest, Prediction, PredictionResult, RequestKind};
use crate::pipeline::extraction::ContentSource;
use crate::pipeline::prediction::Predictor;
use crate::store::PredictionStore;

/// Drives one analysis request end to end.
pub struct AnalysisOrchestrator {
    extractor: Arc<dyn ContentSource>,
    predictor: Arc<dyn Predictor>,
    store: Arc<dyn PredictionStore>,
}

impl AnalysisOrchestrator {
    pub fn new(
        extractor: Arc<dyn ContentSource>,
        predictor: Arc<dyn Predictor>,
        store: Arc<dyn PredictionStore>,
    ) -> Self {
        Self {
            extractor,
            predictor,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn PredictionStore> {
        &self.store
    }

    /// Analyze `request` and return the stamped prediction.
    ///
    /// Persistence is best-effort: once the delegate has answered, a failed
    /// store write is logged and the prediction is still returned unchanged.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Prediction, AnalysisError> {
        self.analyze_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`analyze`](Self::analyze), but aborts the in-flight network call
    /// when `cancel` fires. A cancelled run writes nothing to the store.
    pub async fn analyze_with_cancel(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<Prediction, AnalysisError> {
        let kind = request.validate()?;
        let span = tracing::info_span!("analyze", kind = %kind);

        self.run(kind, request, cancel).instrument(span).await
    }

    async fn run(
        &self,
        kind: RequestKind,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<Prediction, AnalysisError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Analysis cancelled by caller");
                return Err(AnalysisError::Cancelled);
            }
            result = self.infer(kind, &request.content) => result?,
        };

        let prediction = Prediction::from_result(
            Uuid::new_v4().to_string(),
            kind,
            &request.content,
            result,
            Utc::now(),
        );

        if let Err(e) = self.store.save(prediction.clone()) {
            tracing::warn!(id = %prediction.id, error = %e, "Failed to save prediction");
        }

        tracing::info!(
            id = %prediction.id,
            label = %prediction.label,
            confidence = prediction.confidence,
            processing_time_ms = prediction.processing_time_ms,
            "Analysis complete"
        );

        Ok(prediction)
    }

    async fn infer(
        &self,
        kind: RequestKind,
        content: &str,
    ) -> Result<PredictionResult, AnalysisError> {
        let extracted;
        let text = match kind {
            RequestKind::Text => content,
            RequestKind::Url => {
                tracing::debug!(url = content, "Extracting page content");
                extracted = self.extractor.extract(content).await?;
                extracted.as_str()
            }
        };

        tracing::debug!(chars = text.len(), "Requesting prediction");
        Ok(self.predictor.predict(text).await?)
    }
}
