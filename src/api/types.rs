//! Shared state for the HTTP layer.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ServiceConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::pipeline::analysis::{AnalysisOrchestrator, HealthAggregator};
use crate::pipeline::extraction::ContentExtractor;
use crate::pipeline::prediction::PredictionClient;
use crate::store::{InMemoryPredictionStore, PredictionStore};

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub store: Arc<dyn PredictionStore>,
    pub health: Arc<HealthAggregator>,
    /// Whole-request budget enforced by the router.
    pub request_timeout: Duration,
}

impl ApiContext {
    pub fn new(orchestrator: AnalysisOrchestrator, health: HealthAggregator) -> Self {
        Self {
            store: orchestrator.store().clone(),
            orchestrator: Arc::new(orchestrator),
            health: Arc::new(health),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Wire the production components: live extractor, HTTP prediction
    /// client and an empty in-memory store.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        let extractor = Arc::new(ContentExtractor::new(config.html_engine)?);
        let predictor = Arc::new(PredictionClient::new(&config.ml_service_url)?);
        let store = Arc::new(InMemoryPredictionStore::new());

        let orchestrator = AnalysisOrchestrator::new(extractor, predictor.clone(), store);
        let health = HealthAggregator::new(predictor);

        Ok(Self::new(orchestrator, health).with_request_timeout(config.request_timeout))
    }
}
