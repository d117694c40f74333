use std::sync::Arc;

use crate::models::HealthStatus;
use crate::pipeline::prediction::Predictor;

/// Composite liveness as seen from this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub delegate_up: bool,
}

/// Probes the prediction delegate on every call; nothing is cached.
pub struct HealthAggregator {
    predictor: Arc<dyn Predictor>,
}

impl HealthAggregator {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    pub async fn check(&self) -> HealthReport {
        match self.predictor.health_check().await {
            Ok(()) => HealthReport {
                status: HealthStatus::Healthy,
                delegate_up: true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "ML service health check failed");
                HealthReport {
                    status: HealthStatus::Degraded,
                    delegate_up: false,
                }
            }
        }
    }
}
