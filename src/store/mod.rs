//! Prediction persistence.
//!
//! `PredictionStore` is the contract the orchestrator writes through and the
//! API reads from. Only an in-process volatile store ships; a durable
//! backend plugs in behind the same trait.

pub mod memory;

pub use memory::InMemoryPredictionStore;

use thiserror::Error;

use crate::models::{ErrorKind, Prediction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid prediction: {0}")]
    InvalidPrediction(String),

    #[error("prediction not found with id: {0}")]
    NotFound(String),

    #[error("prediction store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPrediction(_) => ErrorKind::InvalidPrediction,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Keyed container of completed predictions.
///
/// Implementations must be safe for unbounded concurrent callers, and a
/// reader must never observe a partially written `Prediction`.
pub trait PredictionStore: Send + Sync {
    /// Upsert by `id`. An existing entry with the same id is replaced
    /// (last write wins). An empty id is rejected.
    fn save(&self, prediction: Prediction) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Prediction, StoreError>;

    /// Snapshot of every stored prediction, in no particular order.
    fn list(&self) -> Result<Vec<Prediction>, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry (test isolation).
    fn clear(&self);
}
