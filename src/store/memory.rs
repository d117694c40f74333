use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{PredictionStore, StoreError};
use crate::models::Prediction;

/// Volatile prediction store backed by a `HashMap` under a single
/// reader/writer lock. Entries live for the life of the process.
pub struct InMemoryPredictionStore {
    predictions: RwLock<HashMap<String, Prediction>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self {
            predictions: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Prediction>>, StoreError> {
        self.predictions.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Prediction>>, StoreError> {
        self.predictions.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryPredictionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionStore for InMemoryPredictionStore {
    fn save(&self, prediction: Prediction) -> Result<(), StoreError> {
        if prediction.id.is_empty() {
            return Err(StoreError::InvalidPrediction(
                "prediction ID cannot be empty".into(),
            ));
        }

        let mut predictions = self.write()?;
        predictions.insert(prediction.id.clone(), prediction);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Prediction, StoreError> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<Prediction>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn len(&self) -> usize {
        self.predictions.read().map(|p| p.len()).unwrap_or(0)
    }

    fn clear(&self) {
        match self.predictions.write() {
            Ok(mut predictions) => predictions.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}
