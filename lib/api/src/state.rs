use calorix_core::{Predictor, Result, TrainReport};
use calorix_storage::CatalogStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Shared handles given to every request handler
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub catalog: Arc<CatalogStore>,
    /// Held across a catalog mutation and the retrain that follows it
    admin: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>, catalog: Arc<CatalogStore>) -> Self {
        Self {
            predictor,
            catalog,
            admin: Arc::new(Mutex::new(())),
        }
    }

    /// Retrain from the current catalog
    pub fn retrain(&self) -> Result<TrainReport> {
        let _guard = self.admin.lock();
        self.train_locked()
    }

    /// Apply a catalog mutation, then retrain so predictions see it
    pub fn mutate<T>(
        &self,
        change: impl FnOnce(&CatalogStore) -> Result<T>,
    ) -> Result<(T, TrainReport)> {
        let _guard = self.admin.lock();
        let value = change(&self.catalog)?;
        let report = self.train_locked()?;
        Ok((value, report))
    }

    fn train_locked(&self) -> Result<TrainReport> {
        let report = self.predictor.train_from(self.catalog.as_ref())?;
        info!(
            trained = report.trained,
            samples = report.samples,
            "Predictor retrained from catalog"
        );
        Ok(report)
    }
}
