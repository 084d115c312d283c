//! Catalog-backed calorie estimator
//!
//! A [`Predictor`] answers `predict(name, quantity)` with three tiers tried in
//! strict order:
//!
//! 1. **exact match**: the first catalog entry (catalog order) whose name
//!    contains the query as a substring, confidence 1.0
//! 2. **ml prediction**: similarity-weighted average over the `k` nearest
//!    training samples, only when trained, confidence capped at 0.8
//! 3. **fallback category**: keyword table lookup, confidence 0.3
//!
//! All state lives in one immutable [`Snapshot`]. `train` builds a new one off
//! to the side and swaps the pointer, so a concurrent `predict` sees either
//! the old catalog or the new one in full.

use crate::catalog::{normalize_name, CatalogEntry, CatalogSource};
use crate::fallback::FallbackTable;
use crate::features::FeatureSchema;
use crate::prediction::{Method, Nutrients, PredictionResult};
use crate::vector::FeatureVector;
use crate::{Error, Result};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Quantity used when the caller does not give one
pub const DEFAULT_QUANTITY: f64 = 100.0;

/// Catalogs at least this large extract features on the rayon pool
const PARALLEL_EXTRACT_THRESHOLD: usize = 1024;

/// Tunables for a [`Predictor`]
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Below this many catalog entries the similarity tier is disabled
    pub min_samples: usize,
    /// Neighbors averaged by the similarity tier
    pub k: usize,
    pub ml_confidence_cap: f64,
    pub fallback_confidence: f64,
    /// Quantity the catalog values are expressed for
    pub reference_quantity: f64,
    pub features: FeatureSchema,
    pub fallback: FallbackTable,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            k: 5,
            ml_confidence_cap: 0.8,
            fallback_confidence: 0.3,
            reference_quantity: 100.0,
            features: FeatureSchema::default(),
            fallback: FallbackTable::default(),
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".to_string()));
        }
        if !(self.reference_quantity.is_finite() && self.reference_quantity > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "reference_quantity must be positive, got {}",
                self.reference_quantity
            )));
        }
        for (name, value) in [
            ("ml_confidence_cap", self.ml_confidence_cap),
            ("fallback_confidence", self.fallback_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        self.features.validate()?;
        self.fallback.validate()
    }
}

/// A catalog entry paired with the feature vector of its name
#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub entry: CatalogEntry,
    pub features: FeatureVector,
}

/// Everything a prediction reads. Never mutated once published.
#[derive(Debug, Default)]
pub struct Snapshot {
    catalog: Vec<CatalogEntry>,
    /// Lowercased names, aligned with `catalog`
    names: Vec<String>,
    /// `None` while untrained
    samples: Option<Vec<TrainingSample>>,
}

impl Snapshot {
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn samples(&self) -> &[TrainingSample] {
        self.samples.as_deref().unwrap_or(&[])
    }

    pub fn is_trained(&self) -> bool {
        self.samples.is_some()
    }
}

/// Outcome of a `train` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainReport {
    pub trained: bool,
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorStatus {
    pub trained: bool,
    pub samples: usize,
    pub catalog_size: usize,
}

pub struct Predictor {
    config: PredictorConfig,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}

impl Predictor {
    /// Create an untrained predictor with an empty catalog
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Current published state
    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot().is_trained()
    }

    pub fn status(&self) -> PredictorStatus {
        let snapshot = self.snapshot();
        PredictorStatus {
            trained: snapshot.is_trained(),
            samples: snapshot.samples().len(),
            catalog_size: snapshot.catalog.len(),
        }
    }

    /// Rebuild from the full catalog. Safe to call any number of times.
    pub fn train(&self, catalog: &[CatalogEntry]) -> TrainReport {
        let names: Vec<String> = catalog.iter().map(|e| e.food_name.to_lowercase()).collect();

        let samples = if catalog.len() < self.config.min_samples {
            warn!(
                "Not enough data to train model ({} < {}), using fallback prediction",
                catalog.len(),
                self.config.min_samples
            );
            None
        } else {
            let schema = &self.config.features;
            let to_sample = |entry: &CatalogEntry| TrainingSample {
                features: schema.extract(&entry.food_name),
                entry: entry.clone(),
            };
            let samples: Vec<TrainingSample> = if catalog.len() >= PARALLEL_EXTRACT_THRESHOLD {
                catalog.par_iter().map(to_sample).collect()
            } else {
                catalog.iter().map(to_sample).collect()
            };
            info!("Model trained with {} samples", samples.len());
            Some(samples)
        };

        let report = TrainReport {
            trained: samples.is_some(),
            samples: samples.as_ref().map_or(0, Vec::len),
        };

        let next = Arc::new(Snapshot {
            catalog: catalog.to_vec(),
            names,
            samples,
        });
        *self.snapshot.write() = next;

        report
    }

    /// Fetch the catalog from its source, then train
    pub fn train_from(&self, source: &dyn CatalogSource) -> Result<TrainReport> {
        let catalog = source.fetch_all()?;
        Ok(self.train(&catalog))
    }

    /// Estimate nutrients for `quantity` units of `food_name`.
    ///
    /// Fails only with [`Error::InvalidInput`]: for an empty name, a negative,
    /// NaN or infinite quantity, or a quantity so large the rounded estimate
    /// does not fit in an `i64`. Every other input gets an estimate.
    pub fn predict(&self, food_name: &str, quantity: f64) -> Result<PredictionResult> {
        let name = normalize_name(food_name);
        if name.is_empty() {
            return Err(Error::InvalidInput("food name must not be empty".to_string()));
        }
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(Error::InvalidInput(format!(
                "quantity must be a non-negative number, got {}",
                quantity
            )));
        }

        let snapshot = self.snapshot();
        let estimate = self
            .exact_match(&snapshot, &name)
            .or_else(|| self.nearest_neighbors(&snapshot, &name))
            .unwrap_or_else(|| self.fallback(&name));

        let multiplier = quantity / self.config.reference_quantity;
        let result = PredictionResult::new(
            estimate.per_reference.scale(multiplier),
            estimate.confidence,
            estimate.method,
        )?;

        debug!(
            food = %name,
            quantity,
            method = result.method.as_str(),
            confidence = result.confidence,
            "prediction"
        );
        Ok(result)
    }

    fn exact_match(&self, snapshot: &Snapshot, name: &str) -> Option<Estimate> {
        let index = snapshot.names.iter().position(|n| n.contains(name))?;
        let entry = &snapshot.catalog[index];

        Some(Estimate {
            per_reference: Nutrients::from(entry),
            confidence: 1.0,
            method: Method::ExactMatch {
                matched_food: entry.food_name.clone(),
            },
        })
    }

    fn nearest_neighbors(&self, snapshot: &Snapshot, name: &str) -> Option<Estimate> {
        let samples = snapshot.samples.as_deref().filter(|s| !s.is_empty())?;
        let query = self.config.features.extract(name);
        let k = self.config.k.min(samples.len());

        let mut scored: Vec<(usize, f64)> = samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (i, query.cosine_similarity(&sample.features)))
            .collect();
        // stable: equal scores keep catalog order
        scored.sort_by_key(|&(_, similarity)| Reverse(OrderedFloat(similarity)));
        let neighbors: SmallVec<[(usize, f64); 5]> = scored.into_iter().take(k).collect();

        let mut total = Nutrients::default();
        let mut total_similarity = 0.0;
        for &(index, weight) in &neighbors {
            let entry = &samples[index].entry;
            total.calories += entry.calories * weight;
            total.protein += entry.protein * weight;
            total.carbs += entry.carbs * weight;
            total.fat += entry.fat * weight;
            total_similarity += weight;
        }

        // no neighbor shares a single feature with the query
        if total_similarity <= 0.0 {
            return None;
        }

        let average = Nutrients::new(
            total.calories / total_similarity,
            total.protein / total_similarity,
            total.carbs / total_similarity,
            total.fat / total_similarity,
        );

        let confidence = (total_similarity / k as f64).min(self.config.ml_confidence_cap);
        let similar_foods = neighbors
            .iter()
            .map(|&(index, _)| samples[index].entry.food_name.clone())
            .collect();

        Some(Estimate {
            per_reference: average,
            confidence,
            method: Method::MlPrediction { similar_foods },
        })
    }

    fn fallback(&self, name: &str) -> Estimate {
        let (category, base) = self.config.fallback.classify(name);
        Estimate {
            per_reference: base,
            confidence: self.config.fallback_confidence,
            method: Method::FallbackCategory {
                category: category.to_string(),
            },
        }
    }
}

/// A tier's answer before it is scaled to the requested quantity
struct Estimate {
    per_reference: Nutrients,
    confidence: f64,
    method: Method,
}
