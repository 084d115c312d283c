//! # Calorix Core
//!
//! Core library for the Calorix calorie estimator.
//!
//! This crate provides the data model and the estimation engine:
//!
//! - [`CatalogEntry`] - A known food with per-100-unit macro values
//! - [`FeatureSchema`] - Keyword tables that turn a food name into a [`FeatureVector`]
//! - [`FallbackTable`] - Category averages used when nothing better is known
//! - [`Predictor`] - Three-tier estimator: exact match, kNN, category fallback
//! - [`CatalogSource`] - Where the predictor gets its catalog from
//!
//! ## Example
//!
//! ```rust
//! use calorix_core::{CatalogEntry, Predictor, PredictorConfig};
//!
//! let predictor = Predictor::new(PredictorConfig::default());
//! let catalog = vec![
//!     CatalogEntry::new("apple", "fruit", 52.0, 0.0, 14.0, 0.0),
//!     CatalogEntry::new("banana", "fruit", 89.0, 1.0, 23.0, 0.0),
//! ];
//! predictor.train(&catalog);
//!
//! let result = predictor.predict("apple", 200.0).unwrap();
//! assert_eq!(result.calories, 104);
//! assert_eq!(result.method.as_str(), "exact_match");
//! ```

pub mod catalog;
pub mod error;
pub mod fallback;
pub mod features;
pub mod prediction;
pub mod predictor;
pub mod similarity;
pub mod vector;

pub use catalog::{normalize_name, CatalogEntry, CatalogSource};
pub use error::{Error, Result};
pub use fallback::{FallbackRule, FallbackTable};
pub use features::{extract_features, FeatureSchema, KeywordGroup};
pub use prediction::{Method, Nutrients, PredictionResult};
pub use predictor::{
    Predictor, PredictorConfig, PredictorStatus, Snapshot, TrainReport, TrainingSample,
    DEFAULT_QUANTITY,
};
pub use similarity::cosine_similarity;
pub use vector::FeatureVector;
