//! # Calorix
//!
//! Calorie and macro estimation for free-text food names, backed by a small
//! food catalog.
//!
//! A prediction goes through three tiers, first hit wins:
//!
//! 1. **Exact match** - a catalog food whose name contains the query (confidence 1.0)
//! 2. **ML prediction** - similarity-weighted average of the 5 nearest catalog
//!    foods in name-feature space (confidence at most 0.8)
//! 3. **Fallback category** - keyword-based category average (confidence 0.3)
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! calorix --catalog ./data/catalog.json --http-port 8080
//! curl -X POST localhost:8080/predict -H 'content-type: application/json' \
//!      -d '{"foodName": "apple", "quantity": 200}'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use calorix::prelude::*;
//!
//! let catalog = CatalogStore::seeded();
//! let predictor = Predictor::new(PredictorConfig::default());
//! predictor.train_from(&catalog).unwrap();
//!
//! let result = predictor.predict("apple", 200.0).unwrap();
//! assert_eq!(result.calories, 104);
//! ```
//!
//! ## Crate Structure
//!
//! - [`calorix-core`](https://docs.rs/calorix-core) - Catalog model, features, similarity, predictor
//! - [`calorix-storage`](https://docs.rs/calorix-storage) - Catalog store with sample data and JSON persistence
//! - [`calorix-api`](https://docs.rs/calorix-api) - REST API

// Re-export core types
pub use calorix_core::{
    CatalogEntry, CatalogSource,
    FeatureSchema, FeatureVector, KeywordGroup, extract_features, cosine_similarity,
    FallbackTable, FallbackRule,
    Predictor, PredictorConfig, PredictorStatus, TrainReport,
    PredictionResult, Method, Nutrients, DEFAULT_QUANTITY,
    Error, Result,
};

// Re-export storage
pub use calorix_storage::{CatalogStore, StoredFood, sample_foods};

// Re-export API
pub use calorix_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogEntry, CatalogSource,
        FeatureSchema, FallbackTable,
        Predictor, PredictorConfig, PredictionResult, Method,
        Error, Result,
        CatalogStore,
        AppState, RestApi,
    };
}
