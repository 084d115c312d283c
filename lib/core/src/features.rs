//! Name feature extraction
//!
//! Turns a free-text food name into a fixed-length [`FeatureVector`]:
//!
//! 1. one binary feature per category keyword group, in table order
//! 2. one binary feature per preparation descriptor, in table order
//! 3. one continuous feature `min(chars / length_scale, 1)`
//!
//! Matching is a case-insensitive substring test, so `"strawberry"` hits both
//! the `berry` keyword and the `raw` descriptor. The tables are data: load a
//! custom [`FeatureSchema`] from JSON to change them, but keep the same schema
//! for training and querying or the vectors will not be comparable.

use crate::vector::FeatureVector;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A labelled set of keywords
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordGroup {
    pub label: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// True when any keyword occurs inside the (already lowercased) name
    #[inline]
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.keywords.iter().any(|k| lowercase_name.contains(k.as_str()))
    }
}

/// Ordered keyword tables that define the feature layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    pub categories: Vec<KeywordGroup>,
    pub descriptors: Vec<String>,
    #[serde(default = "default_length_scale")]
    pub length_scale: f64,
}

fn default_length_scale() -> f64 {
    20.0
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            categories: vec![
                KeywordGroup::new(
                    "fruit",
                    &["apple", "banana", "orange", "berry", "grape", "mango", "pineapple"],
                ),
                KeywordGroup::new(
                    "vegetable",
                    &["broccoli", "carrot", "spinach", "lettuce", "tomato", "cucumber"],
                ),
                KeywordGroup::new(
                    "protein",
                    &["chicken", "beef", "fish", "egg", "tofu", "pork", "turkey"],
                ),
                KeywordGroup::new("grain", &["rice", "pasta", "bread", "oats", "quinoa", "wheat"]),
                KeywordGroup::new("dairy", &["milk", "cheese", "yogurt", "butter", "cream"]),
                KeywordGroup::new("nut", &["almond", "walnut", "peanut", "cashew", "pecan"]),
            ],
            descriptors: ["fried", "grilled", "baked", "raw", "sweet", "spicy"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            length_scale: default_length_scale(),
        }
    }
}

impl FeatureSchema {
    /// Number of components every extracted vector has
    #[inline]
    pub fn dim(&self) -> usize {
        self.categories.len() + self.descriptors.len() + 1
    }

    /// Encode a food name. Pure and deterministic.
    pub fn extract(&self, name: &str) -> FeatureVector {
        let name = name.to_lowercase();
        let mut features = Vec::with_capacity(self.dim());

        for group in &self.categories {
            features.push(indicator(group.matches(&name)));
        }

        for descriptor in &self.descriptors {
            features.push(indicator(name.contains(descriptor.as_str())));
        }

        let length = name.chars().count() as f64;
        features.push((length / self.length_scale).min(1.0));

        FeatureVector::new(features)
    }

    /// Check the tables can produce meaningful vectors
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.length_scale.is_finite() && self.length_scale > 0.0) {
            return Err(crate::Error::InvalidConfig(format!(
                "length_scale must be positive, got {}",
                self.length_scale
            )));
        }
        let empty_keyword = self
            .categories
            .iter()
            .flat_map(|g| g.keywords.iter())
            .chain(self.descriptors.iter())
            .any(|k| k.is_empty());
        if empty_keyword {
            // "" is a substring of every name and would light up the feature for all foods
            return Err(crate::Error::InvalidConfig("empty keyword in feature schema".to_string()));
        }
        Ok(())
    }
}

#[inline]
fn indicator(hit: bool) -> f64 {
    if hit { 1.0 } else { 0.0 }
}

/// Encode a name with the default schema
pub fn extract_features(name: &str) -> FeatureVector {
    static DEFAULT_SCHEMA: OnceLock<FeatureSchema> = OnceLock::new();
    DEFAULT_SCHEMA.get_or_init(FeatureSchema::default).extract(name)
}
