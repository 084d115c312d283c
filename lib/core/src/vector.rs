use serde::{Deserialize, Serialize};

/// Fixed-length encoding of a food name, every component in `[0, 1]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    data: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Cosine similarity with another vector, 0 when dimensions differ
    #[inline]
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f64 {
        crate::similarity::cosine_similarity(&self.data, &other.data)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        crate::similarity::norm(&self.data)
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}
