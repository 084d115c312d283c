use crate::catalog::CatalogEntry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// 2^63; rounded values at or beyond it do not fit an `i64`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn round_to_i64(value: f64) -> Option<i64> {
    let rounded = value.round();
    let in_range = rounded.is_finite() && rounded >= -I64_BOUND && rounded < I64_BOUND;
    in_range.then_some(rounded as i64)
}

/// Unrounded macro values
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrients {
    #[inline]
    #[must_use]
    pub const fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[inline]
    #[must_use]
    pub fn scale(self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// Round every field to the nearest integer on its own.
    ///
    /// `None` when any rounded value falls outside the `i64` range.
    #[inline]
    pub fn rounded(self) -> Option<[i64; 4]> {
        Some([
            round_to_i64(self.calories)?,
            round_to_i64(self.protein)?,
            round_to_i64(self.carbs)?,
            round_to_i64(self.fat)?,
        ])
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let values = [self.calories, self.protein, self.carbs, self.fat];
        if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!("invalid nutrient values: {:?}", self)))
        }
    }
}

impl From<&CatalogEntry> for Nutrients {
    fn from(entry: &CatalogEntry) -> Self {
        Self::new(entry.calories, entry.protein, entry.carbs, entry.fat)
    }
}

/// Which tier produced a prediction, with the tier's evidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    ExactMatch {
        #[serde(rename = "matchedFood")]
        matched_food: String,
    },
    MlPrediction {
        #[serde(rename = "similarFoods")]
        similar_foods: Vec<String>,
    },
    FallbackCategory {
        category: String,
    },
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::ExactMatch { .. } => "exact_match",
            Method::MlPrediction { .. } => "ml_prediction",
            Method::FallbackCategory { .. } => "fallback_category",
        }
    }
}

/// Estimate for a requested quantity of food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub confidence: f64,
    #[serde(flatten)]
    pub method: Method,
}

impl PredictionResult {
    pub(crate) fn new(scaled: Nutrients, confidence: f64, method: Method) -> Result<Self> {
        let [calories, protein, carbs, fat] = scaled.rounded().ok_or_else(|| {
            Error::InvalidInput(format!("estimate does not fit in an integer: {:?}", scaled))
        })?;
        Ok(Self {
            calories,
            protein,
            carbs,
            fat,
            confidence,
            method,
        })
    }

    pub fn is_exact_match(&self) -> bool {
        matches!(self.method, Method::ExactMatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_round() {
        let n = Nutrients::new(200.0, 25.0, 0.0, 10.0).scale(1.5);
        assert_eq!(n.rounded(), Some([300, 38, 0, 15]));
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(Nutrients::new(0.5, 1.5, 2.5, 0.49).rounded(), Some([1, 2, 3, 0]));
    }

    #[test]
    fn test_flat_json_shape() {
        let result = PredictionResult::new(
            Nutrients::new(104.0, 0.0, 28.0, 0.0),
            1.0,
            Method::ExactMatch { matched_food: "apple".to_string() },
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method"], "exact_match");
        assert_eq!(json["matchedFood"], "apple");
        assert_eq!(json["calories"], 104);
        assert_eq!(json["confidence"], 1.0);

        let fallback = PredictionResult::new(
            Nutrients::default(),
            0.3,
            Method::FallbackCategory { category: "other".to_string() },
        )
        .unwrap();
        let json = serde_json::to_value(&fallback).unwrap();
        assert_eq!(json["method"], "fallback_category");
        assert_eq!(json["category"], "other");
        assert!(json.get("matchedFood").is_none());

        let ml = PredictionResult::new(
            Nutrients::new(120.4, 8.0, 10.0, 3.0),
            0.62,
            Method::MlPrediction {
                similar_foods: vec!["salmon".to_string(), "eggs".to_string()],
            },
        )
        .unwrap();
        let json = serde_json::to_value(&ml).unwrap();
        assert_eq!(json["method"], "ml_prediction");
        assert_eq!(json["similarFoods"], serde_json::json!(["salmon", "eggs"]));
        assert!(json["similarFoods"].is_array());
        assert_eq!(json["calories"], 120);
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_rounding_out_of_range() {
        assert_eq!(Nutrients::new(1e300, 0.0, 0.0, 0.0).rounded(), None);
        assert_eq!(Nutrients::new(f64::NAN, 0.0, 0.0, 0.0).rounded(), None);
        let large = Nutrients::new(9.2e18, 0.0, 0.0, 0.0).rounded();
        assert_eq!(large.map(|r| r[0]), Some(9_200_000_000_000_000_000));

        let overflow = PredictionResult::new(
            Nutrients::new(1e300, 0.0, 0.0, 0.0),
            1.0,
            Method::FallbackCategory { category: "other".to_string() },
        );
        assert!(matches!(overflow, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_method_names() {
        let m = Method::MlPrediction { similar_foods: vec![] };
        assert_eq!(m.as_str(), "ml_prediction");
    }
}
