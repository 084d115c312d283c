use crate::{Error, Result};
use serde::{Deserialize, Serialize};

fn default_serving_size() -> String {
    "100g".to_string()
}

/// One row of the food catalog. Nutrient values are per 100 units of food.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub food_name: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default = "default_serving_size")]
    pub serving_size: String,
}

impl CatalogEntry {
    /// Create an entry; the name is trimmed and lowercased
    #[must_use]
    pub fn new(
        food_name: &str,
        category: &str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
    ) -> Self {
        Self {
            food_name: normalize_name(food_name),
            category: category.to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber: 0.0,
            sugar: 0.0,
            serving_size: default_serving_size(),
        }
    }

    #[must_use]
    pub fn with_fiber_and_sugar(mut self, fiber: f64, sugar: f64) -> Self {
        self.fiber = fiber;
        self.sugar = sugar;
        self
    }

    /// Re-apply name normalization, e.g. after deserializing client input
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.food_name = normalize_name(&self.food_name);
        self
    }

    /// Reject empty names and negative or non-finite nutrient values
    pub fn validate(&self) -> Result<()> {
        if self.food_name.trim().is_empty() {
            return Err(Error::InvalidInput("foodName must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidInput("category must not be empty".to_string()));
        }

        let fields = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

/// Canonical form of a food name: trimmed and lowercased
#[inline]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read side of the catalog collaborator: hands over every current entry
pub trait CatalogSource {
    fn fetch_all(&self) -> Result<Vec<CatalogEntry>>;
}

impl CatalogSource for [CatalogEntry] {
    fn fetch_all(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.to_vec())
    }
}

impl CatalogSource for Vec<CatalogEntry> {
    fn fetch_all(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_normalized() {
        let entry = CatalogEntry::new("  Chicken Breast ", "protein", 165.0, 31.0, 0.0, 4.0);
        assert_eq!(entry.food_name, "chicken breast");
        assert_eq!(entry.serving_size, "100g");
        assert_eq!(entry.fiber, 0.0);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let entry = CatalogEntry::new("apple", "fruit", -1.0, 0.0, 14.0, 0.0);
        assert!(matches!(entry.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_nan_and_empty_name() {
        let entry = CatalogEntry::new("apple", "fruit", 52.0, f64::NAN, 14.0, 0.0);
        assert!(entry.validate().is_err());

        let entry = CatalogEntry::new("   ", "fruit", 52.0, 0.0, 14.0, 0.0);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"foodName":"Milk","category":"dairy","calories":42,"protein":3,"carbs":5,"fat":1}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        let entry = entry.normalized();
        assert_eq!(entry.food_name, "milk");
        assert_eq!(entry.sugar, 0.0);
        assert_eq!(entry.serving_size, "100g");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_slice_source() {
        let catalog = vec![CatalogEntry::new("apple", "fruit", 52.0, 0.0, 14.0, 0.0)];
        assert_eq!(catalog.fetch_all().unwrap(), catalog);
    }
}
