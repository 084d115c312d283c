//! Category fallback table
//!
//! Last-resort estimate when neither a catalog match nor a similarity signal
//! exists. Groups are tested in order; the first group with a keyword inside
//! the name wins, otherwise the default row applies.

use crate::features::KeywordGroup;
use crate::prediction::Nutrients;
use serde::{Deserialize, Serialize};

/// One row of the fallback table: a keyword group and its per-100-unit values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackRule {
    #[serde(flatten)]
    pub group: KeywordGroup,
    pub base: Nutrients,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackTable {
    pub rules: Vec<FallbackRule>,
    #[serde(default = "default_label")]
    pub default_label: String,
    #[serde(default = "default_base")]
    pub default_base: Nutrients,
}

fn default_label() -> String {
    "other".to_string()
}

fn default_base() -> Nutrients {
    Nutrients::new(150.0, 10.0, 20.0, 5.0)
}

impl Default for FallbackTable {
    fn default() -> Self {
        let rule = |label: &str, keywords: &[&str], base: Nutrients| FallbackRule {
            group: KeywordGroup::new(label, keywords),
            base,
        };

        Self {
            rules: vec![
                rule(
                    "protein",
                    &["chicken", "beef", "fish"],
                    Nutrients::new(200.0, 25.0, 0.0, 10.0),
                ),
                rule(
                    "grain",
                    &["rice", "pasta", "bread"],
                    Nutrients::new(130.0, 3.0, 28.0, 1.0),
                ),
                rule(
                    "fruit",
                    &["apple", "banana", "orange"],
                    Nutrients::new(60.0, 1.0, 15.0, 0.0),
                ),
                rule(
                    "vegetable",
                    &["broccoli", "carrot", "spinach"],
                    Nutrients::new(35.0, 2.0, 7.0, 0.0),
                ),
            ],
            default_label: default_label(),
            default_base: default_base(),
        }
    }
}

impl FallbackTable {
    /// Category label and base values for a name
    pub fn classify(&self, name: &str) -> (&str, Nutrients) {
        let name = name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.group.matches(&name))
            .map(|rule| (rule.group.label.as_str(), rule.base))
            .unwrap_or((self.default_label.as_str(), self.default_base))
    }

    pub fn validate(&self) -> crate::Result<()> {
        for rule in &self.rules {
            if rule.group.keywords.iter().any(|k| k.is_empty()) {
                return Err(crate::Error::InvalidConfig(format!(
                    "empty keyword in fallback group '{}'",
                    rule.group.label
                )));
            }
            rule.base.validate()?;
        }
        self.default_base.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_group_wins() {
        let table = FallbackTable::default();
        // both protein and grain keywords present; protein is checked first
        let (label, base) = table.classify("chicken fried rice");
        assert_eq!(label, "protein");
        assert_eq!(base.calories, 200.0);
    }

    #[test]
    fn test_each_group() {
        let table = FallbackTable::default();
        assert_eq!(table.classify("Brown Bread").0, "grain");
        assert_eq!(table.classify("banana split").0, "fruit");
        assert_eq!(table.classify("steamed broccoli").0, "vegetable");
        assert_eq!(table.classify("beef stew").0, "protein");
    }

    #[test]
    fn test_default_row() {
        let table = FallbackTable::default();
        let (label, base) = table.classify("xylophone");
        assert_eq!(label, "other");
        assert_eq!(base, Nutrients::new(150.0, 10.0, 20.0, 5.0));
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "rules": [
                {"label": "soup", "keywords": ["soup"], "base": {"calories": 40, "protein": 2, "carbs": 5, "fat": 1}}
            ]
        }"#;
        let table: FallbackTable = serde_json::from_str(json).unwrap();
        assert!(table.validate().is_ok());
        assert_eq!(table.classify("tomato soup").0, "soup");
        assert_eq!(table.classify("tomato").0, "other");
    }
}
