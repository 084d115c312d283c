use calorix_core::CatalogEntry;

/// Starter catalog: common foods with values per 100g
pub fn sample_foods() -> Vec<CatalogEntry> {
    let food = CatalogEntry::new;
    vec![
        // Fruits
        food("apple", "fruit", 52.0, 0.0, 14.0, 0.0),
        food("banana", "fruit", 89.0, 1.0, 23.0, 0.0),
        food("orange", "fruit", 47.0, 1.0, 12.0, 0.0),
        food("grapes", "fruit", 69.0, 1.0, 18.0, 0.0),
        // Vegetables
        food("broccoli", "vegetable", 34.0, 3.0, 7.0, 0.0),
        food("carrot", "vegetable", 41.0, 1.0, 10.0, 0.0),
        food("spinach", "vegetable", 23.0, 3.0, 4.0, 0.0),
        // Proteins
        food("chicken breast", "protein", 165.0, 31.0, 0.0, 4.0),
        food("salmon", "protein", 208.0, 20.0, 0.0, 13.0),
        food("eggs", "protein", 155.0, 13.0, 1.0, 11.0),
        food("tofu", "protein", 76.0, 8.0, 2.0, 5.0),
        // Grains
        food("white rice", "grain", 130.0, 3.0, 28.0, 0.0),
        food("brown rice", "grain", 112.0, 2.0, 23.0, 1.0),
        food("pasta", "grain", 131.0, 5.0, 25.0, 1.0),
        food("bread", "grain", 265.0, 9.0, 49.0, 3.0),
        // Dairy
        food("milk", "dairy", 42.0, 3.0, 5.0, 1.0),
        food("cheese", "dairy", 402.0, 25.0, 1.0, 33.0),
        food("yogurt", "dairy", 59.0, 10.0, 4.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_foods_are_valid() {
        let foods = sample_foods();
        assert_eq!(foods.len(), 18);
        for food in &foods {
            assert!(food.validate().is_ok(), "{} should be valid", food.food_name);
            assert_eq!(food.food_name, food.food_name.to_lowercase());
        }
    }
}
