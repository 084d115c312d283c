pub mod seed;
pub mod store;

pub use seed::sample_foods;
pub use store::{CatalogStore, StoredFood};
