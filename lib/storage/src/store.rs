use crate::seed::sample_foods;
use atomicwrites::{AllowOverwrite, AtomicFile};
use calorix_core::{CatalogEntry, CatalogSource, Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// A catalog entry as kept by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFood {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: CatalogEntry,
}

impl StoredFood {
    fn new(entry: CatalogEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            entry,
        }
    }
}

/// Food catalog held in memory, optionally mirrored to a JSON file.
///
/// Insertion order is preserved and is the order the predictor sees, which
/// makes it the tie-break for substring matches.
pub struct CatalogStore {
    foods: RwLock<Vec<StoredFood>>,
    path: Option<PathBuf>,
}

impl CatalogStore {
    /// Empty store with no file behind it
    pub fn in_memory() -> Self {
        Self {
            foods: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// In-memory store holding the sample dataset
    pub fn seeded() -> Self {
        Self {
            foods: RwLock::new(sample_foods().into_iter().map(StoredFood::new).collect()),
            path: None,
        }
    }

    /// Load the catalog file, or create it from the sample dataset when missing
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            let data = std::fs::read(&path)?;
            let foods: Vec<StoredFood> = serde_json::from_slice(&data)?;
            let mut loaded = Vec::with_capacity(foods.len());
            for mut food in foods {
                food.entry = food.entry.normalized();
                if let Err(e) = food.entry.validate() {
                    warn!("Skipping invalid catalog entry {}: {}", food.id, e);
                    continue;
                }
                loaded.push(food);
            }
            info!("Loaded {} foods from {:?}", loaded.len(), path);

            return Ok(Self {
                foods: RwLock::new(loaded),
                path: Some(path),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            foods: RwLock::new(sample_foods().into_iter().map(StoredFood::new).collect()),
            path: Some(path),
        };
        store.save()?;
        info!("Created catalog {:?} with {} sample foods", store.path, store.len());
        Ok(store)
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.foods.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.foods.read().is_empty()
    }

    pub fn list(&self) -> Vec<StoredFood> {
        self.foods.read().clone()
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredFood> {
        self.foods.read().iter().find(|f| f.id == *id).cloned()
    }

    /// Validate and append an entry
    pub fn insert(&self, entry: CatalogEntry) -> Result<StoredFood> {
        let entry = entry.normalized();
        entry.validate()?;

        let stored = StoredFood::new(entry);
        let mut foods = self.foods.write();
        let mut next = foods.clone();
        next.push(stored.clone());
        self.persist(&next)?;
        *foods = next;

        info!("Added food '{}' ({})", stored.entry.food_name, stored.id);
        Ok(stored)
    }

    /// Remove by id; `false` when no such food exists
    pub fn remove(&self, id: &Uuid) -> Result<bool> {
        let mut foods = self.foods.write();
        let Some(index) = foods.iter().position(|f| f.id == *id) else {
            return Ok(false);
        };

        let mut next = foods.clone();
        let removed = next.remove(index);
        self.persist(&next)?;
        *foods = next;

        info!("Removed food '{}' ({})", removed.entry.food_name, removed.id);
        Ok(true)
    }

    /// Clear the catalog and insert `entries`. Nothing changes if any entry is invalid.
    pub fn replace_all(&self, entries: Vec<CatalogEntry>) -> Result<usize> {
        let mut next = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.normalized();
            entry.validate()?;
            next.push(StoredFood::new(entry));
        }

        let mut foods = self.foods.write();
        self.persist(&next)?;
        *foods = next;

        info!("Catalog replaced with {} foods", foods.len());
        Ok(foods.len())
    }

    /// Write the current catalog to its file, if any
    pub fn save(&self) -> Result<()> {
        let foods = self.foods.read();
        self.persist(&foods)
    }

    fn persist(&self, foods: &[StoredFood]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let data = serde_json::to_vec_pretty(foods)?;
        AtomicFile::new(path, AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| Error::Storage(format!("failed to write {:?}: {}", path, e)))?;
        Ok(())
    }
}

impl CatalogSource for CatalogStore {
    fn fetch_all(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.foods.read().iter().map(|f| f.entry.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn kiwi() -> CatalogEntry {
        CatalogEntry::new("Kiwi", "fruit", 61.0, 1.0, 15.0, 1.0)
    }

    #[test]
    fn test_seeded_store() {
        let store = CatalogStore::seeded();
        assert_eq!(store.len(), 18);
        assert!(store.path().is_none());

        let entries = store.fetch_all().unwrap();
        assert_eq!(entries[0].food_name, "apple");
        assert_eq!(entries[17].food_name, "yogurt");
    }

    #[test]
    fn test_insert_and_remove() {
        let store = CatalogStore::in_memory();
        assert!(store.is_empty());

        let stored = store.insert(kiwi()).unwrap();
        assert_eq!(stored.entry.food_name, "kiwi");
        assert_eq!(store.get(&stored.id), Some(stored.clone()));

        assert!(store.remove(&stored.id).unwrap());
        assert!(!store.remove(&stored.id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_rejects_invalid() {
        let store = CatalogStore::in_memory();
        let bad = CatalogEntry::new("kiwi", "fruit", -5.0, 1.0, 15.0, 1.0);
        assert!(matches!(store.insert(bad), Err(Error::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let store = CatalogStore::seeded();
        let entries = vec![kiwi(), CatalogEntry::new("", "fruit", 1.0, 1.0, 1.0, 1.0)];
        assert!(store.replace_all(entries).is_err());
        assert_eq!(store.len(), 18);

        assert_eq!(store.replace_all(vec![kiwi()]).unwrap(), 1);
        assert_eq!(store.fetch_all().unwrap()[0].food_name, "kiwi");
    }

    #[test]
    fn test_open_creates_seeded_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("catalog.json");

        let store = CatalogStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.len(), 18);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let kiwi_id = {
            let store = CatalogStore::open(&path).unwrap();
            let apple_id = store.list()[0].id;
            assert!(store.remove(&apple_id).unwrap());
            store.insert(kiwi()).unwrap().id
        };

        let reopened = CatalogStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 18);
        let names: Vec<String> = reopened
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|e| e.food_name)
            .collect();
        assert!(!names.contains(&"apple".to_string()));
        assert_eq!(names.last().map(String::as_str), Some("kiwi"));
        assert!(reopened.get(&kiwi_id).is_some());
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let store = CatalogStore::open(&path).unwrap();
        store.replace_all(vec![kiwi()]).unwrap();

        let data = std::fs::read(&path).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&data).unwrap();
        let first = &json[0];
        assert_eq!(first["foodName"], "kiwi");
        assert_eq!(first["servingSize"], "100g");
        assert!(first["id"].is_string());
        assert!(first["createdAt"].is_string());
    }
}
