//! In-memory thing store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use url::Url;

use crate::config::DatabaseConfig;
use crate::store::{StoreError, Thing, ThingStore};

/// URL scheme served by this backend.
pub const MEMORY_SCHEME: &str = "memory";

/// Store keyed by thing name.
#[derive(Debug, Clone, Default)]
pub struct MemoryThingStore {
    things: Arc<DashMap<String, Thing>>,
}

impl MemoryThingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the store described by `config`, inserting its seed names.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = Url::parse(&config.url)?;
        if url.scheme() != MEMORY_SCHEME {
            return Err(StoreError::UnsupportedScheme(url.scheme().to_string()));
        }

        let store = Self::new();
        for name in &config.seed_names {
            store.insert(Thing::new(name.clone())).await?;
        }

        tracing::info!(
            url = %config.url,
            seeded = store.len(),
            "Data store connected"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}

#[async_trait]
impl ThingStore for MemoryThingStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Thing>, StoreError> {
        Ok(self.things.get(name).map(|t| t.value().clone()))
    }

    async fn insert(&self, thing: Thing) -> Result<(), StoreError> {
        match self.things.entry(thing.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(thing.name)),
            Entry::Vacant(slot) => {
                slot.insert(thing);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, seed: &[&str]) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            seed_names: seed.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_connect_seeds_names() {
        let store = MemoryThingStore::connect(&config("memory://things", &["lamp", "desk"]))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_name("lamp").await.unwrap().unwrap().name, "lamp");
        assert!(store.find_by_name("chair").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_rejects_other_schemes() {
        let err = MemoryThingStore::connect(&config("postgres://localhost/things", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedScheme(s) if s == "postgres"));

        let err = MemoryThingStore::connect(&config("not a url", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_duplicate_seeds() {
        let err = MemoryThingStore::connect(&config("memory://things", &["lamp", "lamp"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(name) if name == "lamp"));
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_name() {
        let store = MemoryThingStore::new();
        store.insert(Thing::new("lamp")).await.unwrap();

        let err = store.insert(Thing::new("lamp")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len(), 1);
    }
}
