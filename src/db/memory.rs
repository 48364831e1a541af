use async_trait::async_trait;
use dashmap::DashMap;

use super::{Store, StoreResult};

/// Process-local store for development and tests. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.iter().map(|entry| entry.key().clone()).collect())
    }
}
