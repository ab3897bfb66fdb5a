// clinic/src/storage_engine/inmemory_storage.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::storage_engine::{primary_key, IndexQuery, Item, StorageEngine};
use crate::errors::Result;

/// Process-local engine. Tables are created on first write.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<HashMap<String, BTreeMap<String, Item>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held in `table`.
    pub async fn len(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map(BTreeMap::len).unwrap_or(0)
    }
}

#[async_trait]
impl StorageEngine for InMemoryStorage {
    fn get_type(&self) -> &'static str {
        "InMemory"
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        let key = primary_key(&item)?.to_string();
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key, item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|rows| rows.get(key)).cloned())
    }

    async fn query_index(&self, table: &str, query: IndexQuery) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };
        let matches = rows.values().filter(|item| query.matches(item)).cloned();
        Ok(match query.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        })
    }

    async fn delete_item(&self, table: &str, key: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.remove(key);
        }
        Ok(())
    }
}
