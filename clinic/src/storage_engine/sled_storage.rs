// clinic/src/storage_engine/sled_storage.rs

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sled::{Db, Tree};
use tracing::{debug, info};

use super::storage_engine::{primary_key, IndexQuery, Item, StorageEngine};
use crate::errors::{Result, StorageError};

/// Sled-backed engine for local runs. One tree per table, values are JSON.
/// Secondary lookups scan the table tree.
#[derive(Debug, Clone)]
pub struct SledStorage {
    db: Arc<Db>,
}

impl SledStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path).map_err(|e| {
            StorageError::DatabaseError(format!("Failed to open Sled database at {}: {}", path.display(), e))
        })?;
        info!("Opened Sled database at {}", path.display());
        Ok(Self::new_with_db(db))
    }

    pub fn new_with_db(db: Db) -> Self {
        SledStorage { db: Arc::new(db) }
    }

    fn tree(&self, table: &str) -> Result<Tree> {
        self.db
            .open_tree(table)
            .map_err(|e| StorageError::DatabaseError(format!("Failed to open tree {}: {}", table, e)))
    }
}

fn decode(bytes: &[u8]) -> Result<Item> {
    Ok(serde_json::from_slice(bytes)?)
}

#[async_trait]
impl StorageEngine for SledStorage {
    fn get_type(&self) -> &'static str {
        "Sled"
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        let key = primary_key(&item)?.to_string();
        let value = serde_json::to_vec(&item)?;
        let tree = self.tree(table)?;
        tree.insert(key.as_bytes(), value)?;
        tree.flush_async().await?;
        debug!("Stored item {} in {}", key, table);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        let tree = self.tree(table)?;
        match tree.get(key.as_bytes())? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    async fn query_index(&self, table: &str, query: IndexQuery) -> Result<Vec<Item>> {
        let tree = self.tree(table)?;
        let limit = query.limit.unwrap_or(usize::MAX);
        let mut results = Vec::new();
        for entry in tree.iter() {
            if results.len() >= limit {
                break;
            }
            let (_key, value) = entry?;
            let item = decode(&value)?;
            if query.matches(&item) {
                results.push(item);
            }
        }
        Ok(results)
    }

    async fn delete_item(&self, table: &str, key: &str) -> Result<()> {
        let tree = self.tree(table)?;
        tree.remove(key.as_bytes())?;
        tree.flush_async().await?;
        Ok(())
    }
}
