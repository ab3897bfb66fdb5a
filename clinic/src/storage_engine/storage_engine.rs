// clinic/src/storage_engine/storage_engine.rs

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::{Result, StorageError};

/// A flat document as handed to a storage engine.
pub type Item = Map<String, Value>;

/// Attribute every table is keyed on.
pub const PRIMARY_KEY: &str = "id";

/// Exact-match lookup on a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    /// Index name, only meaningful for engines that keep real indexes.
    pub index: String,
    /// Attribute the index is keyed on.
    pub attribute: String,
    pub value: String,
    pub limit: Option<usize>,
}

impl IndexQuery {
    pub fn new(index: &str, attribute: &str, value: &str) -> Self {
        IndexQuery {
            index: index.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True if `item` carries the queried attribute with the queried value.
    pub fn matches(&self, item: &Item) -> bool {
        item.get(&self.attribute).and_then(Value::as_str) == Some(self.value.as_str())
    }
}

/// Reads the primary key of `item`.
pub fn primary_key(item: &Item) -> Result<&str> {
    item.get(PRIMARY_KEY)
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| StorageError::SerializationError(format!("item is missing its '{}' attribute", PRIMARY_KEY)))
}

/// The narrow store interface the repositories are written against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageEngine: Send + Sync + 'static {
    fn get_type(&self) -> &'static str;

    /// Inserts or replaces the item stored under its `id`.
    async fn put_item(&self, table: &str, item: Item) -> Result<()>;

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>>;

    /// Single page of items whose indexed attribute equals the query value.
    async fn query_index(&self, table: &str, query: IndexQuery) -> Result<Vec<Item>>;

    async fn delete_item(&self, table: &str, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn query_matches_exact_string_values() {
        let query = IndexQuery::new("client_id_index", "client_id", "c-1");
        assert!(query.matches(&item(json!({"id": "a", "client_id": "c-1"}))));
        assert!(!query.matches(&item(json!({"id": "a", "client_id": "c-10"}))));
        assert!(!query.matches(&item(json!({"id": "a"}))));
        assert!(!query.matches(&item(json!({"id": "a", "client_id": 1}))));
    }

    #[test]
    fn primary_key_must_be_present() {
        assert_eq!(primary_key(&item(json!({"id": "a"}))).unwrap(), "a");
        assert!(primary_key(&item(json!({"id": ""}))).is_err());
        assert!(primary_key(&item(json!({"name": "a"}))).is_err());
    }
}
