// clinic/src/storage_engine/dynamodb_storage.rs

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;
use tracing::debug;

use super::storage_engine::{IndexQuery, Item, StorageEngine, PRIMARY_KEY};
use crate::errors::{Result, StorageError};

/// DynamoDB-backed engine used by the deployed functions. Secondary lookups
/// go through the global secondary index named in the query.
#[derive(Debug, Clone)]
pub struct DynamoDbStorage {
    client: Client,
}

impl DynamoDbStorage {
    pub fn new(client: Client) -> Self {
        DynamoDbStorage { client }
    }

    /// Client built from the default AWS provider chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

fn db_error<E>(operation: &str, table: &str, err: E) -> StorageError
where
    E: std::error::Error + 'static,
{
    StorageError::DatabaseError(format!("{} on {} failed: {}", operation, table, DisplayErrorContext(err)))
}

/// Converts a document into DynamoDB attributes. Empty top-level strings
/// are dropped since DynamoDB refuses them as index keys.
pub fn to_attribute_map(item: Item) -> Result<HashMap<String, AttributeValue>> {
    let item: Item = item
        .into_iter()
        .filter(|(_, value)| !matches!(value, Value::String(s) if s.is_empty()))
        .collect();
    serde_dynamo::to_item(item).map_err(|e| StorageError::SerializationError(e.to_string()))
}

pub fn from_attribute_map(attributes: HashMap<String, AttributeValue>) -> Result<Item> {
    serde_dynamo::from_item(attributes).map_err(|e| StorageError::SerializationError(e.to_string()))
}

#[async_trait]
impl StorageEngine for DynamoDbStorage {
    fn get_type(&self) -> &'static str {
        "DynamoDB"
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_attribute_map(item)?))
            .send()
            .await
            .map_err(|e| db_error("PutItem", table, e))?;
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .key(PRIMARY_KEY, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| db_error("GetItem", table, e))?;
        output.item.map(from_attribute_map).transpose()
    }

    async fn query_index(&self, table: &str, query: IndexQuery) -> Result<Vec<Item>> {
        debug!(table, index = %query.index, attribute = %query.attribute, "Querying index");
        let mut request = self
            .client
            .query()
            .table_name(table)
            .index_name(query.index)
            .key_condition_expression("#k = :v")
            .expression_attribute_names("#k", query.attribute)
            .expression_attribute_values(":v", AttributeValue::S(query.value));
        if let Some(limit) = query.limit {
            request = request.limit(i32::try_from(limit).unwrap_or(i32::MAX));
        }
        let output = request.send().await.map_err(|e| db_error("Query", table, e))?;
        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(from_attribute_map)
            .collect()
    }

    async fn delete_item(&self, table: &str, key: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key(PRIMARY_KEY, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| db_error("DeleteItem", table, e))?;
        Ok(())
    }
}
