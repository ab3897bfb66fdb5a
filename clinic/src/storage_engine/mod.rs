// clinic/src/storage_engine/mod.rs

pub mod dynamodb_storage;
pub mod inmemory_storage;
pub mod sled_storage;
pub mod storage_engine;

use std::sync::Arc;

use tracing::info;

pub use self::dynamodb_storage::DynamoDbStorage;
pub use self::inmemory_storage::InMemoryStorage;
pub use self::sled_storage::SledStorage;
pub use self::storage_engine::{primary_key, IndexQuery, Item, StorageEngine, PRIMARY_KEY};

#[cfg(test)]
pub use self::storage_engine::MockStorageEngine;

use crate::config::{StorageEngineType, StorageSettings};
use crate::errors::Result;

/// Opens the engine selected by `settings.backend`.
pub async fn open_storage_engine(settings: &StorageSettings) -> Result<Arc<dyn StorageEngine>> {
    let engine: Arc<dyn StorageEngine> = match settings.backend {
        StorageEngineType::DynamoDb => Arc::new(DynamoDbStorage::from_env().await),
        StorageEngineType::Sled => Arc::new(SledStorage::open(&settings.sled_path)?),
        StorageEngineType::InMemory => Arc::new(InMemoryStorage::new()),
    };
    info!(engine = engine.get_type(), "Storage engine ready");
    Ok(engine)
}
