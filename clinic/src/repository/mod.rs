// clinic/src/repository/mod.rs

pub mod appointments;
pub mod patients;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use self::appointments::{AppointmentsRepository, StoreAppointmentsRepository};
pub use self::patients::{PatientsRepository, StorePatientsRepository};

#[cfg(test)]
pub use self::appointments::MockAppointmentsRepository;
#[cfg(test)]
pub use self::patients::MockPatientsRepository;

use crate::errors::{Result, StorageError};
use crate::storage_engine::Item;

/// Flattens a storage model into a document.
pub(crate) fn to_item<T: Serialize>(record: &T) -> Result<Item> {
    match serde_json::to_value(record)? {
        Value::Object(item) => Ok(item),
        other => Err(StorageError::SerializationError(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

pub(crate) fn from_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

pub(crate) fn from_items<T: DeserializeOwned>(items: Vec<Item>) -> Result<Vec<T>> {
    items.into_iter().map(from_item).collect()
}
