// clinic/src/lib.rs
// Storage engines, repositories and services behind the clinic functions.

pub mod config;
pub mod errors;
pub mod logging;
pub mod repository;
pub mod service;
pub mod storage_engine;
pub mod util;

pub use crate::config::{load_settings, load_settings_from, settings_builder, Settings, StorageEngineType};
pub use crate::errors::{Result, ServiceError, ServiceResult, StorageError};
pub use crate::repository::{
    AppointmentsRepository, PatientsRepository, StoreAppointmentsRepository, StorePatientsRepository,
};
pub use crate::service::{AppointmentsService, PatientsService};
pub use crate::storage_engine::{
    open_storage_engine, DynamoDbStorage, InMemoryStorage, IndexQuery, Item, SledStorage, StorageEngine,
};
