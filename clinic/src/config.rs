// clinic/src/config.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use serde::{Deserialize, Deserializer};

pub const ENV_PREFIX: &str = "CLINIC";
pub const DEFAULT_SLED_PATH: &str = "/tmp/clinic_data";

/// Enum for the supported storage engine types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEngineType {
    DynamoDb,
    Sled,
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StorageEngineType::DynamoDb),
            "sled" => Ok(StorageEngineType::Sled),
            "memory" | "inmemory" => Ok(StorageEngineType::InMemory),
            _ => Err(anyhow::anyhow!("Unknown storage engine type: {}", s)),
        }
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageEngineType::DynamoDb => "dynamodb",
            StorageEngineType::Sled => "sled",
            StorageEngineType::InMemory => "memory",
        };
        f.write_str(name)
    }
}

impl<'de> Deserialize<'de> for StorageEngineType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageEngineType,
    pub sled_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppointmentsTableSettings {
    pub table: String,
    pub client_id_index: String,
    pub patient_id_index: String,
    pub doctor_id_index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatientsTableSettings {
    pub table: String,
    pub client_id_index: String,
    pub doc_key_index: String,
}

/// Everything a function needs to reach its tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub appointments: AppointmentsTableSettings,
    pub patients: PatientsTableSettings,
}

/// Defaults mirror the deployed table and index names.
pub fn settings_builder() -> Result<ConfigBuilder<DefaultState>> {
    let builder = Config::builder()
        .set_default("storage.backend", "dynamodb")?
        .set_default("storage.sled_path", DEFAULT_SLED_PATH)?
        .set_default("appointments.table", "AppointmentsTable")?
        .set_default("appointments.client_id_index", "client_id_index")?
        .set_default("appointments.patient_id_index", "patient_id_index")?
        .set_default("appointments.doctor_id_index", "doctor_id_index")?
        .set_default("patients.table", "PatientsTable")?
        .set_default("patients.client_id_index", "client_id_index")?
        .set_default("patients.doc_key_index", "doc_key_index")?;
    Ok(builder)
}

/// Loads settings from defaults overlaid with `CLINIC__SECTION__KEY` variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(settings_builder()?)
}

/// Same as [`load_settings`] on top of caller-adjusted defaults.
pub fn load_settings_from(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to build clinic settings")?
        .try_deserialize()
        .context("Failed to parse clinic settings")
}
