// rest_api/src/config.rs

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clinic::config::{load_settings_from, settings_builder, ENV_PREFIX};
use clinic::Settings;
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8082;

/// Represents the configuration for the local REST API server.
#[derive(Debug, Clone, Deserialize)]
pub struct RestApiConfig {
    pub host: String,
    pub port: u16,
}

impl RestApiConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    server: RestApiConfig,
}

/// Reads `server.host` / `server.port`, overridable with `CLINIC__SERVER__*`.
pub fn load_rest_api_config() -> Result<RestApiConfig> {
    let section: ServerSection = Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", DEFAULT_PORT)?
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to build REST API configuration")?
        .try_deserialize()
        .context("Failed to parse REST API configuration")?;
    Ok(section.server)
}

/// Clinic settings for local runs: sled unless the environment says otherwise.
pub fn load_local_settings() -> Result<Settings> {
    load_settings_from(settings_builder()?.set_default("storage.backend", "sled")?)
}
