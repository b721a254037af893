// Configuration module for sensor-store
//
// Provides:
// - YAML configuration file loading
// - Environment variable substitution
// - Configuration validation
// - Default values

pub mod types;
mod loader;

pub use types::*;
pub use loader::ConfigLoader;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    ConfigLoader::load(path).context("Failed to load configuration")
}

/// Load configuration with environment variable overrides
///
/// Deployment environments point the process at their engines without
/// editing the config file; `STORE_BACKEND` picks the engine the same way.
pub fn load_config_with_env<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let mut config = load_config(path)?;

    // Allow environment variables to override config values
    if let Ok(backend) = std::env::var("STORE_BACKEND") {
        config.storage.backend = backend;
    }

    if let Ok(url) = std::env::var("REDIS_URL") {
        config.storage.redis.url = url;
    }

    if let Ok(uri) = std::env::var("MONGODB_URI") {
        config.storage.mongodb.uri = uri;
    }

    if let Ok(url) = std::env::var("MYSQL_URL") {
        config.storage.mysql.url = url;
    }

    if let Ok(url) = std::env::var("POSTGRES_URL") {
        config.storage.postgres.url = url;
    }

    if let Ok(contact_point) = std::env::var("CASSANDRA_CONTACT_POINT") {
        config.storage.cassandra.contact_point = contact_point;
    }

    // Overrides bypass the file-level validation pass
    ConfigLoader::validate(&config)?;

    Ok(config)
}
