// Configuration loader with environment variable substitution

use super::types::*;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file with environment variable substitution
    pub fn load<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        // Substitute environment variables
        let content = Self::substitute_env_vars(&content);

        // Parse YAML
        let config: StoreConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML configuration")?;

        // Validate configuration
        Self::validate(&config)?;

        Ok(config)
    }

    /// Substitute ${VAR} and ${VAR:-default} patterns with environment variables
    ///
    /// Examples:
    /// - ${HOME} -> /home/user
    /// - ${STORE_BACKEND:-redis} -> redis (if STORE_BACKEND not set)
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]+))?\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default_value = caps.get(2).map(|m| m.as_str());

            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if let Some(default) = default_value {
                        default.to_string()
                    } else {
                        // Keep original if no default and var not found
                        format!("${{{}}}", var_name)
                    }
                }
            }
        })
        .to_string()
    }

    /// Validate configuration
    pub(crate) fn validate(config: &StoreConfig) -> Result<()> {
        // Validate backend selection
        match config.storage.backend.as_str() {
            "redis" | "mongodb" | "mysql" | "postgres" | "cassandra" => {}
            unknown => bail!(
                "Unknown backend: '{}'. Supported: redis, mongodb, mysql, postgres, cassandra",
                unknown
            ),
        }

        // Validate engine namespaces
        if config.storage.redis.key.is_empty() {
            bail!("storage.redis.key cannot be empty");
        }

        if config.storage.mongodb.database.is_empty() {
            bail!("storage.mongodb.database cannot be empty");
        }

        if config.storage.mongodb.collection.is_empty() {
            bail!("storage.mongodb.collection cannot be empty");
        }

        if config.storage.cassandra.keyspace.is_empty() {
            bail!("storage.cassandra.keyspace cannot be empty");
        }

        if config.storage.cassandra.replication_factor == 0 {
            bail!("storage.cassandra.replication_factor must be > 0");
        }

        // Validate connection limits
        if config.storage.mysql.max_connections == 0 {
            bail!("storage.mysql.max_connections must be > 0");
        }

        if config.storage.postgres.max_connections == 0 {
            bail!("storage.postgres.max_connections must be > 0");
        }

        // Every storage operation is bounded in time, so a zero timeout
        // would make the first operation fail
        for (section, timeout_seconds) in [
            ("redis", config.storage.redis.timeout_seconds),
            ("mongodb", config.storage.mongodb.timeout_seconds),
            ("mysql", config.storage.mysql.timeout_seconds),
            ("postgres", config.storage.postgres.timeout_seconds),
            ("cassandra", config.storage.cassandra.timeout_seconds),
        ] {
            if timeout_seconds == 0 {
                bail!("storage.{}.timeout_seconds must be > 0", section);
            }
        }

        // Validate server settings
        if config.server.bind.is_empty() {
            bail!("server.bind cannot be empty");
        }

        Ok(())
    }
}
