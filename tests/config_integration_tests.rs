// Copyright 2025 coScene
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Configuration system integration tests

use sensor_store::config::{load_config, load_config_with_env};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, content).expect("Failed to write temp config");
    path
}

#[test]
fn test_load_default_config() {
    let config_path = PathBuf::from("config/default.yaml");

    if config_path.exists() {
        let result = load_config(&config_path);
        assert!(
            result.is_ok(),
            "Failed to load default config: {:?}",
            result.err()
        );

        let config = result.unwrap();

        // Verify defaults
        assert_eq!(config.storage.backend, "redis");
        assert_eq!(config.storage.redis.url, "redis://localhost:6379");
        assert_eq!(config.storage.redis.key, "sensor_data:readings");
        assert_eq!(config.storage.mongodb.database, "sensor_data");
        assert_eq!(config.storage.cassandra.keyspace, "sensor_data");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
    }
}

#[test]
fn test_minimal_config_gets_full_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
storage:
  backend: postgres
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.storage.backend, "postgres");
    // Unmentioned sections still carry complete defaults
    assert_eq!(config.storage.postgres.max_connections, 5);
    assert_eq!(config.storage.redis.timeout_seconds, 10);
    assert_eq!(config.server.bind, "0.0.0.0:8080");
}

#[test]
fn test_config_with_env_substitution() {
    std::env::set_var("TEST_CFG_REDIS_URL", "redis://elsewhere:7000");
    std::env::remove_var("TEST_CFG_KEY");

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
storage:
  backend: redis
  redis:
    url: ${TEST_CFG_REDIS_URL}
    key: ${TEST_CFG_KEY:-fallback:readings}
    timeout_seconds: 5

logging:
  level: debug
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.storage.redis.url, "redis://elsewhere:7000");
    assert_eq!(config.storage.redis.key, "fallback:readings");
    assert_eq!(config.storage.redis.timeout_seconds, 5);
    assert_eq!(config.logging.level, "debug");

    std::env::remove_var("TEST_CFG_REDIS_URL");
}

#[test]
fn test_unknown_backend_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
storage:
  backend: sqlite
"#,
    );

    let result = load_config(&path);
    assert!(result.is_err());
    let text = format!("{:#}", result.unwrap_err());
    assert!(text.contains("sqlite"), "got: {}", text);
}

#[test]
fn test_zero_timeout_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
storage:
  backend: mongodb
  mongodb:
    timeout_seconds: 0
"#,
    );

    let result = load_config(&path);
    assert!(result.is_err());
    let text = format!("{:#}", result.unwrap_err());
    assert!(text.contains("mongodb.timeout_seconds"), "got: {}", text);
}

#[test]
fn test_missing_file_fails_load() {
    let result = load_config("does/not/exist.yaml");
    assert!(result.is_err());
}

#[test]
fn test_invalid_yaml_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "storage: [not, a, mapping");

    let result = load_config(&path);
    assert!(result.is_err());
}

#[test]
fn test_env_overrides_replace_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
storage:
  backend: redis
  mysql:
    url: mysql://file-value:3306/sensor_data
"#,
    );

    std::env::set_var("STORE_BACKEND", "mysql");
    std::env::set_var("MYSQL_URL", "mysql://env-value:3306/sensor_data");

    let config = load_config_with_env(&path).unwrap();
    assert_eq!(config.storage.backend, "mysql");
    assert_eq!(
        config.storage.mysql.url,
        "mysql://env-value:3306/sensor_data"
    );

    // An override still goes through validation
    std::env::set_var("STORE_BACKEND", "leveldb");
    let result = load_config_with_env(&path);

    std::env::remove_var("STORE_BACKEND");
    std::env::remove_var("MYSQL_URL");

    assert!(result.is_err());
    let text = format!("{:#}", result.unwrap_err());
    assert!(text.contains("leveldb"), "got: {}", text);
}
