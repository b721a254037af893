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

// Backend factory for creating storage adapters from configuration

use super::backend::SensorStore;
use super::cassandra::CassandraStore;
use super::mongo::MongoStore;
use super::mysql::MySqlStore;
use super::postgres::PostgresStore;
use super::redis::RedisStore;
use crate::config::StorageConfig;
use crate::error::StoreError;
use std::sync::Arc;

pub struct BackendFactory;

impl BackendFactory {
    /// Create a connected storage adapter from configuration.
    ///
    /// Construction runs the engine's bootstrap (connectivity check plus
    /// namespace/schema setup), so a returned adapter is ready for traffic.
    /// An unknown backend name is a fatal `StoreError::UnknownBackend`.
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn SensorStore>, StoreError> {
        match config.backend.as_str() {
            "redis" => Ok(Arc::new(RedisStore::connect(&config.redis).await?)),

            "mongodb" => Ok(Arc::new(MongoStore::connect(&config.mongodb).await?)),

            "mysql" => Ok(Arc::new(MySqlStore::connect(&config.mysql).await?)),

            "postgres" => Ok(Arc::new(PostgresStore::connect(&config.postgres).await?)),

            "cassandra" => Ok(Arc::new(CassandraStore::connect(&config.cassandra).await?)),

            unknown => Err(StoreError::UnknownBackend(unknown.to_string())),
        }
    }

    /// Backend names `create` accepts
    pub fn supported() -> &'static [&'static str] {
        &["redis", "mongodb", "mysql", "postgres", "cassandra"]
    }
}
