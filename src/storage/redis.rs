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

// Redis list adapter
//
// Readings live as JSON strings in a single list key: RPUSH to append,
// LRANGE 0 -1 to fetch, DEL to purge. The multiplexed connection is cheap
// to clone and every command runs on its own clone.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{with_deadline, SensorStore};
use crate::config::RedisConfig;
use crate::error::StoreError;
use crate::reading::Reading;

const BACKEND: &str = "redis";

#[derive(Debug)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    key: String,
    timeout: Duration,
}

impl RedisStore {
    /// Connect and verify the backing list key is usable.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let url = config.url.clone();
        let key = config.key.clone();
        let timeout = config.timeout();

        let conn = with_deadline("redis bootstrap", timeout, async move {
            let client = redis::Client::open(url.as_str()).context("Invalid Redis URL")?;
            let mut conn = client
                .get_multiplexed_async_connection()
                .await
                .context("Failed to connect to Redis")?;

            // LLEN doubles as a connectivity probe and rejects a
            // pre-existing key of the wrong type up front
            let entries: i64 = conn
                .llen(&key)
                .await
                .with_context(|| format!("List key '{}' is not usable", key))?;
            debug!("Redis list '{}' holds {} readings", key, entries);

            Ok(conn)
        })
        .await
        .map_err(|e| StoreError::bootstrap(BACKEND, e))?;

        info!("Connected to Redis, readings list '{}'", config.key);

        Ok(Self {
            conn,
            key: config.key.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl SensorStore for RedisStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(reading).map_err(|e| StoreError::storage(BACKEND, e))?;
        let mut conn = self.conn.clone();
        let key = self.key.clone();

        with_deadline("RPUSH", self.timeout, async move {
            let _: () = conn
                .rpush(&key, payload)
                .await
                .context("RPUSH failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    async fn fetch_all(&self) -> Result<Vec<Reading>, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key.clone();

        let entries: Vec<String> = with_deadline("LRANGE", self.timeout, async move {
            conn.lrange(&key, 0, -1).await.context("LRANGE failed")
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))?;

        let mut readings = Vec::with_capacity(entries.len());
        for entry in &entries {
            let reading: Reading = serde_json::from_str(entry).map_err(|e| {
                StoreError::storage(
                    BACKEND,
                    anyhow::Error::new(e).context("Stored list entry is not a valid reading"),
                )
            })?;
            readings.push(reading);
        }

        debug!("Fetched {} readings from Redis", readings.len());
        Ok(readings)
    }

    async fn purge_all(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key.clone();

        with_deadline("DEL", self.timeout, async move {
            // DEL of a missing key is a no-op success, so purging an
            // already-empty store succeeds
            let _: () = conn.del(&key).await.context("DEL failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
