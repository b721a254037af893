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

// PostgreSQL adapter
//
// Same row layout as the MySQL adapter, expressed in Postgres types and
// placeholder syntax. The BIGSERIAL surrogate id never leaves the adapter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{with_deadline, SensorStore};
use crate::config::PostgresConfig;
use crate::error::StoreError;
use crate::reading::Reading;

const BACKEND: &str = "postgres";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS readings ( \
     id BIGSERIAL PRIMARY KEY, \
     recorded BIGINT NOT NULL, \
     location VARCHAR(255) NOT NULL, \
     sensor VARCHAR(255) NOT NULL, \
     measurement VARCHAR(255) NOT NULL, \
     units VARCHAR(64) NOT NULL, \
     value DOUBLE PRECISION NOT NULL )";

pub struct PostgresStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresStore {
    /// Connect a bounded pool and ensure the readings table exists.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        let url = config.url.clone();
        let max_connections = config.max_connections;
        let timeout = config.timeout();

        let pool = with_deadline("postgres bootstrap", timeout, async move {
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(timeout)
                .connect(&url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            sqlx::query(CREATE_TABLE)
                .execute(&pool)
                .await
                .context("Failed to create readings table")?;

            Ok(pool)
        })
        .await
        .map_err(|e| StoreError::bootstrap(BACKEND, e))?;

        info!("Connected to PostgreSQL, readings table ready");

        Ok(Self { pool, timeout })
    }
}

#[async_trait]
impl SensorStore for PostgresStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let reading = reading.clone();

        with_deadline("INSERT", self.timeout, async move {
            sqlx::query(
                "INSERT INTO readings (recorded, location, sensor, measurement, units, value) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(reading.recorded)
            .bind(&reading.location)
            .bind(&reading.sensor)
            .bind(&reading.measurement)
            .bind(&reading.units)
            .bind(reading.value)
            .execute(&pool)
            .await
            .context("INSERT failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    async fn fetch_all(&self) -> Result<Vec<Reading>, StoreError> {
        let pool = self.pool.clone();

        let readings = with_deadline("SELECT", self.timeout, async move {
            sqlx::query_as::<_, Reading>(
                "SELECT recorded, location, sensor, measurement, units, value FROM readings",
            )
            .fetch_all(&pool)
            .await
            .context("SELECT failed")
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))?;

        debug!("Fetched {} readings from PostgreSQL", readings.len());
        Ok(readings)
    }

    async fn purge_all(&self) -> Result<(), StoreError> {
        let pool = self.pool.clone();

        with_deadline("DELETE", self.timeout, async move {
            // Deleting from an empty table affects zero rows and succeeds
            sqlx::query("DELETE FROM readings")
                .execute(&pool)
                .await
                .context("DELETE failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
