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

// Cassandra wide-column adapter
//
// Readings are rows in `<keyspace>.readings`. The primary key is the four
// identity columns, so re-appending a byte-identical reading upserts the
// same row; that is the engine's natural multiset. Statements are fully
// qualified with the keyspace, so the session never switches keyspaces.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cdrs_tokio::cluster::session::{Session, SessionBuilder, TcpSessionBuilder};
use cdrs_tokio::cluster::{NodeTcpConfigBuilder, TcpConnectionManager};
use cdrs_tokio::load_balancing::RoundRobinLoadBalancingStrategy;
use cdrs_tokio::query_values;
use cdrs_tokio::transport::TransportTcp;
use cdrs_tokio::types::IntoRustByName;
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{with_deadline, SensorStore};
use crate::config::CassandraConfig;
use crate::error::StoreError;
use crate::reading::Reading;

const BACKEND: &str = "cassandra";

type CqlSession = Session<
    TransportTcp,
    TcpConnectionManager,
    RoundRobinLoadBalancingStrategy<TransportTcp, TcpConnectionManager>,
>;

pub struct CassandraStore {
    session: CqlSession,
    keyspace: String,
    timeout: Duration,
}

impl CassandraStore {
    /// Connect and ensure the keyspace and readings table exist.
    ///
    /// Both DDL statements use IF NOT EXISTS, so reconnecting against an
    /// already-bootstrapped cluster is a no-op.
    pub async fn connect(config: &CassandraConfig) -> Result<Self, StoreError> {
        let contact_point = config.contact_point.clone();
        let keyspace = config.keyspace.clone();
        let replication_factor = config.replication_factor;
        let timeout = config.timeout();

        let session = with_deadline("cassandra bootstrap", timeout, async move {
            let cluster_config = NodeTcpConfigBuilder::new()
                .with_contact_point(contact_point.clone().into())
                .build()
                .await
                .with_context(|| format!("Failed to resolve contact point '{}'", contact_point))?;

            let session = TcpSessionBuilder::new(RoundRobinLoadBalancingStrategy::new(), cluster_config)
                .build()
                .await
                .context("Failed to open Cassandra session")?;

            let create_keyspace = format!(
                "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                 {{ 'class': 'SimpleStrategy', 'replication_factor': {} }}",
                keyspace, replication_factor
            );
            session
                .query(create_keyspace)
                .await
                .context("Failed to create keyspace")?;

            let create_table = format!(
                "CREATE TABLE IF NOT EXISTS {}.readings ( \
                 recorded BIGINT, location TEXT, sensor TEXT, \
                 measurement TEXT, units TEXT, value DOUBLE, \
                 PRIMARY KEY (recorded, location, sensor, measurement) )",
                keyspace
            );
            session
                .query(create_table)
                .await
                .context("Failed to create readings table")?;

            Ok(session)
        })
        .await
        .map_err(|e| StoreError::bootstrap(BACKEND, e))?;

        info!("Connected to Cassandra, keyspace '{}'", config.keyspace);

        Ok(Self {
            session,
            keyspace: config.keyspace.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl SensorStore for CassandraStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let insert = format!(
            "INSERT INTO {}.readings (recorded, location, sensor, measurement, units, value) \
             VALUES (?, ?, ?, ?, ?, ?)",
            self.keyspace
        );

        with_deadline("INSERT", self.timeout, async {
            let prepared = self
                .session
                .prepare(&insert)
                .await
                .context("Failed to prepare INSERT")?;
            let values = query_values!(
                reading.recorded,
                reading.location.clone(),
                reading.sensor.clone(),
                reading.measurement.clone(),
                reading.units.clone(),
                reading.value
            );
            self.session
                .exec_with_values(&prepared, values)
                .await
                .context("INSERT failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    async fn fetch_all(&self) -> Result<Vec<Reading>, StoreError> {
        let select = format!(
            "SELECT recorded, location, sensor, measurement, units, value FROM {}.readings",
            self.keyspace
        );

        let readings = with_deadline("SELECT", self.timeout, async {
            let response = self.session.query(select).await.context("SELECT failed")?;
            let rows = response
                .response_body()
                .context("Invalid SELECT response")?
                .into_rows()
                .context("Unexpected response kind for SELECT")?;

            let mut readings = Vec::with_capacity(rows.len());
            for row in rows {
                let recorded: i64 = row
                    .get_by_name("recorded")
                    .context("Failed to decode column 'recorded'")?
                    .context("Column 'recorded' was null")?;
                let location: String = row
                    .get_by_name("location")
                    .context("Failed to decode column 'location'")?
                    .context("Column 'location' was null")?;
                let sensor: String = row
                    .get_by_name("sensor")
                    .context("Failed to decode column 'sensor'")?
                    .context("Column 'sensor' was null")?;
                let measurement: String = row
                    .get_by_name("measurement")
                    .context("Failed to decode column 'measurement'")?
                    .context("Column 'measurement' was null")?;
                let units: String = row
                    .get_by_name("units")
                    .context("Failed to decode column 'units'")?
                    .context("Column 'units' was null")?;
                let value: f64 = row
                    .get_by_name("value")
                    .context("Failed to decode column 'value'")?
                    .context("Column 'value' was null")?;

                readings.push(Reading {
                    recorded,
                    location,
                    sensor,
                    measurement,
                    units,
                    value,
                });
            }
            Ok(readings)
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))?;

        debug!("Fetched {} readings from Cassandra", readings.len());
        Ok(readings)
    }

    async fn purge_all(&self) -> Result<(), StoreError> {
        let truncate = format!("TRUNCATE {}.readings", self.keyspace);

        with_deadline("TRUNCATE", self.timeout, async {
            // TRUNCATE of an empty table succeeds
            self.session
                .query(truncate)
                .await
                .context("TRUNCATE failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
