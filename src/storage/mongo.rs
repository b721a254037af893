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

// MongoDB document adapter
//
// One BSON document per reading in a single collection. The collection is
// typed, so documents (de)serialize straight to `Reading` and the `_id`
// surrogate never crosses the storage contract.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{with_deadline, SensorStore};
use crate::config::MongoConfig;
use crate::error::StoreError;
use crate::reading::Reading;

const BACKEND: &str = "mongodb";

pub struct MongoStore {
    collection: Collection<Reading>,
    timeout: Duration,
}

impl MongoStore {
    /// Connect and verify the deployment answers.
    ///
    /// MongoDB creates databases and collections lazily on first write, so
    /// bootstrap only needs to prove the deployment is reachable.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let uri = config.uri.clone();
        let database_name = config.database.clone();
        let collection_name = config.collection.clone();
        let timeout = config.timeout();

        let collection = with_deadline("mongodb bootstrap", timeout, async move {
            let mut options = ClientOptions::parse(&uri)
                .await
                .context("Invalid MongoDB URI")?;
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);

            let client =
                Client::with_options(options).context("Failed to build MongoDB client")?;
            let database = client.database(&database_name);
            database
                .run_command(doc! { "ping": 1 })
                .await
                .context("MongoDB ping failed")?;

            Ok(database.collection::<Reading>(&collection_name))
        })
        .await
        .map_err(|e| StoreError::bootstrap(BACKEND, e))?;

        info!(
            "Connected to MongoDB, collection '{}.{}'",
            config.database, config.collection
        );

        Ok(Self {
            collection,
            timeout,
        })
    }
}

#[async_trait]
impl SensorStore for MongoStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let collection = self.collection.clone();
        let reading = reading.clone();

        with_deadline("insert_one", self.timeout, async move {
            collection
                .insert_one(&reading)
                .await
                .context("insert_one failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    async fn fetch_all(&self) -> Result<Vec<Reading>, StoreError> {
        let collection = self.collection.clone();

        let readings = with_deadline("find", self.timeout, async move {
            let mut cursor = collection.find(doc! {}).await.context("find failed")?;
            let mut readings = Vec::new();
            while let Some(reading) = cursor
                .try_next()
                .await
                .context("Failed to read cursor batch")?
            {
                readings.push(reading);
            }
            Ok(readings)
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))?;

        debug!("Fetched {} readings from MongoDB", readings.len());
        Ok(readings)
    }

    async fn purge_all(&self) -> Result<(), StoreError> {
        let collection = self.collection.clone();

        with_deadline("delete_many", self.timeout, async move {
            // Matching zero documents is still a successful delete
            collection
                .delete_many(doc! {})
                .await
                .context("delete_many failed")?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(BACKEND, e))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
