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

// Storage contract shared by every backend adapter

use anyhow::bail;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;
use crate::reading::Reading;

/// Storage contract for sensor readings
///
/// Adapters persist normalized readings and hand them back; callers cannot
/// observe which engine sits behind the trait object beyond `backend_name`.
/// Construction (the per-engine `connect`) performs namespace bootstrap, so
/// a live adapter always has its key/collection/table ready.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Persist one reading
    ///
    /// Exactly one new stored record exists after a successful return.
    async fn append(&self, reading: &Reading) -> Result<(), StoreError>;

    /// Retrieve every stored reading
    ///
    /// Order is whatever the engine yields; an empty store returns an empty
    /// vector, not an error.
    async fn fetch_all(&self) -> Result<Vec<Reading>, StoreError>;

    /// Remove every stored reading
    ///
    /// Purging an already-empty store succeeds.
    async fn purge_all(&self) -> Result<(), StoreError>;

    /// Engine identifier, matching the config backend name
    fn backend_name(&self) -> &'static str;

    /// Release connections on shutdown
    ///
    /// Engines whose clients release on drop keep this default no-op.
    async fn close(&self) {}
}

/// Bound a network-facing operation in time.
///
/// Every adapter wraps its engine calls in this, so no storage operation can
/// hang past its configured timeout; an elapsed deadline becomes an error
/// naming the operation.
pub(crate) async fn with_deadline<T, F>(
    op: &'static str,
    limit: Duration,
    fut: F,
) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => bail!("{} timed out after {}s", op, limit.as_secs()),
    }
}
