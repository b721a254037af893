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

//! Error taxonomy for the storage contract.
//!
//! Callers can branch on the variant (a malformed payload is the client's
//! fault, everything else is ours); the `cause` chains keep the full driver
//! context for the logs.

use thiserror::Error;

/// Failures surfaced by payload normalization and the storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Inbound payload failed shape or type validation. The message names
    /// the offending field and what was found instead.
    #[error("malformed reading payload: {0}")]
    MalformedInput(String),

    /// Namespace or schema setup failed while constructing an adapter.
    /// Fatal at startup: a store that could not bootstrap is never handed out.
    #[error("{backend} bootstrap failed: {cause:#}")]
    Bootstrap {
        backend: &'static str,
        cause: anyhow::Error,
    },

    /// Engine-level failure during append, fetch, or purge. Timeouts land
    /// here too, so every storage operation is bounded in time.
    #[error("{backend} storage error: {cause:#}")]
    Storage {
        backend: &'static str,
        cause: anyhow::Error,
    },

    /// Configured backend name is not in the supported set.
    #[error("unknown storage backend '{0}' (supported: redis, mongodb, mysql, postgres, cassandra)")]
    UnknownBackend(String),
}

impl StoreError {
    pub(crate) fn bootstrap(backend: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        StoreError::Bootstrap {
            backend,
            cause: cause.into(),
        }
    }

    pub(crate) fn storage(backend: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        StoreError::Storage {
            backend,
            cause: cause.into(),
        }
    }
}
