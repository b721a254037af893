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

// Sensor telemetry store with pluggable storage backends
//
// This is a small HTTP service for time-stamped sensor readings that:
// - Normalizes loosely-typed reading payloads once at the boundary
// - Persists through one storage contract with five interchangeable
//   engines (Redis, MongoDB, MySQL, PostgreSQL, Cassandra)
// - Bootstraps each engine's namespace at startup, idempotently
// - Projects heterogeneous fetch results into a flat CSV report

pub mod api;
pub mod config;
pub mod error;
pub mod reading;
pub mod report;
pub mod storage;

// Re-export main types
pub use config::{load_config, load_config_with_env, StoreConfig};
pub use error::StoreError;
pub use reading::{Reading, RecordedStamp};
pub use report::{readings_to_csv, ReportError};
pub use storage::{BackendFactory, SensorStore};
