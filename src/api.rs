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

// HTTP surface over the storage contract
//
// Thin glue: normalize inbound payloads, invoke the three contract
// operations, render the CSV report. Malformed payloads are the client's
// fault (400); everything else surfaces as a 500 with the error text.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::reading::Reading;
use crate::report::readings_to_csv;
use crate::storage::SensorStore;

type SharedStore = Arc<dyn SensorStore>;

/// Build the HTTP router over the process-wide storage adapter
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/echo", post(echo))
        .route("/log", post(log_reading))
        .route("/report", get(report))
        .route("/purge", get(purge).post(purge))
        .with_state(store)
}

async fn root(State(store): State<SharedStore>) -> Json<Value> {
    Json(json!({
        "message": "sensor store is running",
        "backend": store.backend_name(),
    }))
}

async fn echo(Json(payload): Json<Value>) -> Json<Value> {
    debug!("Echoing payload: {}", payload);
    Json(payload)
}

async fn log_reading(State(store): State<SharedStore>, Json(payload): Json<Value>) -> Response {
    let reading = match Reading::from_json(&payload) {
        Ok(reading) => reading,
        Err(err) => return error_response(err),
    };

    match store.append(&reading).await {
        Ok(()) => {
            info!(
                "Logged reading from '{}/{}' to {}",
                reading.location,
                reading.sensor,
                store.backend_name()
            );
            Json(json!({ "message": "Data logged successfully" })).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn report(State(store): State<SharedStore>) -> Response {
    let readings = match store.fetch_all().await {
        Ok(readings) => readings,
        Err(err) => return error_response(err),
    };

    let mut records = Vec::with_capacity(readings.len());
    for reading in &readings {
        match serde_json::to_value(reading) {
            Ok(record) => records.push(record),
            Err(err) => return internal_error(format!("Failed to encode reading: {}", err)),
        }
    }

    match readings_to_csv(&records) {
        Ok(Some(csv)) => {
            debug!("Report covers {} readings", readings.len());
            let disposition = format!(
                "attachment; filename=\"sensor_report-{}.csv\"",
                Utc::now().format("%Y-%m-%d")
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Ok(None) => (
            [(header::CONTENT_TYPE, "text/csv".to_string())],
            "No data available",
        )
            .into_response(),
        Err(err) => internal_error(format!("Report projection failed: {}", err)),
    }
}

async fn purge(State(store): State<SharedStore>) -> Response {
    match store.purge_all().await {
        Ok(()) => {
            info!("Purged all readings from {}", store.backend_name());
            Json(json!({ "message": "Data purged successfully" })).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: StoreError) -> Response {
    let status = match &err {
        StoreError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn internal_error(message: String) -> Response {
    error!("{}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
