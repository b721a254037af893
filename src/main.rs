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

use anyhow::{Context, Result};
use clap::Parser;
use std::future::IntoFuture;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sensor_store::api;
use sensor_store::config::load_config_with_env;
use sensor_store::storage::BackendFactory;

/// Sensor Store - persist sensor readings in pluggable storage backends
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Storage backend (overrides config file)
    #[arg(short, long)]
    backend: Option<String>,

    /// Bind address (overrides config file)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration from file
    let mut store_config = load_config_with_env(&args.config)?;

    // Apply CLI overrides
    if let Some(backend) = args.backend {
        store_config.storage.backend = backend;
    }
    if let Some(bind) = args.bind {
        store_config.server.bind = bind;
    }

    // Initialize tracing with configured level
    let log_level = match store_config.logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Sensor Store");
    info!("Loaded configuration from: {:?}", args.config);
    info!("Storage backend: {}", store_config.storage.backend);

    // Create the storage adapter (connects and bootstraps the namespace)
    let store = BackendFactory::create(&store_config.storage).await?;
    info!("Storage backend ready: {}", store.backend_name());

    // Build the HTTP router
    let app = api::router(store.clone());
    let listener = TcpListener::bind(&store_config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", store_config.server.bind))?;
    info!("Listening on http://{}", store_config.server.bind);

    // Serve until Ctrl+C
    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("HTTP server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    // Cleanup
    store.close().await;
    info!("Sensor Store shut down successfully");

    Ok(())
}
