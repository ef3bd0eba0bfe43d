// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Standalone stub employee-data server for testing and development
//!
//! Run with:
//! ```bash
//! cargo run -p employee-data-stub-server
//! ```
//!
//! Then point employee-service at it:
//! ```bash
//! EMPLOYEE_API_BASE_URL=http://localhost:8112/api/v1/employee cargo run -p employee-service
//! ```
//!
//! Set `STUB_OVERLOAD_REQUESTS=N` to answer the first N requests with 429.

use anyhow::{Context, Result};
use dropshot::{ConfigDropshot, ConfigLogging, ConfigLoggingLevel, HttpServerStarter};
use std::net::SocketAddr;
use std::sync::Arc;

use employee_api::EMPLOYEE_COLLECTION_PATH;
use employee_data_stub_server::{StubContext, api_description};

/// Default bind address for the stub server.
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8112";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "employee_data_stub_server=info".to_string()),
        ))
        .init();

    let log_config = ConfigLogging::StderrTerminal {
        level: ConfigLoggingLevel::Info,
    };
    let log = log_config.to_logger("employee-data-stub-server")?;

    // Load fixture data
    let fixtures_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let context = Arc::new(StubContext::from_fixtures(&fixtures_dir)?);

    let overload = std::env::var("STUB_OVERLOAD_REQUESTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    if overload > 0 {
        tracing::info!("Answering the first {} requests with 429", overload);
        context.overload_next(overload);
    }

    let bind_address: SocketAddr = std::env::var("BIND_ADDRESS")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
        .parse()
        .context("Invalid BIND_ADDRESS")?;

    let config = ConfigDropshot {
        bind_address,
        default_request_body_max_bytes: 1024 * 1024,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        ..Default::default()
    };

    // Create and start the server
    let api = api_description().map_err(|e| anyhow::anyhow!(e))?;
    let server = HttpServerStarter::new(&config, api, context, &log)
        .map_err(|e| anyhow::anyhow!("Failed to create server: {}", e))?
        .start();

    tracing::info!("Stub employee-data server listening on http://{}", bind_address);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET    {}", EMPLOYEE_COLLECTION_PATH);
    tracing::info!("  GET    {}/{{id}}", EMPLOYEE_COLLECTION_PATH);
    tracing::info!("  POST   {}", EMPLOYEE_COLLECTION_PATH);
    tracing::info!("  DELETE {}", EMPLOYEE_COLLECTION_PATH);

    server
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
