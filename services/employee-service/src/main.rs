// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Employee Service
//!
//! Serves the `/employee` REST surface by calling the upstream
//! employee-data service. Configuration comes from the environment; see
//! `--help`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use employee_service::config::{DEFAULT_BIND_ADDRESS, DEFAULT_UPSTREAM_BASE_URL};
use employee_service::retry::millis;
use employee_service::{EmployeeAggregator, EmployeeDataClient, ServiceConfig, router};

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let buildstamp = option_env!("STAMP").unwrap_or("no-STAMP");
    println!("{} {} ({})", name, version, buildstamp);
}

fn print_help(program: &str) {
    print_version();
    println!("Usage: {} [OPTIONS]", program);
    println!();
    println!("Options:");
    println!("  -h, --help       Display this information");
    println!("  -V, --version    Display the program's version number");
    println!();
    println!("Environment variables:");
    println!(
        "  BIND_ADDRESS             Server bind address (default: {})",
        DEFAULT_BIND_ADDRESS
    );
    println!(
        "  EMPLOYEE_API_BASE_URL    Upstream employee collection (default: {})",
        DEFAULT_UPSTREAM_BASE_URL
    );
    println!("  UPSTREAM_TIMEOUT_SECS    Per-request upstream timeout (default: 15)");
    println!("  RETRY_MAX_ATTEMPTS       Attempts per upstream call (default: 5)");
    println!("  RETRY_BASE_DELAY_MS      First backoff delay (default: 30500)");
    println!("  RETRY_BACKOFF_FACTOR     Backoff multiplier (default: 1.5)");
    println!("  RUST_LOG                 Log filter (default: employee_service=info)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    #[allow(clippy::never_loop)] // Intentional: early return on first recognized arg
    for arg in &args[1..] {
        match arg.as_str() {
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-h" | "--help" => {
                print_help(&args[0]);
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "employee_service=info".to_string()),
        ))
        .init();

    print_version();

    let config = ServiceConfig::from_env()?;
    info!(
        upstream = %config.upstream.base_url,
        max_attempts = config.upstream.retry.max_attempts,
        base_delay_ms = millis(config.upstream.retry.base_delay),
        backoff_factor = config.upstream.retry.backoff_factor,
        "Loaded configuration"
    );

    // Cancelled on shutdown so pending backoff waits end promptly
    let shutdown = CancellationToken::new();

    let client = EmployeeDataClient::new(&config.upstream, shutdown.clone())
        .context("Failed to create upstream client")?;
    let aggregator = Arc::new(EmployeeAggregator::new(Arc::new(client)));
    let app = router(aggregator);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    info!("Employee service running on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server failed")
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
    shutdown.cancel();
}
