// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Service configuration

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use crate::retry::{DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_ATTEMPTS, RetryPolicy, millis};

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8111";

/// Default base URL of the upstream employee collection
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://localhost:8112/api/v1/employee";

/// Default per-request HTTP timeout for upstream calls (seconds)
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Upstream connection settings
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamConfig {
    /// Base URL of the employee collection (e.g. `http://host/api/v1/employee`)
    pub base_url: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Overload retry policy
    pub retry: RetryPolicy,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Service configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on
    pub bind_address: SocketAddr,
    /// Upstream employee-data service
    pub upstream: UpstreamConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unparseable numeric settings fall back to their defaults; an
    /// unparseable bind address is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address: SocketAddr = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse()
            .context("Invalid BIND_ADDRESS")?;

        let base_url = lookup("EMPLOYEE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let timeout_secs = parse_or(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        );

        let defaults = RetryPolicy::default();
        let max_attempts = parse_or(&lookup, "RETRY_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS).max(1);
        let base_delay_ms = parse_or(
            &lookup,
            "RETRY_BASE_DELAY_MS",
            millis(defaults.base_delay),
        );
        let mut backoff_factor = parse_or(&lookup, "RETRY_BACKOFF_FACTOR", DEFAULT_BACKOFF_FACTOR);
        if !backoff_factor.is_finite() || backoff_factor < 1.0 {
            warn!(
                backoff_factor,
                "RETRY_BACKOFF_FACTOR must be a finite number >= 1; using default"
            );
            backoff_factor = DEFAULT_BACKOFF_FACTOR;
        }

        Ok(Self {
            bind_address,
            upstream: UpstreamConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                retry: RetryPolicy {
                    max_attempts,
                    base_delay: Duration::from_millis(base_delay_ms),
                    backoff_factor,
                },
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable setting; using default");
            default
        }),
    }
}
