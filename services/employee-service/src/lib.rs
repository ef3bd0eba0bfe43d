// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Employee Service Library
//!
//! A REST façade over the upstream employee-data service. Every request is
//! served from a fresh upstream fetch; nothing is cached or stored locally.
//! Upstream overload (HTTP 429) is absorbed by retrying with exponential
//! backoff.
//!
//! # Modules
//!
//! - [`aggregator`] - Employee operations and derived views
//! - [`config`] - Service configuration from the environment
//! - [`error`] - Error taxonomy
//! - [`retry`] - Overload retry policy and the retrying HTTP client
//! - [`routes`] - axum router and handlers
//! - [`upstream`] - Upstream employee-data client
//! - [`validation`] - Creation input checks

pub mod aggregator;
pub mod config;
pub mod error;
pub mod retry;
pub mod routes;
pub mod upstream;
pub mod validation;

pub use aggregator::{Creation, Deletion, EmployeeAggregator, Lookup};
pub use config::{ServiceConfig, UpstreamConfig};
pub use error::{Error, Result};
pub use retry::{RetryPolicy, RetryingHttpClient};
pub use routes::router;
pub use upstream::{EmployeeDataClient, EmployeeDirectory, install_tls_provider};
