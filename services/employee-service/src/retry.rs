// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Retry wrapper for upstream HTTP calls
//!
//! The upstream signals overload with `429 Too Many Requests`. Only that
//! status is retried: every other response, success or failure, goes back to
//! the caller after the first attempt, so genuine client and server errors
//! are never mistaken for transient load.
//!
//! Backoff is a per-call sleep. Concurrent requests each run their own retry
//! loop and never wait on one another.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::error::{Error, Result};

/// Total attempts per logical request (one initial call plus four retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Wait before the first retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(30_500);

/// Growth ratio applied to the wait after every overload
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;

/// How often, and how patiently, an overloaded request is retried
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Upper bound on attempts, including the first
    pub max_attempts: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Multiplier applied to the wait after each overload (uncapped)
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

/// What to do after an overloaded attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given duration, then try again
    Wait(Duration),
    /// The attempt budget is spent
    Exhausted,
}

/// Retry bookkeeping for one logical request
#[derive(Debug, Clone)]
pub struct RetryState {
    attempts: u32,
    current_delay: Duration,
    max_attempts: u32,
    backoff_factor: f64,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempts: 0,
            current_delay: policy.base_delay,
            max_attempts: policy.max_attempts.max(1),
            backoff_factor: policy.backoff_factor,
        }
    }

    /// Attempts that have come back overloaded so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record an overloaded attempt and decide whether another one follows
    ///
    /// No wait is scheduled after the final attempt.
    pub fn on_overload(&mut self) -> RetryDecision {
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            return RetryDecision::Exhausted;
        }

        let delay = self.current_delay;
        self.current_delay =
            Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff_factor)
                .unwrap_or(Duration::MAX);
        RetryDecision::Wait(delay)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A response that can report upstream overload
pub trait Overloadable {
    fn is_overloaded(&self) -> bool;
}

impl Overloadable for StatusCode {
    fn is_overloaded(&self) -> bool {
        *self == StatusCode::TOO_MANY_REQUESTS
    }
}

impl Overloadable for reqwest::Response {
    fn is_overloaded(&self) -> bool {
        self.status().is_overloaded()
    }
}

/// Outcome of a single attempt
enum Attempt<R> {
    Completed(R),
    Overloaded,
}

impl<R: Overloadable> From<R> for Attempt<R> {
    fn from(response: R) -> Self {
        if response.is_overloaded() {
            Attempt::Overloaded
        } else {
            Attempt::Completed(response)
        }
    }
}

/// Run `request` until it yields a non-429 response or the policy gives up
///
/// Errors returned by `request` itself (transport failures) are not retried.
/// Cancelling `shutdown` during a wait fails the call with
/// [`Error::Interrupted`].
pub async fn with_retries<F, Fut, R>(
    policy: &RetryPolicy,
    shutdown: &CancellationToken,
    operation: &str,
    mut request: F,
) -> Result<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
    R: Overloadable,
{
    let mut state = RetryState::new(policy);

    loop {
        let response = request().await?;
        match Attempt::from(response) {
            Attempt::Completed(response) => return Ok(response),
            Attempt::Overloaded => match state.on_overload() {
                RetryDecision::Wait(delay) => {
                    warn!(
                        operation,
                        attempt = state.attempts(),
                        max_attempts = policy.max_attempts,
                        delay_ms = millis(delay),
                        "Received 429 Too Many Requests; backing off"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => {
                            error!(operation, "Interrupted while waiting to retry");
                            return Err(Error::Interrupted {
                                operation: operation.to_string(),
                            });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RetryDecision::Exhausted => {
                    error!(
                        operation,
                        attempts = state.attempts(),
                        "Upstream still overloaded; giving up"
                    );
                    return Err(Error::Overloaded {
                        operation: operation.to_string(),
                        attempts: state.attempts(),
                    });
                }
            },
        }
    }
}

/// HTTP client that retries upstream overload responses
#[derive(Clone)]
pub struct RetryingHttpClient {
    http: reqwest::Client,
    policy: RetryPolicy,
    shutdown: CancellationToken,
}

impl RetryingHttpClient {
    pub fn new(http: reqwest::Client, policy: RetryPolicy, shutdown: CancellationToken) -> Self {
        Self {
            http,
            policy,
            shutdown,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send the request produced by `build`, retrying while upstream answers 429
    ///
    /// `build` is called once per attempt so every attempt sends a fresh
    /// request. Returns the first non-429 response regardless of its status.
    pub async fn execute_with_retry<F>(&self, operation: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        with_retries(&self.policy, &self.shutdown, operation, || {
            let request = build(&self.http);
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| Error::upstream(operation, format!("request failed: {}", e)))
            }
        })
        .await
    }
}
