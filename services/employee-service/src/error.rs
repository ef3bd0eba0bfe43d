// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error taxonomy for employee operations
//!
//! "Not found" and "not created" are ordinary results (see
//! [`crate::aggregator`]) and never appear here.

use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the service
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A single failed input constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending input field
    pub field: &'static str,
    /// What the field must satisfy
    pub message: &'static str,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors surfaced by employee operations
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input failed validation; no upstream call was made
    #[error("Invalid employee input: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Upstream kept answering 429 until the attempt budget ran out
    #[error("Upstream overloaded: {operation} failed after {attempts} attempt(s)")]
    Overloaded { operation: String, attempts: u32 },

    /// Upstream answered with an unexpected status or body, or was unreachable
    #[error("Upstream error while {operation}: {reason}")]
    Upstream { operation: String, reason: String },

    /// The backoff wait was cancelled before the next attempt
    #[error("Interrupted while waiting to retry {operation}")]
    Interrupted { operation: String },
}

impl Error {
    pub(crate) fn upstream(operation: &str, reason: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = Error::Validation(vec![
            FieldViolation {
                field: "name",
                message: "Name cannot be blank",
            },
            FieldViolation {
                field: "salary",
                message: "Salary must be greater than zero",
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid employee input: name: Name cannot be blank; \
             salary: Salary must be greater than zero"
        );
    }

    #[test]
    fn test_overloaded_message() {
        let err = Error::Overloaded {
            operation: "fetching all employees".to_string(),
            attempts: 5,
        };
        assert_eq!(
            err.to_string(),
            "Upstream overloaded: fetching all employees failed after 5 attempt(s)"
        );
    }
}
