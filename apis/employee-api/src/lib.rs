// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Employee Data API Trait Definition
//!
//! **IMPORTANT**: This trait describes the *upstream* employee-data service,
//! the system of record that employee-service fronts. It only covers the
//! endpoints employee-service calls:
//!
//! - `GET    {base}`       list every employee
//! - `GET    {base}/{id}`  fetch one employee
//! - `POST   {base}`       create an employee
//! - `DELETE {base}`       delete an employee *by name*
//!
//! The trait exists to:
//! 1. Document the exact upstream surface we depend on
//! 2. Back the stub server used by integration tests and local development
//!
//! The wire types are shared with employee-service, which re-serves
//! [`Employee`] records unchanged to its own callers.

use dropshot::{HttpError, HttpResponseOk, Path, RequestContext, TypedBody};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path prefix the upstream service mounts its employee collection under.
pub const EMPLOYEE_COLLECTION_PATH: &str = "/api/v1/employee";

// ============================================================================
// Records
// ============================================================================

/// An employee record as held by the upstream service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Employee {
    /// Identifier assigned by upstream on creation
    pub id: Uuid,
    /// Full name
    pub employee_name: String,
    /// Yearly salary
    pub employee_salary: i64,
    /// Age in years
    pub employee_age: i32,
    /// Job title
    pub employee_title: String,
    /// Work email, assigned by upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
}

/// Input for creating an employee
///
/// Missing keys deserialize to empty values so that validation can report
/// every offending field at once instead of failing on the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CreateEmployeeInput {
    /// Full name (must not be blank)
    pub name: String,
    /// Yearly salary (must be greater than zero)
    pub salary: i64,
    /// Age in years (16 to 75 inclusive)
    pub age: i32,
    /// Job title (must not be blank)
    pub title: String,
}

/// Body of the upstream delete call; upstream deletes by name, not id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteEmployeeInput {
    /// Name of the employee to delete
    pub name: String,
}

/// Response wrapper used by every upstream endpoint
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Envelope<T> {
    /// Payload; `null` when the request produced nothing
    pub data: Option<T>,
    /// Human-readable processing status
    #[serde(default)]
    pub status: String,
}

impl<T> Envelope<T> {
    /// Wrap a payload with the upstream's success status
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            status: "Successfully processed request.".to_string(),
        }
    }
}

/// Path parameter for single-employee endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeIdPath {
    /// Employee identifier
    pub id: Uuid,
}

// ============================================================================
// API Trait
// ============================================================================

/// Upstream Employee Data API (subset)
///
/// The real implementation lives in the upstream service, not here. It may
/// answer any request with `429 Too Many Requests` when it is overloaded.
#[dropshot::api_description]
pub trait EmployeeDataApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    /// List all employees, in upstream order
    #[endpoint {
        method = GET,
        path = "/api/v1/employee",
        tags = ["employees"],
    }]
    async fn list_employees(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<Envelope<Vec<Employee>>>, HttpError>;

    /// Get one employee by id
    #[endpoint {
        method = GET,
        path = "/api/v1/employee/{id}",
        tags = ["employees"],
    }]
    async fn get_employee(
        rqctx: RequestContext<Self::Context>,
        path: Path<EmployeeIdPath>,
    ) -> Result<HttpResponseOk<Envelope<Employee>>, HttpError>;

    /// Create an employee; upstream assigns the id and email
    #[endpoint {
        method = POST,
        path = "/api/v1/employee",
        tags = ["employees"],
    }]
    async fn create_employee(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<CreateEmployeeInput>,
    ) -> Result<HttpResponseOk<Envelope<Employee>>, HttpError>;

    /// Delete the employee with the given name
    #[endpoint {
        method = DELETE,
        path = "/api/v1/employee",
        tags = ["employees"],
    }]
    async fn delete_employee(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<DeleteEmployeeInput>,
    ) -> Result<HttpResponseOk<Envelope<bool>>, HttpError>;
}
