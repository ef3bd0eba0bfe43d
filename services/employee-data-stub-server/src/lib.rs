// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Stub employee-data server for testing
//!
//! This crate provides a Dropshot-based HTTP server that implements the
//! upstream employee-data API trait over an in-memory collection. It can be
//! used for:
//!
//! - Integration testing of employee-service without the real upstream
//! - Local development and demos
//!
//! The collection is seeded from `fixtures/employees.json`. The stub can be
//! told to answer the next N requests with `429 Too Many Requests`, which is
//! how the real upstream signals overload.

use anyhow::{Context, Result};
use dropshot::{ClientErrorStatusCode, HttpError, HttpResponseOk, Path, RequestContext, TypedBody};
use employee_api::{
    CreateEmployeeInput, DeleteEmployeeInput, Employee, EmployeeIdPath, Envelope,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Fixture file holding the seed collection
const FIXTURE_FILE: &str = "employees.json";

// ============================================================================
// Server Context
// ============================================================================

/// Context for the stub server containing the employee collection
#[derive(Debug)]
pub struct StubContext {
    /// Employees in insertion order (upstream order is observable)
    employees: Mutex<Vec<Employee>>,
    /// Remaining requests to answer with 429
    overload_remaining: AtomicU32,
    /// Total requests received, including overloaded ones
    requests: AtomicUsize,
    /// DELETE requests received, including overloaded ones
    deletes: AtomicUsize,
}

impl StubContext {
    /// Create a stub context holding the given employees
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            overload_remaining: AtomicU32::new(0),
            requests: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    /// Create a stub context seeded from `employees.json` in `fixtures_dir`
    pub fn from_fixtures(fixtures_dir: &std::path::Path) -> Result<Self> {
        let path = fixtures_dir.join(FIXTURE_FILE);
        let json_str = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let employees: Vec<Employee> = serde_json::from_str(&json_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded {} employees from {}", employees.len(), path.display());

        Ok(Self::new(employees))
    }

    /// Answer the next `count` requests with 429 Too Many Requests
    pub fn overload_next(&self, count: u32) {
        self.overload_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of DELETE requests received so far
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Snapshot of the current collection
    pub async fn employees(&self) -> Vec<Employee> {
        self.employees.lock().await.clone()
    }

    /// Count the request and reject it while an overload budget remains
    fn admit(&self) -> Result<(), HttpError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let overloaded = self
            .overload_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if overloaded {
            tracing::debug!("Simulating overload");
            return Err(HttpError::for_client_error(
                None,
                ClientErrorStatusCode::TOO_MANY_REQUESTS,
                "Too Many Requests".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// API Implementation
// ============================================================================

/// Marker type for the stub employee-data API implementation
pub enum StubEmployeeDataApi {}

impl employee_api::EmployeeDataApi for StubEmployeeDataApi {
    type Context = Arc<StubContext>;

    async fn list_employees(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<Envelope<Vec<Employee>>>, HttpError> {
        let ctx = rqctx.context();
        ctx.admit()?;

        Ok(HttpResponseOk(Envelope::ok(ctx.employees().await)))
    }

    async fn get_employee(
        rqctx: RequestContext<Self::Context>,
        path: Path<EmployeeIdPath>,
    ) -> Result<HttpResponseOk<Envelope<Employee>>, HttpError> {
        let ctx = rqctx.context();
        ctx.admit()?;
        let id = path.into_inner().id;

        let employees = ctx.employees.lock().await;
        let employee = employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| HttpError::for_not_found(None, format!("Employee not found: {}", id)))?;

        Ok(HttpResponseOk(Envelope::ok(employee)))
    }

    async fn create_employee(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<CreateEmployeeInput>,
    ) -> Result<HttpResponseOk<Envelope<Employee>>, HttpError> {
        let ctx = rqctx.context();
        ctx.admit()?;
        let input = body.into_inner();

        if input.name.trim().is_empty() {
            return Err(HttpError::for_bad_request(
                None,
                "name must not be blank".to_string(),
            ));
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            employee_email: Some(email_for(&input.name)),
            employee_name: input.name,
            employee_salary: input.salary,
            employee_age: input.age,
            employee_title: input.title,
        };

        ctx.employees.lock().await.push(employee.clone());
        tracing::info!(id = %employee.id, "Created employee");

        Ok(HttpResponseOk(Envelope::ok(employee)))
    }

    async fn delete_employee(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<DeleteEmployeeInput>,
    ) -> Result<HttpResponseOk<Envelope<bool>>, HttpError> {
        let ctx = rqctx.context();
        ctx.deletes.fetch_add(1, Ordering::SeqCst);
        ctx.admit()?;
        let name = body.into_inner().name;

        let mut employees = ctx.employees.lock().await;
        let position = employees
            .iter()
            .position(|e| e.employee_name == name)
            .ok_or_else(|| {
                HttpError::for_not_found(None, format!("Employee not found: {}", name))
            })?;
        employees.remove(position);

        Ok(HttpResponseOk(Envelope::ok(true)))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Derive a work email from the first word of a name
fn email_for(name: &str) -> String {
    let local = name
        .split_whitespace()
        .next()
        .unwrap_or("employee")
        .to_lowercase();
    format!("{}@company.com", local)
}

/// Create the Dropshot API description for the stub server
pub fn api_description() -> Result<dropshot::ApiDescription<Arc<StubContext>>, String> {
    employee_api::employee_data_api_mod::api_description::<StubEmployeeDataApi>()
        .map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
