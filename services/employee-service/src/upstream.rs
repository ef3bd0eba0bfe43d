// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Upstream employee-data client
//!
//! Every call goes through [`RetryingHttpClient`], so callers only ever see
//! the final response after overload retries. Status interpretation lives
//! here; the aggregation layer works with decoded records.

use anyhow::Context;
use async_trait::async_trait;
use employee_api::{CreateEmployeeInput, DeleteEmployeeInput, Employee, Envelope};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::retry::RetryingHttpClient;

const LIST_OPERATION: &str = "fetching all employees";
const GET_OPERATION: &str = "fetching employee by id";
const CREATE_OPERATION: &str = "creating employee";
const DELETE_OPERATION: &str = "deleting employee";

/// Trait abstraction for the upstream employee store used by the aggregator.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Every employee, in upstream order
    async fn list(&self) -> Result<Vec<Employee>>;

    /// One employee, or `None` when upstream does not know the id
    async fn get(&self, id: Uuid) -> Result<Option<Employee>>;

    /// Create an employee; `None` when upstream's record lacks an id or name
    async fn create(&self, input: &CreateEmployeeInput) -> Result<Option<Employee>>;

    /// Delete the employee with the given name
    async fn delete_by_name(&self, name: &str) -> Result<()>;
}

/// Install the process-wide rustls crypto provider
///
/// reqwest is built without a default provider, so this must run before any
/// `reqwest::Client` is built. Repeated calls are harmless.
pub fn install_tls_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Created record as upstream returns it; id and name may be missing
#[derive(Debug, Deserialize)]
struct CreatedRecord {
    id: Option<Uuid>,
    employee_name: Option<String>,
    #[serde(default)]
    employee_salary: i64,
    #[serde(default)]
    employee_age: i32,
    #[serde(default)]
    employee_title: String,
    #[serde(default)]
    employee_email: Option<String>,
}

impl CreatedRecord {
    fn into_employee(self) -> Option<Employee> {
        Some(Employee {
            id: self.id?,
            employee_name: self.employee_name?,
            employee_salary: self.employee_salary,
            employee_age: self.employee_age,
            employee_title: self.employee_title,
            employee_email: self.employee_email,
        })
    }
}

/// Listed record as upstream returns it; the name may be null
#[derive(Debug, Deserialize)]
struct ListedRecord {
    id: Uuid,
    #[serde(default)]
    employee_name: Option<String>,
    employee_salary: i64,
    #[serde(default)]
    employee_age: i32,
    #[serde(default)]
    employee_title: String,
    #[serde(default)]
    employee_email: Option<String>,
}

impl From<ListedRecord> for Employee {
    /// A nameless record keeps an empty name so salary views still count it
    fn from(record: ListedRecord) -> Self {
        Employee {
            id: record.id,
            employee_name: record.employee_name.unwrap_or_default(),
            employee_salary: record.employee_salary,
            employee_age: record.employee_age,
            employee_title: record.employee_title,
            employee_email: record.employee_email,
        }
    }
}

/// HTTP client for the upstream employee-data service
#[derive(Clone)]
pub struct EmployeeDataClient {
    client: RetryingHttpClient,
    base_url: String,
}

impl EmployeeDataClient {
    /// Create a new upstream client
    pub fn new(config: &UpstreamConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        install_tls_provider();

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("EmployeeService/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: RetryingHttpClient::new(http, config.retry, shutdown),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn employee_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<Envelope<T>> {
    response
        .json::<Envelope<T>>()
        .await
        .map_err(|e| Error::upstream(operation, format!("malformed response body: {}", e)))
}

fn unexpected_status(operation: &str, status: StatusCode) -> Error {
    error!(operation, %status, "Unexpected upstream status");
    Error::upstream(operation, format!("unexpected status {}", status))
}

#[async_trait]
impl EmployeeDirectory for EmployeeDataClient {
    async fn list(&self) -> Result<Vec<Employee>> {
        let response = self
            .client
            .execute_with_retry(LIST_OPERATION, |http| http.get(&self.base_url))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected_status(LIST_OPERATION, status));
        }

        let employees: Vec<Employee> = decode::<Vec<ListedRecord>>(response, LIST_OPERATION)
            .await?
            .data
            .ok_or_else(|| Error::upstream(LIST_OPERATION, "response has no data"))?
            .into_iter()
            .map(Employee::from)
            .collect();

        info!(count = employees.len(), "Retrieved employees");
        Ok(employees)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
        let url = self.employee_url(id);
        let response = self
            .client
            .execute_with_retry(GET_OPERATION, |http| http.get(&url))
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(%id, "Employee not found upstream");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(unexpected_status(GET_OPERATION, status));
        }

        let employee = decode::<Employee>(response, GET_OPERATION).await?.data;
        if employee.is_some() {
            info!(%id, "Retrieved employee");
        }
        Ok(employee)
    }

    async fn create(&self, input: &CreateEmployeeInput) -> Result<Option<Employee>> {
        let response = self
            .client
            .execute_with_retry(CREATE_OPERATION, |http| {
                http.post(&self.base_url).json(input)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected_status(CREATE_OPERATION, status));
        }

        let record = decode::<CreatedRecord>(response, CREATE_OPERATION).await?.data;
        match record.and_then(CreatedRecord::into_employee) {
            Some(employee) => {
                info!(id = %employee.id, "Created employee");
                Ok(Some(employee))
            }
            None => {
                error!("Upstream returned a created record without id or name");
                Ok(None)
            }
        }
    }

    async fn delete_by_name(&self, name: &str) -> Result<()> {
        let body = DeleteEmployeeInput {
            name: name.to_string(),
        };
        let response = self
            .client
            .execute_with_retry(DELETE_OPERATION, |http| {
                http.delete(&self.base_url).json(&body)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected_status(DELETE_OPERATION, status));
        }

        Ok(())
    }
}
