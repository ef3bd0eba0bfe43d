// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HTTP routes for the employee façade
//!
//! | Method | Path                                          | Handler              |
//! |--------|-----------------------------------------------|----------------------|
//! | GET    | `/employee`                                   | [`list_employees`]   |
//! | POST   | `/employee`                                   | [`create_employee`]  |
//! | GET    | `/employee/search/{search_string}`            | [`search_employees`] |
//! | GET    | `/employee/highestSalary`                     | [`highest_salary`]   |
//! | GET    | `/employee/topTenHighestEarningEmployeeNames` | [`top_ten_names`]    |
//! | GET    | `/employee/{id}`                              | [`get_employee`]     |
//! | DELETE | `/employee/{id}`                              | [`delete_employee`]  |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use employee_api::{CreateEmployeeInput, Employee};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::aggregator::{Creation, Deletion, EmployeeAggregator, Lookup};
use crate::error::{Error, FieldViolation};

/// Body returned by a successful delete
pub const DELETED_MESSAGE: &str = "Employee deleted successfully.";

type SharedAggregator = Arc<EmployeeAggregator>;

/// Build the façade router
pub fn router(aggregator: SharedAggregator) -> Router {
    Router::new()
        .route("/employee", get(list_employees).post(create_employee))
        .route("/employee/highestSalary", get(highest_salary))
        .route(
            "/employee/topTenHighestEarningEmployeeNames",
            get(top_ten_names),
        )
        .route("/employee/search/{search_string}", get(search_employees))
        .route("/employee/{id}", get(get_employee).delete(delete_employee))
        .with_state(aggregator)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<FieldViolation>,
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Overloaded { .. } | Error::Interrupted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = self.to_string();
        let violations = match self {
            Error::Validation(violations) => violations,
            _ => Vec::new(),
        };
        (status, Json(ErrorBody { message, violations })).into_response()
    }
}

/// Parse a path id, accepting only the hyphenated 36-character form
fn parse_id(raw: &str) -> Option<Uuid> {
    let shaped = raw.len() == 36 && raw.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
    if !shaped {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

pub async fn list_employees(
    State(aggregator): State<SharedAggregator>,
) -> Result<Json<Vec<Employee>>, Error> {
    Ok(Json(aggregator.list_all().await?))
}

pub async fn search_employees(
    State(aggregator): State<SharedAggregator>,
    Path(search_string): Path<String>,
) -> Result<Json<Vec<Employee>>, Error> {
    Ok(Json(aggregator.search_by_name(&search_string).await?))
}

pub async fn highest_salary(
    State(aggregator): State<SharedAggregator>,
) -> Result<Json<i64>, Error> {
    Ok(Json(aggregator.highest_salary().await?))
}

pub async fn top_ten_names(
    State(aggregator): State<SharedAggregator>,
) -> Result<Json<Vec<String>>, Error> {
    Ok(Json(aggregator.top_ten_earners().await?))
}

pub async fn get_employee(
    State(aggregator): State<SharedAggregator>,
    Path(id): Path<String>,
) -> Result<Response, Error> {
    let Some(id) = parse_id(&id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    Ok(match aggregator.get_by_id(id).await? {
        Lookup::Found(employee) => Json(employee).into_response(),
        Lookup::NotFound => StatusCode::NOT_FOUND.into_response(),
    })
}

pub async fn create_employee(
    State(aggregator): State<SharedAggregator>,
    Json(input): Json<CreateEmployeeInput>,
) -> Result<Response, Error> {
    Ok(match aggregator.create(&input).await? {
        Creation::Created(employee) => Json(employee).into_response(),
        Creation::NotCreated => StatusCode::BAD_REQUEST.into_response(),
    })
}

pub async fn delete_employee(
    State(aggregator): State<SharedAggregator>,
    Path(id): Path<String>,
) -> Result<Response, Error> {
    let Some(id) = parse_id(&id) else {
        warn!(id, "Rejecting delete with malformed id");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };

    Ok(match aggregator.delete_by_id(id).await? {
        Deletion::Deleted => (StatusCode::OK, DELETED_MESSAGE).into_response(),
        Deletion::NotFound | Deletion::Failed => StatusCode::NOT_FOUND.into_response(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::Result;
    use crate::upstream::{EmployeeDirectory, install_tls_provider};
    use async_trait::async_trait;

    /// Upstream that knows one employee, refuses to delete and returns
    /// unusable created records
    struct UncooperativeDirectory {
        known: Employee,
    }

    #[async_trait]
    impl EmployeeDirectory for UncooperativeDirectory {
        async fn list(&self) -> Result<Vec<Employee>> {
            Ok(vec![self.known.clone()])
        }

        async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
            Ok((id == self.known.id).then(|| self.known.clone()))
        }

        async fn create(&self, _input: &CreateEmployeeInput) -> Result<Option<Employee>> {
            Ok(None)
        }

        async fn delete_by_name(&self, _name: &str) -> Result<()> {
            Err(Error::upstream("deleting employee", "unexpected status 404"))
        }
    }

    /// Serve the router over `directory` on an ephemeral port
    async fn serve(directory: UncooperativeDirectory) -> String {
        let app = router(Arc::new(EmployeeAggregator::new(Arc::new(directory))));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{}", addr)
    }

    fn known_employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_name: "Ada Lovelace".to_string(),
            employee_salary: 120_000,
            employee_age: 36,
            employee_title: "Analyst".to_string(),
            employee_email: None,
        }
    }

    #[tokio::test]
    async fn test_not_created_is_bad_request() {
        let base = serve(UncooperativeDirectory {
            known: known_employee(),
        })
        .await;
        install_tls_provider();

        let response = reqwest::Client::new()
            .post(format!("{}/employee", base))
            .json(&serde_json::json!({
                "name": "Ada Lovelace",
                "salary": 120000,
                "age": 36,
                "title": "Analyst"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_delete_is_not_found() {
        let known = known_employee();
        let id = known.id;
        let base = serve(UncooperativeDirectory { known }).await;
        install_tls_provider();

        let response = reqwest::Client::new()
            .delete(format!("{}/employee/{}", base, id))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.text().await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_id_requires_hyphenated_form() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&id.simple().to_string()), None);
        assert_eq!(parse_id("not-a-uuid"), None);
        assert_eq!(parse_id("------------------------------------"), None);
    }

    #[test]
    fn test_status_mapping() {
        let overloaded = Error::Overloaded {
            operation: "fetching all employees".to_string(),
            attempts: 5,
        };
        let interrupted = Error::Interrupted {
            operation: "fetching all employees".to_string(),
        };
        assert_eq!(status_for(&overloaded), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for(&interrupted), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&Error::upstream("creating employee", "unexpected status 500")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::Validation(Vec::new())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_body_omits_empty_violations() {
        let body = ErrorBody {
            message: "Upstream error".to_string(),
            violations: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "message": "Upstream error" })
        );
    }
}
