// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Employee operations composed from upstream calls
//!
//! Derived views (search, highest salary, top earners) are computed in
//! memory over a fresh fetch of the whole collection. Fetched records are
//! never modified.

use std::sync::Arc;

use employee_api::{CreateEmployeeInput, Employee};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::Result;
use crate::upstream::EmployeeDirectory;
use crate::validation::validate_create;

/// Number of names returned by [`EmployeeAggregator::top_ten_earners`]
pub const TOP_EARNER_COUNT: usize = 10;

/// Result of looking up one employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Employee),
    NotFound,
}

/// Result of creating an employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creation {
    Created(Employee),
    /// Upstream accepted the request but returned a record without id or name
    NotCreated,
}

/// Result of deleting an employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// No employee has the id; no delete was issued
    NotFound,
    /// The delete call itself failed
    Failed,
}

impl Deletion {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Deletion::Deleted)
    }
}

/// Employee-facing operations over the upstream directory
#[derive(Clone)]
pub struct EmployeeAggregator {
    directory: Arc<dyn EmployeeDirectory>,
}

impl EmployeeAggregator {
    pub fn new(directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self { directory }
    }

    /// Every employee, in upstream order
    pub async fn list_all(&self) -> Result<Vec<Employee>> {
        self.directory.list().await
    }

    /// Employees whose name contains `fragment`, ignoring case
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Employee>> {
        info!(fragment, "Searching employees by name");
        Ok(filter_by_name(self.list_all().await?, fragment))
    }

    /// Highest salary in the collection, or 0 when it is empty
    pub async fn highest_salary(&self) -> Result<i64> {
        Ok(highest_salary(&self.list_all().await?))
    }

    /// Names of the ten best-paid employees, best-paid first
    pub async fn top_ten_earners(&self) -> Result<Vec<String>> {
        Ok(top_earner_names(self.list_all().await?, TOP_EARNER_COUNT))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Lookup> {
        Ok(match self.directory.get(id).await? {
            Some(employee) => Lookup::Found(employee),
            None => Lookup::NotFound,
        })
    }

    /// Validate `input`, then create it upstream
    pub async fn create(&self, input: &CreateEmployeeInput) -> Result<Creation> {
        validate_create(input)?;

        Ok(match self.directory.create(input).await? {
            Some(employee) => Creation::Created(employee),
            None => Creation::NotCreated,
        })
    }

    /// Delete the employee with the given id
    ///
    /// Upstream deletes by name, so the current name is looked up first.
    /// Lookup errors propagate; a failing delete call yields
    /// [`Deletion::Failed`].
    pub async fn delete_by_id(&self, id: Uuid) -> Result<Deletion> {
        let employee = match self.get_by_id(id).await? {
            Lookup::Found(employee) => employee,
            Lookup::NotFound => {
                error!(%id, "Employee not found; nothing to delete");
                return Ok(Deletion::NotFound);
            }
        };

        match self.directory.delete_by_name(&employee.employee_name).await {
            Ok(()) => {
                info!(%id, "Deleted employee");
                Ok(Deletion::Deleted)
            }
            Err(e) => {
                error!(%id, error = %e, "Failed to delete employee");
                Ok(Deletion::Failed)
            }
        }
    }
}

fn filter_by_name(employees: Vec<Employee>, fragment: &str) -> Vec<Employee> {
    let needle = fragment.to_lowercase();
    employees
        .into_iter()
        .filter(|e| !e.employee_name.is_empty())
        .filter(|e| e.employee_name.to_lowercase().contains(&needle))
        .collect()
}

fn highest_salary(employees: &[Employee]) -> i64 {
    employees
        .iter()
        .map(|e| e.employee_salary)
        .max()
        .unwrap_or(0)
}

fn top_earner_names(mut employees: Vec<Employee>, count: usize) -> Vec<String> {
    // Stable: equal salaries keep upstream order.
    employees.sort_by(|a, b| b.employee_salary.cmp(&a.employee_salary));
    employees
        .into_iter()
        .take(count)
        .map(|e| e.employee_name)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn employee(name: &str, salary: i64) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_name: name.to_string(),
            employee_salary: salary,
            employee_age: 30,
            employee_title: "Engineer".to_string(),
            employee_email: None,
        }
    }

    /// In-memory directory that counts upstream calls
    #[derive(Default)]
    struct FakeDirectory {
        employees: Mutex<Vec<Employee>>,
        fail_list: bool,
        fail_delete: bool,
        malformed_create: bool,
        lists: AtomicUsize,
        creates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl FakeDirectory {
        fn with(employees: Vec<Employee>) -> Self {
            Self {
                employees: Mutex::new(employees),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl EmployeeDirectory for FakeDirectory {
        async fn list(&self) -> Result<Vec<Employee>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(Error::Overloaded {
                    operation: "fetching all employees".to_string(),
                    attempts: 5,
                });
            }
            Ok(self.employees.lock().unwrap().clone())
        }

        async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
            Ok(self
                .employees
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned())
        }

        async fn create(&self, input: &CreateEmployeeInput) -> Result<Option<Employee>> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.malformed_create {
                return Ok(None);
            }
            let created = Employee {
                id: Uuid::new_v4(),
                employee_name: input.name.clone(),
                employee_salary: input.salary,
                employee_age: input.age,
                employee_title: input.title.clone(),
                employee_email: None,
            };
            self.employees.lock().unwrap().push(created.clone());
            Ok(Some(created))
        }

        async fn delete_by_name(&self, name: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                return Err(Error::upstream("deleting employee", "unexpected status 500"));
            }
            self.employees
                .lock()
                .unwrap()
                .retain(|e| e.employee_name != name);
            Ok(())
        }
    }

    fn aggregator(directory: &Arc<FakeDirectory>) -> EmployeeAggregator {
        EmployeeAggregator::new(Arc::clone(directory) as Arc<dyn EmployeeDirectory>)
    }

    #[tokio::test]
    async fn test_list_preserves_upstream_order() {
        let employees = vec![employee("B", 1), employee("A", 2), employee("C", 3)];
        let directory = Arc::new(FakeDirectory::with(employees.clone()));

        assert_eq!(aggregator(&directory).list_all().await.unwrap(), employees);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let directory = Arc::new(FakeDirectory::with(vec![
            employee("John Doe", 1),
            employee("john smith", 2),
            employee("Jonathan", 3),
            employee("Elton JOHNson", 4),
        ]));

        let names: Vec<String> = aggregator(&directory)
            .search_by_name("john")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_name)
            .collect();

        assert_eq!(names, vec!["John Doe", "john smith", "Elton JOHNson"]);
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty() {
        let directory = Arc::new(FakeDirectory::with(vec![employee("John Doe", 1)]));
        assert!(
            aggregator(&directory)
                .search_by_name("zelda")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_nameless_record_skipped_by_search_only() {
        let directory = Arc::new(FakeDirectory::with(vec![
            employee("John Doe", 100_000),
            employee("", 900_000),
        ]));
        let aggregator = aggregator(&directory);

        let matches = aggregator.search_by_name("").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].employee_name, "John Doe");

        assert_eq!(aggregator.highest_salary().await.unwrap(), 900_000);
        assert_eq!(
            aggregator.top_ten_earners().await.unwrap(),
            vec!["", "John Doe"]
        );
    }

    #[tokio::test]
    async fn test_highest_salary() {
        let directory = Arc::new(FakeDirectory::with(vec![
            employee("A", 100_000),
            employee("B", 150_000),
        ]));
        assert_eq!(aggregator(&directory).highest_salary().await.unwrap(), 150_000);

        let empty = Arc::new(FakeDirectory::default());
        assert_eq!(aggregator(&empty).highest_salary().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_ten_of_twelve() {
        let employees = (0..12)
            .map(|i| employee(&format!("Employee {}", i), 100_000 + i * 10_000))
            .collect();
        let directory = Arc::new(FakeDirectory::with(employees));

        let names = aggregator(&directory).top_ten_earners().await.unwrap();

        let expected: Vec<String> = (2..12).rev().map(|i| format!("Employee {}", i)).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names, expected);
    }

    #[test]
    fn test_top_earners_ties_keep_upstream_order() {
        let employees = vec![
            employee("first", 50),
            employee("second", 70),
            employee("third", 50),
            employee("fourth", 70),
        ];

        assert_eq!(
            top_earner_names(employees, TOP_EARNER_COUNT),
            vec!["second", "fourth", "first", "third"]
        );
    }

    #[test]
    fn test_top_earners_fewer_than_ten() {
        let names = top_earner_names(vec![employee("a", 1), employee("b", 2)], TOP_EARNER_COUNT);
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let directory = Arc::new(FakeDirectory {
            fail_list: true,
            ..FakeDirectory::default()
        });

        let err = aggregator(&directory).top_ten_earners().await.unwrap_err();
        assert!(matches!(err, Error::Overloaded { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let known = employee("Ada", 10);
        let directory = Arc::new(FakeDirectory::with(vec![known.clone()]));
        let aggregator = aggregator(&directory);

        assert_eq!(
            aggregator.get_by_id(known.id).await.unwrap(),
            Lookup::Found(known)
        );
        assert_eq!(
            aggregator.get_by_id(Uuid::new_v4()).await.unwrap(),
            Lookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_create_rejects_zero_salary_before_upstream() {
        let directory = Arc::new(FakeDirectory::default());
        let input = CreateEmployeeInput {
            name: "Ada".to_string(),
            salary: 0,
            age: 30,
            title: "Analyst".to_string(),
        };

        let err = aggregator(&directory).create(&input).await.unwrap_err();

        assert!(matches!(err, Error::Validation(ref v) if v[0].field == "salary"));
        assert_eq!(directory.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_valid_input() {
        let directory = Arc::new(FakeDirectory::default());
        let input = CreateEmployeeInput {
            name: "Ada".to_string(),
            salary: 10,
            age: 30,
            title: "Analyst".to_string(),
        };

        match aggregator(&directory).create(&input).await.unwrap() {
            Creation::Created(employee) => assert_eq!(employee.employee_name, "Ada"),
            Creation::NotCreated => panic!("expected Created"),
        }
        assert_eq!(directory.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_malformed_record_is_not_created() {
        let directory = Arc::new(FakeDirectory {
            malformed_create: true,
            ..FakeDirectory::default()
        });
        let input = CreateEmployeeInput {
            name: "Ada".to_string(),
            salary: 10,
            age: 30,
            title: "Analyst".to_string(),
        };

        assert_eq!(
            aggregator(&directory).create(&input).await.unwrap(),
            Creation::NotCreated
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id_issues_no_delete() {
        let directory = Arc::new(FakeDirectory::with(vec![employee("Ada", 10)]));

        let outcome = aggregator(&directory)
            .delete_by_id(Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome, Deletion::NotFound);
        assert!(!outcome.is_deleted());
        assert_eq!(directory.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_known_id_deletes_by_name() {
        let target = employee("Ada", 10);
        let directory = Arc::new(FakeDirectory::with(vec![target.clone(), employee("Bob", 5)]));

        let outcome = aggregator(&directory).delete_by_id(target.id).await.unwrap();

        assert!(outcome.is_deleted());
        assert_eq!(directory.deletes.load(Ordering::SeqCst), 1);
        let remaining = directory.employees.lock().unwrap().clone();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].employee_name, "Bob");
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let target = employee("Ada", 10);
        let directory = Arc::new(FakeDirectory {
            employees: Mutex::new(vec![target.clone()]),
            fail_delete: true,
            ..FakeDirectory::default()
        });

        let outcome = aggregator(&directory).delete_by_id(target.id).await.unwrap();

        assert_eq!(outcome, Deletion::Failed);
        assert_eq!(directory.deletes.load(Ordering::SeqCst), 1);
    }
}
