// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Input checks for employee creation

use employee_api::CreateEmployeeInput;

use crate::error::{Error, FieldViolation, Result};

/// Youngest age accepted on creation
pub const MIN_AGE: i32 = 16;

/// Oldest age accepted on creation
pub const MAX_AGE: i32 = 75;

/// Check every constraint, reporting all violations at once
pub fn validate_create(input: &CreateEmployeeInput) -> Result<()> {
    let mut violations = Vec::new();

    if input.name.trim().is_empty() {
        violations.push(FieldViolation {
            field: "name",
            message: "Name cannot be blank",
        });
    }
    if input.salary <= 0 {
        violations.push(FieldViolation {
            field: "salary",
            message: "Salary must be greater than zero",
        });
    }
    if input.age < MIN_AGE {
        violations.push(FieldViolation {
            field: "age",
            message: "Age must be at least 16",
        });
    } else if input.age > MAX_AGE {
        violations.push(FieldViolation {
            field: "age",
            message: "Age cannot be greater than 75",
        });
    }
    if input.title.trim().is_empty() {
        violations.push(FieldViolation {
            field: "title",
            message: "Title cannot be blank",
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}
