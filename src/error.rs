//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing employees and
//! salary records.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Per-field validation messages collected while checking an input.
///
/// Only the first message recorded for a field is kept, so callers can run
/// every rule without worrying about duplicates.
///
/// # Example
///
/// ```
/// use payroll_engine::error::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("month", "Month must be between 1 and 12");
/// assert_eq!(errors.get("month"), Some("Month must be between 1 and 12"));
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates an empty set of validation errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single field error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a message for a field unless one is already present.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Returns true if no field failed validation.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns all field messages ordered by field name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Converts the collected errors into a result.
    pub fn into_result(self) -> PayrollResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PayrollError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// The main error type for the Payroll Engine.
///
/// Every service operation returns this error type. `NotFound` is used both
/// for targets that do not exist and for targets owned by another account,
/// so callers cannot probe for foreign records.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// No valid acting account was supplied.
    #[error("Authentication required")]
    Unauthorized,

    /// The target does not exist or belongs to another account.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A uniqueness rule would be violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting state.
        message: String,
    },

    /// The input failed shape or range validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The storage layer failed unexpectedly.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl PayrollError {
    /// Creates a `NotFound` error for an employee.
    pub fn employee_not_found(id: impl ToString) -> Self {
        PayrollError::NotFound {
            entity: "Employee",
            id: id.to_string(),
        }
    }

    /// Creates a `NotFound` error for a salary record.
    pub fn salary_record_not_found(id: impl ToString) -> Self {
        PayrollError::NotFound {
            entity: "Salary record",
            id: id.to_string(),
        }
    }

    /// Creates a `Conflict` error.
    pub fn conflict(message: impl Into<String>) -> Self {
        PayrollError::Conflict {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
