//! Storage failures and their mapping into [`PayrollError`].

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::error::PayrollError;

/// Unique constraint on `email` of accounts.
pub const ACCOUNT_EMAIL_KEY: &str = "accounts_email_key";
/// Unique constraint on `(account_id, employee_code)` of employees.
pub const EMPLOYEE_CODE_KEY: &str = "employees_account_code_key";
/// Unique constraint on `(account_id, email)` of employees.
pub const EMPLOYEE_EMAIL_KEY: &str = "employees_account_email_key";
/// Unique constraint on `(employee_id, month, year)` of salary records.
pub const SALARY_PERIOD_KEY: &str = "salary_records_employee_period_key";

/// Errors raised by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A write would duplicate a unique key.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
    },

    /// A write references a row that does not exist.
    #[error("foreign key violated: {constraint}")]
    ForeignKeyViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
    },

    /// An update targeted a row that does not exist.
    #[error("{table} row missing: {id}")]
    RowMissing {
        /// Table the row was expected in.
        table: &'static str,
        /// Primary key of the row.
        id: Uuid,
    },

    /// The backing store could not serve the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return StorageError.
pub type StorageResult<T> = Result<T, StorageError>;

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        ACCOUNT_EMAIL_KEY => "An account with this email already exists",
        EMPLOYEE_CODE_KEY => "Employee ID already exists",
        EMPLOYEE_EMAIL_KEY => "Email already exists",
        SALARY_PERIOD_KEY => "Salary record already exists for this month/year",
        _ => "Duplicate entry",
    }
}

impl From<StorageError> for PayrollError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { constraint } => {
                PayrollError::conflict(conflict_message(constraint))
            }
            StorageError::RowMissing { table, id } => PayrollError::NotFound {
                entity: match table {
                    "employees" => "Employee",
                    "salary_records" => "Salary record",
                    _ => "Account",
                },
                id: id.to_string(),
            },
            other => {
                error!(error = %other, "Storage failure");
                PayrollError::Storage {
                    message: other.to_string(),
                }
            }
        }
    }
}
