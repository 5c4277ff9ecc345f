//! Ownership and uniqueness checks shared by the payroll operations.
//!
//! The guard only reads. A target that does not exist and a target owned by
//! another account produce the same `NotFound`.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AccountId, Employee, Period, SalaryRecord};
use crate::repository::{EmployeeRepository, SalaryRecordRepository};

/// Read-only scoping checks over the employee and salary record stores.
#[derive(Clone)]
pub struct ScopeGuard {
    employees: Arc<dyn EmployeeRepository>,
    salary_records: Arc<dyn SalaryRecordRepository>,
}

impl ScopeGuard {
    /// Creates a guard over the given repositories.
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        salary_records: Arc<dyn SalaryRecordRepository>,
    ) -> Self {
        Self {
            employees,
            salary_records,
        }
    }

    /// Returns the employee if it belongs to `account_id`.
    pub async fn assert_owns_employee(
        &self,
        account_id: AccountId,
        employee_id: Uuid,
    ) -> PayrollResult<Employee> {
        self.employees
            .find_owned(account_id, employee_id)
            .await?
            .ok_or_else(|| PayrollError::employee_not_found(employee_id))
    }

    /// Fails with `Conflict` if the employee already has a record for `period`.
    ///
    /// This is a fast path only; the store's unique constraint decides races.
    pub async fn assert_no_existing_record(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> PayrollResult<()> {
        match self.salary_records.find_by_period(employee_id, period).await? {
            Some(_) => Err(PayrollError::conflict(
                "Salary record already exists for this month/year",
            )),
            None => Ok(()),
        }
    }

    /// Returns the record and its employee if the employee belongs to `account_id`.
    pub async fn owned_record(
        &self,
        account_id: AccountId,
        record_id: Uuid,
    ) -> PayrollResult<(SalaryRecord, Employee)> {
        self.salary_records
            .find_owned(account_id, record_id)
            .await?
            .ok_or_else(|| PayrollError::salary_record_not_found(record_id))
    }
}
