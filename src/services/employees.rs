//! Employee directory operations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::AccountService;
use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AccountContext, AccountId, Employee, EmployeeFilter, EmployeePage, EmployeePatch,
    EmployeeStats, EmployeeSummary, NewEmployee, Pagination, SortOrder,
};
use crate::repository::EmployeeRepository;
use crate::validation::{validate_employee_filter, validate_employee_patch, validate_new_employee};

const RECENT_JOIN_DAYS: i64 = 30;

/// Creates, updates, lists and soft-deletes the employees of an account.
#[derive(Clone)]
pub struct EmployeeService {
    accounts: AccountService,
    employees: Arc<dyn EmployeeRepository>,
    config: Arc<PayrollConfig>,
}

impl EmployeeService {
    /// Creates the service.
    pub fn new(
        accounts: AccountService,
        employees: Arc<dyn EmployeeRepository>,
        config: Arc<PayrollConfig>,
    ) -> Self {
        Self {
            accounts,
            employees,
            config,
        }
    }

    /// Adds an employee to the acting account.
    ///
    /// # Errors
    ///
    /// `Conflict` if the employee code or email is already used within the
    /// account.
    pub async fn create(&self, ctx: &AccountContext, input: NewEmployee) -> PayrollResult<Employee> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_new_employee(&input, &self.config.validation)?;

        let employee = Employee::create(account_id, input);
        self.ensure_unique(account_id, &employee).await?;
        self.employees.insert(&employee).await?;

        info!(
            %account_id,
            employee_id = %employee.id,
            employee_code = %employee.employee_code,
            "Employee created"
        );
        Ok(employee)
    }

    /// Returns an employee of the acting account.
    pub async fn get(&self, ctx: &AccountContext, id: Uuid) -> PayrollResult<Employee> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        self.find_owned(account_id, id).await
    }

    /// Applies a partial update to an employee.
    ///
    /// Existing salary records keep their basic salary snapshot.
    pub async fn update(
        &self,
        ctx: &AccountContext,
        id: Uuid,
        patch: EmployeePatch,
    ) -> PayrollResult<Employee> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_employee_patch(&patch, &self.config.validation)?;

        let mut employee = self.find_owned(account_id, id).await?;
        employee.apply(patch);
        self.ensure_unique(account_id, &employee).await?;
        self.employees.update(&employee).await?;

        info!(%account_id, employee_id = %employee.id, "Employee updated");
        Ok(employee)
    }

    /// Soft-deletes an employee by clearing its active flag.
    pub async fn deactivate(&self, ctx: &AccountContext, id: Uuid) -> PayrollResult<Employee> {
        self.set_active(ctx, id, false).await
    }

    /// Restores a soft-deleted employee.
    pub async fn restore(&self, ctx: &AccountContext, id: Uuid) -> PayrollResult<Employee> {
        self.set_active(ctx, id, true).await
    }

    /// Lists a page of the acting account's employees.
    pub async fn list(
        &self,
        ctx: &AccountContext,
        filter: &EmployeeFilter,
    ) -> PayrollResult<EmployeePage> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let listing = self.config.listing;
        validate_employee_filter(filter, &listing)?;

        let page = filter.page.unwrap_or(1);
        let limit = filter.limit.unwrap_or(listing.default_page_size);

        let mut employees: Vec<Employee> = self
            .employees
            .list_by_account(account_id)
            .await?
            .into_iter()
            .filter(|employee| filter.matches(employee))
            .collect();
        employees.sort_by(|a, b| {
            let ordering = filter.sort_by.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_count = employees.len() as u64;
        let offset = (page as usize - 1).saturating_mul(limit as usize);
        let employees = employees
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok(EmployeePage {
            employees,
            pagination: Pagination::new(page, limit, total_count),
        })
    }

    /// Returns the active employees of the acting account ordered by name.
    pub async fn active_summaries(&self, ctx: &AccountContext) -> PayrollResult<Vec<EmployeeSummary>> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let mut employees: Vec<Employee> = self
            .employees
            .list_by_account(account_id)
            .await?
            .into_iter()
            .filter(|employee| employee.is_active)
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees.iter().map(Employee::summary).collect())
    }

    /// Computes head-count statistics for the acting account.
    pub async fn stats(&self, ctx: &AccountContext) -> PayrollResult<EmployeeStats> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let employees = self.employees.list_by_account(account_id).await?;

        let cutoff = Utc::now().date_naive() - Duration::days(RECENT_JOIN_DAYS);
        let (active, inactive): (Vec<&Employee>, Vec<&Employee>) =
            employees.iter().partition(|employee| employee.is_active);

        let average_salary = if active.is_empty() {
            Decimal::ZERO
        } else {
            let total: Decimal = active.iter().map(|employee| employee.basic_salary).sum();
            (total / Decimal::from(active.len() as u64)).round_dp(2)
        };

        Ok(EmployeeStats {
            total_active: active.len() as u64,
            total_inactive: inactive.len() as u64,
            total_employees: employees.len() as u64,
            average_salary,
            recent_joins: employees
                .iter()
                .filter(|employee| employee.joining_date >= cutoff)
                .count() as u64,
        })
    }

    async fn set_active(
        &self,
        ctx: &AccountContext,
        id: Uuid,
        active: bool,
    ) -> PayrollResult<Employee> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let mut employee = self.find_owned(account_id, id).await?;
        if employee.is_active != active {
            employee.is_active = active;
            employee.updated_at = Utc::now();
            self.employees.update(&employee).await?;
        }

        info!(%account_id, employee_id = %id, active, "Employee active flag set");
        Ok(employee)
    }

    async fn find_owned(&self, account_id: AccountId, id: Uuid) -> PayrollResult<Employee> {
        self.employees
            .find_owned(account_id, id)
            .await?
            .ok_or_else(|| PayrollError::employee_not_found(id))
    }

    async fn ensure_unique(&self, account_id: AccountId, employee: &Employee) -> PayrollResult<()> {
        if let Some(other) = self
            .employees
            .find_by_code(account_id, &employee.employee_code)
            .await?
        {
            if other.id != employee.id {
                warn!(%account_id, employee_code = %employee.employee_code, "Duplicate employee code");
                return Err(PayrollError::conflict("Employee ID already exists"));
            }
        }
        if let Some(email) = &employee.email {
            if let Some(other) = self.employees.find_by_email(account_id, email).await? {
                if other.id != employee.id {
                    warn!(%account_id, "Duplicate employee email");
                    return Err(PayrollError::conflict("Email already exists"));
                }
            }
        }
        Ok(())
    }
}
