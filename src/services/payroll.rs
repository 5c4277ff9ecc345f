//! Salary record lifecycle.
//!
//! Records are created as `DRAFT` with a snapshot of the employee's basic
//! salary, edited and recalculated while in use, approved, and finally
//! deleted if needed. Every operation resolves the acting account first and
//! scopes all reads and writes to it.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::{AccountService, ScopeGuard};
use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AccountContext, AccountId, DashboardStats, NewSalaryRecord, Period, SalaryRecord,
    SalaryRecordFilter, SalaryRecordPatch, SalaryRecordView, SalaryStatus,
};
use crate::repository::{EmployeeRepository, Repositories, SalaryRecordRepository};
use crate::validation::{
    validate_new_salary_record, validate_salary_record_filter,
    validate_salary_record_patch,
};

/// Manages salary records for the acting account.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::repository::Repositories;
/// use payroll_engine::services::PayrollService;
///
/// let service = PayrollService::new(Repositories::in_memory(), Arc::new(PayrollConfig::default()));
/// # let _ = service;
/// ```
#[derive(Clone)]
pub struct PayrollService {
    pub(super) accounts: AccountService,
    pub(super) guard: ScopeGuard,
    pub(super) employees: Arc<dyn EmployeeRepository>,
    pub(super) salary_records: Arc<dyn SalaryRecordRepository>,
    pub(super) config: Arc<PayrollConfig>,
}

impl PayrollService {
    /// Creates the service over a set of repositories.
    pub fn new(repos: Repositories, config: Arc<PayrollConfig>) -> Self {
        Self {
            accounts: AccountService::new(repos.accounts),
            guard: ScopeGuard::new(repos.employees.clone(), repos.salary_records.clone()),
            employees: repos.employees,
            salary_records: repos.salary_records,
            config,
        }
    }

    /// Creates a `DRAFT` salary record for an employee of the acting account.
    ///
    /// The employee's current basic salary is copied into the record and the
    /// stored total is the net salary.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` without a valid acting account
    /// - `Validation` for out-of-range inputs
    /// - `NotFound` if the employee is missing or foreign
    /// - `Conflict` if the employee already has a record for the period,
    ///   including when a concurrent request inserted it first
    pub async fn create_salary_record(
        &self,
        ctx: &AccountContext,
        input: NewSalaryRecord,
    ) -> PayrollResult<SalaryRecord> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_new_salary_record(&input, &self.config.validation)?;

        let employee = self
            .guard
            .assert_owns_employee(account_id, input.employee_id)
            .await?;
        let period = input.period();
        self.guard
            .assert_no_existing_record(employee.id, period)
            .await
            .inspect_err(|_| {
                warn!(employee_id = %employee.id, period = %period.label(), "Duplicate salary record")
            })?;

        let inputs = input.inputs(employee.basic_salary);
        let record = SalaryRecord::draft(employee.id, period, inputs, input.notes);
        self.salary_records.insert(&record).await?;

        info!(
            %account_id,
            record_id = %record.id,
            employee_id = %employee.id,
            period = %period.label(),
            total_salary = %record.total_salary,
            "Salary record created"
        );
        Ok(record)
    }

    /// Applies a partial update and recalculates the total.
    ///
    /// The basic salary snapshot stored on the record is kept as is.
    pub async fn update_salary_record(
        &self,
        ctx: &AccountContext,
        record_id: Uuid,
        patch: SalaryRecordPatch,
    ) -> PayrollResult<SalaryRecord> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_salary_record_patch(&patch, &self.config.validation)?;

        let (mut record, _) = self.guard.owned_record(account_id, record_id).await?;
        record.apply(patch);
        self.salary_records.update(&record).await?;

        info!(
            %account_id,
            %record_id,
            total_salary = %record.total_salary,
            "Salary record updated"
        );
        Ok(record)
    }

    /// Marks a record `APPROVED` and stamps its processing time.
    pub async fn approve_salary_record(
        &self,
        ctx: &AccountContext,
        record_id: Uuid,
    ) -> PayrollResult<SalaryRecord> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let (mut record, _) = self.guard.owned_record(account_id, record_id).await?;

        if record.status == SalaryStatus::Paid {
            warn!(%account_id, %record_id, "Approving a salary record that is already paid");
        }
        record.approve();
        self.salary_records.update(&record).await?;

        info!(%account_id, %record_id, "Salary record approved");
        Ok(record)
    }

    /// Permanently removes a record of the acting account.
    pub async fn delete_salary_record(
        &self,
        ctx: &AccountContext,
        record_id: Uuid,
    ) -> PayrollResult<()> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        self.guard.owned_record(account_id, record_id).await?;

        if !self.salary_records.delete_owned(account_id, record_id).await? {
            return Err(PayrollError::salary_record_not_found(record_id));
        }

        info!(%account_id, %record_id, "Salary record deleted");
        Ok(())
    }

    /// Lists the acting account's records with employee summaries and
    /// calculated totals.
    ///
    /// Ordered by year and month, newest first, then by employee name.
    pub async fn list_salary_records(
        &self,
        ctx: &AccountContext,
        filter: &SalaryRecordFilter,
    ) -> PayrollResult<Vec<SalaryRecordView>> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_salary_record_filter(filter, &self.config.validation)?;
        self.list_for_account(account_id, filter).await
    }

    /// Aggregates payroll figures for a period, defaulting to the current one.
    ///
    /// `pending_approvals` counts every `DRAFT` record of the account
    /// regardless of period, and `active_employees` counts employees with at
    /// least one record.
    ///
    /// Only a month or year the caller supplied is validated; the current
    /// period used as the default is not checked against the year bounds.
    pub async fn dashboard_stats(
        &self,
        ctx: &AccountContext,
        month: Option<u32>,
        year: Option<i32>,
    ) -> PayrollResult<DashboardStats> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        let supplied = SalaryRecordFilter {
            month,
            year,
            ..Default::default()
        };
        validate_salary_record_filter(&supplied, &self.config.validation)?;
        let current = Period::current();
        let period = Period::new(month.unwrap_or(current.month), year.unwrap_or(current.year));

        let all = self
            .salary_records
            .list(account_id, &SalaryRecordFilter::default())
            .await?;

        let in_period: Vec<&SalaryRecord> = all
            .iter()
            .map(|(record, _)| record)
            .filter(|record| record.period() == period)
            .collect();
        let total_payroll: Decimal = in_period.iter().map(|record| record.total_salary).sum();
        let pending_approvals = all
            .iter()
            .filter(|(record, _)| record.status == SalaryStatus::Draft)
            .count();
        let active_employees = all
            .iter()
            .map(|(record, _)| record.employee_id)
            .collect::<HashSet<_>>()
            .len();

        Ok(DashboardStats {
            period,
            total_records: in_period.len() as u64,
            total_payroll,
            pending_approvals: pending_approvals as u64,
            active_employees: active_employees as u64,
        })
    }

    pub(super) async fn list_for_account(
        &self,
        account_id: AccountId,
        filter: &SalaryRecordFilter,
    ) -> PayrollResult<Vec<SalaryRecordView>> {
        let mut rows = self.salary_records.list(account_id, filter).await?;
        rows.sort_by(|(a, a_employee), (b, b_employee)| {
            b.period()
                .cmp(&a.period())
                .then_with(|| a_employee.name.cmp(&b_employee.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(rows
            .into_iter()
            .map(|(record, employee)| SalaryRecordView::new(record, &employee))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, NewAccount, NewEmployee, Patch};
    use crate::repository::InMemoryStore;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Fixture {
        service: PayrollService,
        store: InMemoryStore,
        ctx: AccountContext,
        account_id: AccountId,
    }

    async fn setup() -> Fixture {
        setup_with(PayrollConfig::default()).await
    }

    async fn setup_with(config: PayrollConfig) -> Fixture {
        let store = InMemoryStore::new();
        let service = PayrollService::new(Repositories::from_store(store.clone()), Arc::new(config));
        let account = service
            .accounts
            .register(NewAccount {
                name: "Acme HR".to_string(),
                email: "admin@acme.com".to_string(),
            })
            .await
            .unwrap();
        Fixture {
            service,
            store,
            ctx: AccountContext::for_account(account.id),
            account_id: account.id,
        }
    }

    async fn add_employee(
        fixture: &Fixture,
        account_id: AccountId,
        code: &str,
        name: &str,
        salary: &str,
    ) -> Employee {
        let employee = Employee::create(
            account_id,
            NewEmployee {
                employee_code: code.to_string(),
                name: name.to_string(),
                email: None,
                joining_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                basic_salary: dec(salary),
                department: Some("Engineering".to_string()),
                position: None,
                is_active: true,
            },
        );
        EmployeeRepository::insert(&fixture.store, &employee)
            .await
            .unwrap();
        employee
    }

    fn june(employee: &Employee) -> NewSalaryRecord {
        NewSalaryRecord::new(employee.id, 6, 2024)
    }

    #[tokio::test]
    async fn test_create_calculates_total_as_net() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;

        let mut input = june(&employee);
        input.bonus = Some(dec("2000"));
        input.deductions = Some(dec("800"));
        let record = fixture
            .service
            .create_salary_record(&fixture.ctx, input)
            .await
            .unwrap();

        assert_eq!(record.total_salary, dec("76200"));
        assert_eq!(record.basic_salary, dec("75000"));
        assert_eq!(record.status, SalaryStatus::Draft);
        assert_eq!(record.processed_at, None);
    }

    #[tokio::test]
    async fn test_second_record_for_same_period_conflicts() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;

        fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await
            .unwrap();
        let result = fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await;
        assert!(matches!(result, Err(PayrollError::Conflict { .. })));

        let july = NewSalaryRecord::new(employee.id, 7, 2024);
        assert!(
            fixture
                .service
                .create_salary_record(&fixture.ctx, july)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_one_record() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;

        let (first, second) = tokio::join!(
            fixture
                .service
                .create_salary_record(&fixture.ctx, june(&employee)),
            fixture
                .service
                .create_salary_record(&fixture.ctx, june(&employee)),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(
            [first, second]
                .into_iter()
                .any(|r| matches!(r, Err(PayrollError::Conflict { .. })))
        );

        let records = fixture
            .service
            .list_salary_records(&fixture.ctx, &SalaryRecordFilter::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_lookup() {
        let fixture = setup().await;
        let mut input = NewSalaryRecord::new(Uuid::new_v4(), 13, 2019);
        input.bonus = Some(dec("-1"));

        match fixture
            .service
            .create_salary_record(&fixture.ctx, input)
            .await
        {
            Err(PayrollError::Validation(errors)) => {
                assert!(errors.get("month").is_some());
                assert!(errors.get("year").is_some());
                assert!(errors.get("bonus").is_some());
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_without_account() {
        let fixture = setup().await;
        let result = fixture
            .service
            .list_salary_records(&AccountContext::anonymous(), &SalaryRecordFilter::default())
            .await;
        assert!(matches!(result, Err(PayrollError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_foreign_targets_are_not_found() {
        let fixture = setup().await;
        let other = fixture
            .service
            .accounts
            .register(NewAccount {
                name: "Globex".to_string(),
                email: "hr@globex.com".to_string(),
            })
            .await
            .unwrap();
        let foreign = add_employee(&fixture, other.id, "EMP001", "Hank Scorpio", "90000").await;
        let other_ctx = AccountContext::for_account(other.id);
        let record = fixture
            .service
            .create_salary_record(&other_ctx, june(&foreign))
            .await
            .unwrap();

        let svc = &fixture.service;
        let ctx = &fixture.ctx;
        assert!(matches!(
            svc.create_salary_record(ctx, june(&foreign)).await,
            Err(PayrollError::NotFound { .. })
        ));
        assert!(matches!(
            svc.update_salary_record(ctx, record.id, SalaryRecordPatch::default())
                .await,
            Err(PayrollError::NotFound { .. })
        ));
        assert!(matches!(
            svc.approve_salary_record(ctx, record.id).await,
            Err(PayrollError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_salary_record(ctx, record.id).await,
            Err(PayrollError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_salary_record(ctx, Uuid::new_v4()).await,
            Err(PayrollError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_snapshot_when_employee_salary_changes() {
        let fixture = setup().await;
        let mut employee =
            add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;
        let record = fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await
            .unwrap();

        employee.basic_salary = dec("90000");
        EmployeeRepository::update(&fixture.store, &employee)
            .await
            .unwrap();

        let updated = fixture
            .service
            .update_salary_record(
                &fixture.ctx,
                record.id,
                SalaryRecordPatch {
                    bonus: Patch::Set(dec("1000")),
                    notes: Patch::Set(Some("Q2 bonus".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.basic_salary, dec("75000"));
        assert_eq!(updated.total_salary, dec("76000"));
        assert_eq!(updated.notes.as_deref(), Some("Q2 bonus"));
    }

    #[tokio::test]
    async fn test_approve_sets_status_and_processed_at() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;
        let record = fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await
            .unwrap();
        assert!(record.processed_at.is_none());

        let approved = fixture
            .service
            .approve_salary_record(&fixture.ctx, record.id)
            .await
            .unwrap();
        assert_eq!(approved.status, SalaryStatus::Approved);
        assert!(approved.processed_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "75000").await;
        let record = fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await
            .unwrap();

        fixture
            .service
            .delete_salary_record(&fixture.ctx, record.id)
            .await
            .unwrap();
        assert!(matches!(
            fixture
                .service
                .delete_salary_record(&fixture.ctx, record.id)
                .await,
            Err(PayrollError::NotFound { .. })
        ));
        assert!(
            fixture
                .service
                .create_salary_record(&fixture.ctx, june(&employee))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_list_orders_newest_period_then_name() {
        let fixture = setup().await;
        let zoe = add_employee(&fixture, fixture.account_id, "EMP001", "Zoe Adams", "5000").await;
        let amy = add_employee(&fixture, fixture.account_id, "EMP002", "Amy Baker", "6000").await;
        let svc = &fixture.service;
        let ctx = &fixture.ctx;

        for (employee, month, year) in [(&zoe, 5, 2024), (&amy, 5, 2024), (&zoe, 1, 2025)] {
            svc.create_salary_record(ctx, NewSalaryRecord::new(employee.id, month, year))
                .await
                .unwrap();
        }

        let views = svc
            .list_salary_records(ctx, &SalaryRecordFilter::default())
            .await
            .unwrap();
        let order: Vec<(i32, u32, &str)> = views
            .iter()
            .map(|v| (v.record.year, v.record.month, v.employee.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (2025, 1, "Zoe Adams"),
                (2024, 5, "Amy Baker"),
                (2024, 5, "Zoe Adams"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_annotates_calculated_totals() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "5000").await;
        let mut input = june(&employee);
        input.allowances = Some(dec("200"));
        input.overtime_hours = Some(dec("10"));
        input.overtime_rate = Some(dec("30"));
        input.deductions = Some(dec("100"));
        fixture
            .service
            .create_salary_record(&fixture.ctx, input)
            .await
            .unwrap();

        let views = fixture
            .service
            .list_salary_records(&fixture.ctx, &SalaryRecordFilter::for_period(Period::new(6, 2024)))
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].gross_salary, dec("5500"));
        assert_eq!(views[0].total_deductions, dec("100"));
        assert_eq!(views[0].net_salary, dec("5400"));
        assert_eq!(views[0].employee.employee_code, "EMP001");
    }

    #[tokio::test]
    async fn test_list_filters_department_by_substring() {
        let fixture = setup().await;
        let employee = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "5000").await;
        fixture
            .service
            .create_salary_record(&fixture.ctx, june(&employee))
            .await
            .unwrap();

        let matching = SalaryRecordFilter {
            department: Some("Engineer".to_string()),
            ..Default::default()
        };
        let other = SalaryRecordFilter {
            department: Some("engineering".to_string()),
            ..Default::default()
        };
        let svc = &fixture.service;
        assert_eq!(svc.list_salary_records(&fixture.ctx, &matching).await.unwrap().len(), 1);
        assert!(svc.list_salary_records(&fixture.ctx, &other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let fixture = setup().await;
        let first = add_employee(&fixture, fixture.account_id, "EMP001", "John Smith", "5000").await;
        let second = add_employee(&fixture, fixture.account_id, "EMP002", "Jane Smith", "7000").await;
        add_employee(&fixture, fixture.account_id, "EMP003", "Idle Person", "9000").await;
        let svc = &fixture.service;
        let ctx = &fixture.ctx;

        let old = svc
            .create_salary_record(ctx, NewSalaryRecord::new(first.id, 1, 2024))
            .await
            .unwrap();
        svc.approve_salary_record(ctx, old.id).await.unwrap();
        svc.create_salary_record(ctx, NewSalaryRecord::new(first.id, 2, 2024))
            .await
            .unwrap();
        svc.create_salary_record(ctx, NewSalaryRecord::new(second.id, 2, 2024))
            .await
            .unwrap();
        svc.create_salary_record(ctx, NewSalaryRecord::new(second.id, 3, 2024))
            .await
            .unwrap();

        let stats = svc.dashboard_stats(ctx, Some(2), Some(2024)).await.unwrap();
        assert_eq!(stats.period, Period::new(2, 2024));
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_payroll, dec("12000"));
        assert_eq!(stats.pending_approvals, 3);
        assert_eq!(stats.active_employees, 2);
    }

    #[tokio::test]
    async fn test_dashboard_stats_default_to_current_period() {
        let fixture = setup().await;
        let stats = fixture
            .service
            .dashboard_stats(&fixture.ctx, None, None)
            .await
            .unwrap();
        assert_eq!(stats.period, Period::current());
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.total_payroll, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_dashboard_stats_default_period_ignores_year_bounds() {
        let mut config = PayrollConfig::default();
        config.validation.min_year = 2000;
        config.validation.max_year = Period::current().year - 1;
        let fixture = setup_with(config).await;

        let stats = fixture
            .service
            .dashboard_stats(&fixture.ctx, None, None)
            .await
            .unwrap();
        assert_eq!(stats.period, Period::current());

        let result = fixture
            .service
            .dashboard_stats(&fixture.ctx, None, Some(Period::current().year))
            .await;
        assert!(matches!(result, Err(PayrollError::Validation(_))));
    }

    #[tokio::test]
    async fn test_dashboard_stats_rejects_supplied_month_out_of_range() {
        let fixture = setup().await;
        let result = fixture
            .service
            .dashboard_stats(&fixture.ctx, Some(13), None)
            .await;
        assert!(matches!(result, Err(PayrollError::Validation(_))));
    }
}
