//! In-memory storage backend.
//!
//! All three repository traits are implemented over one [`StoreState`]
//! behind a `tokio::sync::RwLock`. Every uniqueness check and the write it
//! guards happen under the same write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{
    ACCOUNT_EMAIL_KEY, EMPLOYEE_CODE_KEY, EMPLOYEE_EMAIL_KEY, SALARY_PERIOD_KEY, StorageError,
    StorageResult,
};
use super::{AccountRepository, EmployeeRepository, SalaryRecordRepository};
use crate::models::{
    Account, AccountId, Employee, Period, SalaryRecord, SalaryRecordFilter,
};

type PeriodKey = (Uuid, i32, u32);

fn period_key(employee_id: Uuid, period: Period) -> PeriodKey {
    (employee_id, period.year, period.month)
}

#[derive(Debug, Default)]
struct StoreState {
    accounts: HashMap<AccountId, Account>,
    employees: HashMap<Uuid, Employee>,
    salary_records: HashMap<Uuid, SalaryRecord>,
    periods: HashMap<PeriodKey, Uuid>,
}

impl StoreState {
    fn check_employee_keys(&self, employee: &Employee) -> StorageResult<()> {
        let same_account = self
            .employees
            .values()
            .filter(|e| e.account_id == employee.account_id && e.id != employee.id);

        for other in same_account {
            if other.employee_code == employee.employee_code {
                return Err(StorageError::UniqueViolation {
                    constraint: EMPLOYEE_CODE_KEY,
                });
            }
            if employee.email.is_some() && other.email == employee.email {
                return Err(StorageError::UniqueViolation {
                    constraint: EMPLOYEE_EMAIL_KEY,
                });
            }
        }
        Ok(())
    }

    fn check_record_employee(&self, record: &SalaryRecord) -> StorageResult<()> {
        if self.employees.contains_key(&record.employee_id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKeyViolation {
                constraint: "salary_records_employee_id_fkey",
            })
        }
    }

    fn owned_employee(&self, account_id: AccountId, id: Uuid) -> Option<&Employee> {
        self.employees
            .get(&id)
            .filter(|employee| employee.account_id == account_id)
    }

    fn owned_record(&self, account_id: AccountId, id: Uuid) -> Option<(&SalaryRecord, &Employee)> {
        let record = self.salary_records.get(&id)?;
        let employee = self.owned_employee(account_id, record.employee_id)?;
        Some((record, employee))
    }

    fn put_record(&mut self, record: &SalaryRecord) {
        self.periods
            .insert(period_key(record.employee_id, record.period()), record.id);
        self.salary_records.insert(record.id, record.clone());
    }
}

/// A process-local store for all payroll data.
///
/// Cloning is cheap and every clone shares the same state.
///
/// # Example
///
/// ```
/// use payroll_engine::repository::{InMemoryStore, Repositories};
///
/// let store = InMemoryStore::new();
/// let repos = Repositories::from_store(store.clone());
/// # let _ = repos;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: &Account) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(StorageError::UniqueViolation {
                constraint: ACCOUNT_EMAIL_KEY,
            });
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> StorageResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn insert(&self, employee: &Employee) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&employee.account_id) {
            return Err(StorageError::ForeignKeyViolation {
                constraint: "employees_account_id_fkey",
            });
        }
        state.check_employee_keys(employee)?;
        state.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn find_owned(&self, account_id: AccountId, id: Uuid) -> StorageResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state.owned_employee(account_id, id).cloned())
    }

    async fn find_by_code(
        &self,
        account_id: AccountId,
        code: &str,
    ) -> StorageResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .values()
            .find(|e| e.account_id == account_id && e.employee_code == code)
            .cloned())
    }

    async fn find_by_email(
        &self,
        account_id: AccountId,
        email: &str,
    ) -> StorageResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .values()
            .find(|e| e.account_id == account_id && e.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list_by_account(&self, account_id: AccountId) -> StorageResult<Vec<Employee>> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .values()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn update(&self, employee: &Employee) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.owned_employee(employee.account_id, employee.id).is_none() {
            return Err(StorageError::RowMissing {
                table: "employees",
                id: employee.id,
            });
        }
        state.check_employee_keys(employee)?;
        state.employees.insert(employee.id, employee.clone());
        Ok(())
    }
}

#[async_trait]
impl SalaryRecordRepository for InMemoryStore {
    async fn insert(&self, record: &SalaryRecord) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.check_record_employee(record)?;
        if state
            .periods
            .contains_key(&period_key(record.employee_id, record.period()))
        {
            return Err(StorageError::UniqueViolation {
                constraint: SALARY_PERIOD_KEY,
            });
        }
        state.put_record(record);
        Ok(())
    }

    async fn insert_if_absent(&self, record: &SalaryRecord) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        state.check_record_employee(record)?;
        if state
            .periods
            .contains_key(&period_key(record.employee_id, record.period()))
        {
            return Ok(false);
        }
        state.put_record(record);
        Ok(true)
    }

    async fn find_owned(
        &self,
        account_id: AccountId,
        id: Uuid,
    ) -> StorageResult<Option<(SalaryRecord, Employee)>> {
        let state = self.state.read().await;
        Ok(state
            .owned_record(account_id, id)
            .map(|(record, employee)| (record.clone(), employee.clone())))
    }

    async fn find_by_period(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> StorageResult<Option<SalaryRecord>> {
        let state = self.state.read().await;
        Ok(state
            .periods
            .get(&period_key(employee_id, period))
            .and_then(|id| state.salary_records.get(id))
            .cloned())
    }

    async fn list(
        &self,
        account_id: AccountId,
        filter: &SalaryRecordFilter,
    ) -> StorageResult<Vec<(SalaryRecord, Employee)>> {
        let state = self.state.read().await;
        Ok(state
            .salary_records
            .values()
            .filter_map(|record| {
                let employee = state.owned_employee(account_id, record.employee_id)?;
                filter
                    .matches(record, employee)
                    .then(|| (record.clone(), employee.clone()))
            })
            .collect())
    }

    async fn update(&self, record: &SalaryRecord) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let Some(existing) = state.salary_records.get(&record.id) else {
            return Err(StorageError::RowMissing {
                table: "salary_records",
                id: record.id,
            });
        };
        if existing.employee_id != record.employee_id || existing.period() != record.period() {
            let old_key = period_key(existing.employee_id, existing.period());
            let new_key = period_key(record.employee_id, record.period());
            if state.periods.contains_key(&new_key) {
                return Err(StorageError::UniqueViolation {
                    constraint: SALARY_PERIOD_KEY,
                });
            }
            state.periods.remove(&old_key);
        }
        state.put_record(record);
        Ok(())
    }

    async fn delete_owned(&self, account_id: AccountId, id: Uuid) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        let key = match state.owned_record(account_id, id) {
            Some((record, _)) => period_key(record.employee_id, record.period()),
            None => return Ok(false),
        };
        state.periods.remove(&key);
        state.salary_records.remove(&id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::SalaryInputs;
    use crate::models::{NewAccount, NewEmployee, SalaryStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    async fn seed_account(store: &InMemoryStore, email: &str) -> Account {
        let account = Account::register(NewAccount {
            name: "Acme HR".to_string(),
            email: email.to_string(),
        });
        AccountRepository::insert(store, &account).await.unwrap();
        account
    }

    fn new_employee(account_id: AccountId, code: &str, email: Option<&str>) -> Employee {
        Employee::create(
            account_id,
            NewEmployee {
                employee_code: code.to_string(),
                name: "John Smith".to_string(),
                email: email.map(str::to_string),
                joining_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                basic_salary: Decimal::new(75000, 0),
                department: Some("Engineering".to_string()),
                position: None,
                is_active: true,
            },
        )
    }

    fn draft(employee: &Employee, month: u32) -> SalaryRecord {
        SalaryRecord::draft(
            employee.id,
            Period::new(month, 2024),
            SalaryInputs::new(employee.basic_salary),
            None,
        )
    }

    #[tokio::test]
    async fn test_duplicate_account_email_is_rejected() {
        let store = InMemoryStore::new();
        seed_account(&store, "admin@acme.com").await;

        let duplicate = Account::register(NewAccount {
            name: "Other".to_string(),
            email: "ADMIN@acme.com".to_string(),
        });
        let result = AccountRepository::insert(&store, &duplicate).await;
        assert_eq!(
            result,
            Err(StorageError::UniqueViolation {
                constraint: ACCOUNT_EMAIL_KEY
            })
        );
    }

    #[tokio::test]
    async fn test_employee_code_unique_per_account_only() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let globex = seed_account(&store, "b@globex.com").await;

        EmployeeRepository::insert(&store, &new_employee(acme.id, "EMP001", None))
            .await
            .unwrap();
        EmployeeRepository::insert(&store, &new_employee(globex.id, "EMP001", None))
            .await
            .unwrap();

        let result =
            EmployeeRepository::insert(&store, &new_employee(acme.id, "EMP001", None)).await;
        assert_eq!(
            result,
            Err(StorageError::UniqueViolation {
                constraint: EMPLOYEE_CODE_KEY
            })
        );
    }

    #[tokio::test]
    async fn test_employee_update_checks_email_excluding_self() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let mut first = new_employee(acme.id, "EMP001", Some("one@acme.com"));
        let second = new_employee(acme.id, "EMP002", Some("two@acme.com"));
        EmployeeRepository::insert(&store, &first).await.unwrap();
        EmployeeRepository::insert(&store, &second).await.unwrap();

        first.name = "Johnny Smith".to_string();
        EmployeeRepository::update(&store, &first).await.unwrap();

        first.email = Some("two@acme.com".to_string());
        let result = EmployeeRepository::update(&store, &first).await;
        assert_eq!(
            result,
            Err(StorageError::UniqueViolation {
                constraint: EMPLOYEE_EMAIL_KEY
            })
        );
    }

    #[tokio::test]
    async fn test_employee_without_account_is_rejected() {
        let store = InMemoryStore::new();
        let result =
            EmployeeRepository::insert(&store, &new_employee(Uuid::new_v4(), "EMP001", None)).await;
        assert!(matches!(
            result,
            Err(StorageError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_record_period_is_unique() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let employee = new_employee(acme.id, "EMP001", None);
        EmployeeRepository::insert(&store, &employee).await.unwrap();

        SalaryRecordRepository::insert(&store, &draft(&employee, 6))
            .await
            .unwrap();
        let result = SalaryRecordRepository::insert(&store, &draft(&employee, 6)).await;
        assert_eq!(
            result,
            Err(StorageError::UniqueViolation {
                constraint: SALARY_PERIOD_KEY
            })
        );

        assert!(!store.insert_if_absent(&draft(&employee, 6)).await.unwrap());
        assert!(store.insert_if_absent(&draft(&employee, 7)).await.unwrap());
    }

    #[tokio::test]
    async fn test_foreign_record_is_invisible() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let globex = seed_account(&store, "b@globex.com").await;
        let employee = new_employee(acme.id, "EMP001", None);
        EmployeeRepository::insert(&store, &employee).await.unwrap();
        let record = draft(&employee, 6);
        SalaryRecordRepository::insert(&store, &record).await.unwrap();

        assert!(
            SalaryRecordRepository::find_owned(&store, globex.id, record.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_owned(globex.id, record.id).await.unwrap());
        assert!(
            store
                .list(globex.id, &SalaryRecordFilter::default())
                .await
                .unwrap()
                .is_empty()
        );

        let (found, owner) = SalaryRecordRepository::find_owned(&store, acme.id, record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(owner.id, employee.id);
    }

    #[tokio::test]
    async fn test_delete_frees_the_period() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let employee = new_employee(acme.id, "EMP001", None);
        EmployeeRepository::insert(&store, &employee).await.unwrap();
        let record = draft(&employee, 6);
        SalaryRecordRepository::insert(&store, &record).await.unwrap();

        assert!(store.delete_owned(acme.id, record.id).await.unwrap());
        assert!(
            store
                .find_by_period(employee.id, Period::new(6, 2024))
                .await
                .unwrap()
                .is_none()
        );
        SalaryRecordRepository::insert(&store, &draft(&employee, 6))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let employee = new_employee(acme.id, "EMP001", None);
        EmployeeRepository::insert(&store, &employee).await.unwrap();
        let mut approved = draft(&employee, 5);
        approved.approve();
        SalaryRecordRepository::insert(&store, &approved).await.unwrap();
        SalaryRecordRepository::insert(&store, &draft(&employee, 6))
            .await
            .unwrap();

        let filter = SalaryRecordFilter {
            status: Some(SalaryStatus::Draft),
            ..Default::default()
        };
        let drafts = store.list(acme.id, &filter).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].0.month, 6);
    }

    #[tokio::test]
    async fn test_update_missing_record_reports_row_missing() {
        let store = InMemoryStore::new();
        let acme = seed_account(&store, "a@acme.com").await;
        let employee = new_employee(acme.id, "EMP001", None);
        EmployeeRepository::insert(&store, &employee).await.unwrap();

        let result = SalaryRecordRepository::update(&store, &draft(&employee, 6)).await;
        assert!(matches!(result, Err(StorageError::RowMissing { .. })));
    }
}
