//! Storage ports for accounts, employees and salary records.
//!
//! Services depend only on the traits in this module. Every lookup that can
//! cross tenants takes the owning account id, so a foreign row is
//! indistinguishable from a missing one. Uniqueness constraints are enforced
//! here and surface as [`StorageError::UniqueViolation`].

mod error;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Account, AccountId, Employee, Period, SalaryRecord, SalaryRecordFilter,
};

pub use error::{
    ACCOUNT_EMAIL_KEY, EMPLOYEE_CODE_KEY, EMPLOYEE_EMAIL_KEY, SALARY_PERIOD_KEY, StorageError,
    StorageResult,
};
pub use memory::InMemoryStore;

/// Persistence for tenant accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account. Fails with `UniqueViolation` on a duplicate email.
    async fn insert(&self, account: &Account) -> StorageResult<()>;
    /// Finds an account by id.
    async fn find_by_id(&self, id: AccountId) -> StorageResult<Option<Account>>;
    /// Finds an account by its lowercased email.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>>;
}

/// Persistence for employees.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts a new employee. Fails on a duplicate code or email within the account.
    async fn insert(&self, employee: &Employee) -> StorageResult<()>;
    /// Finds an employee owned by `account_id`.
    async fn find_owned(&self, account_id: AccountId, id: Uuid) -> StorageResult<Option<Employee>>;
    /// Finds an employee of the account by business code.
    async fn find_by_code(
        &self,
        account_id: AccountId,
        code: &str,
    ) -> StorageResult<Option<Employee>>;
    /// Finds an employee of the account by email.
    async fn find_by_email(
        &self,
        account_id: AccountId,
        email: &str,
    ) -> StorageResult<Option<Employee>>;
    /// Lists every employee of the account, active or not.
    async fn list_by_account(&self, account_id: AccountId) -> StorageResult<Vec<Employee>>;
    /// Replaces a stored employee, re-checking uniqueness against other rows.
    async fn update(&self, employee: &Employee) -> StorageResult<()>;
}

/// Persistence for salary records.
///
/// Records are owned through their employee; `*_owned` and `list` join the
/// employee row and filter on its account.
#[async_trait]
pub trait SalaryRecordRepository: Send + Sync {
    /// Inserts a record. Fails with `UniqueViolation` if the employee already
    /// has a record for the period.
    async fn insert(&self, record: &SalaryRecord) -> StorageResult<()>;
    /// Inserts a record unless one exists for the period. Returns whether it
    /// was inserted.
    async fn insert_if_absent(&self, record: &SalaryRecord) -> StorageResult<bool>;
    /// Finds a record together with its employee, scoped to the account.
    async fn find_owned(
        &self,
        account_id: AccountId,
        id: Uuid,
    ) -> StorageResult<Option<(SalaryRecord, Employee)>>;
    /// Finds the record of an employee for a period.
    async fn find_by_period(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> StorageResult<Option<SalaryRecord>>;
    /// Lists the account's records matching `filter`, each with its employee.
    async fn list(
        &self,
        account_id: AccountId,
        filter: &SalaryRecordFilter,
    ) -> StorageResult<Vec<(SalaryRecord, Employee)>>;
    /// Replaces a stored record.
    async fn update(&self, record: &SalaryRecord) -> StorageResult<()>;
    /// Deletes a record owned by the account. Returns whether a row was removed.
    async fn delete_owned(&self, account_id: AccountId, id: Uuid) -> StorageResult<bool>;
}

/// The set of repositories the services run against.
#[derive(Clone)]
pub struct Repositories {
    /// Account storage.
    pub accounts: Arc<dyn AccountRepository>,
    /// Employee storage.
    pub employees: Arc<dyn EmployeeRepository>,
    /// Salary record storage.
    pub salary_records: Arc<dyn SalaryRecordRepository>,
}

impl Repositories {
    /// Creates repositories backed by a single shared [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_store(InMemoryStore::new())
    }

    /// Creates repositories that all share `store`.
    pub fn from_store(store: InMemoryStore) -> Self {
        Self {
            accounts: Arc::new(store.clone()),
            employees: Arc::new(store.clone()),
            salary_records: Arc::new(store),
        }
    }
}
