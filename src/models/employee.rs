//! Employee model and related types.
//!
//! This module defines the Employee struct together with the payloads used
//! to create, patch, filter and summarize employees within an account.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Patch};

/// Represents an employee owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The account that owns this employee.
    pub account_id: AccountId,
    /// Business identifier, unique per account (e.g., "EMP001").
    pub employee_code: String,
    /// Full name.
    pub name: String,
    /// Optional contact email, unique per account when present.
    pub email: Option<String>,
    /// The date the employee joined.
    pub joining_date: NaiveDate,
    /// Current basic monthly salary.
    pub basic_salary: Decimal,
    /// Optional department name.
    pub department: Option<String>,
    /// Optional job position.
    pub position: Option<String>,
    /// False once the employee has been soft-deleted.
    pub is_active: bool,
    /// When the employee was created.
    pub created_at: DateTime<Utc>,
    /// When the employee was last modified.
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Payload for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Business identifier (uppercase letters and digits).
    pub employee_code: String,
    /// Full name.
    pub name: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// The date the employee joined.
    pub joining_date: NaiveDate,
    /// Basic monthly salary.
    pub basic_salary: Decimal,
    /// Optional department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Optional job position.
    #[serde(default)]
    pub position: Option<String>,
    /// Whether the employee starts active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Partial update of an employee. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    /// New business identifier.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub employee_code: Patch<String>,
    /// New name.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    /// New email; `null` clears it.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub email: Patch<Option<String>>,
    /// New joining date.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub joining_date: Patch<NaiveDate>,
    /// New basic salary. Existing salary records keep their snapshot.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub basic_salary: Patch<Decimal>,
    /// New department; `null` clears it.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub department: Patch<Option<String>>,
    /// New position; `null` clears it.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub position: Patch<Option<String>>,
    /// New active flag.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub is_active: Patch<bool>,
}

/// Treats blank optional text as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Employee {
    /// Builds a new employee for an account from a creation payload.
    ///
    /// Blank optional fields are stored as `None` and emails are lowercased.
    pub fn create(account_id: AccountId, input: NewEmployee) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            employee_code: input.employee_code.trim().to_string(),
            name: input.name.trim().to_string(),
            email: non_blank(input.email).map(|e| e.to_lowercase()),
            joining_date: input.joining_date,
            basic_salary: input.basic_salary,
            department: non_blank(input.department),
            position: non_blank(input.position),
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: EmployeePatch) {
        if let Patch::Set(code) = patch.employee_code {
            self.employee_code = code.trim().to_string();
        }
        if let Patch::Set(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Patch::Set(email) = patch.email {
            self.email = non_blank(email).map(|e| e.to_lowercase());
        }
        patch.joining_date.apply_to(&mut self.joining_date);
        patch.basic_salary.apply_to(&mut self.basic_salary);
        if let Patch::Set(department) = patch.department {
            self.department = non_blank(department);
        }
        if let Patch::Set(position) = patch.position {
            self.position = non_blank(position);
        }
        patch.is_active.apply_to(&mut self.is_active);
        self.updated_at = Utc::now();
    }

    /// Returns the summary embedded in salary record listings.
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            employee_code: self.employee_code.clone(),
            name: self.name.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            basic_salary: self.basic_salary,
        }
    }
}

/// The subset of employee fields shown next to a salary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// Business identifier.
    pub employee_code: String,
    /// Full name.
    pub name: String,
    /// Optional department name.
    pub department: Option<String>,
    /// Optional job position.
    pub position: Option<String>,
    /// Current basic salary (not the record's snapshot).
    pub basic_salary: Decimal,
}

/// Field to sort employee listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSortField {
    /// Sort by name.
    Name,
    /// Sort by business identifier.
    EmployeeCode,
    /// Sort by joining date.
    JoiningDate,
    /// Sort by basic salary.
    BasicSalary,
    /// Sort by creation time.
    #[default]
    CreatedAt,
}

impl EmployeeSortField {
    /// Compares two employees by this field, ascending.
    pub fn compare(self, a: &Employee, b: &Employee) -> Ordering {
        match self {
            EmployeeSortField::Name => a.name.cmp(&b.name),
            EmployeeSortField::EmployeeCode => a.employee_code.cmp(&b.employee_code),
            EmployeeSortField::JoiningDate => a.joining_date.cmp(&b.joining_date),
            EmployeeSortField::BasicSalary => a.basic_salary.cmp(&b.basic_salary),
            EmployeeSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Filters and paging for employee listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Case-insensitive text matched against name, code, email and position.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact department match.
    #[serde(default)]
    pub department: Option<String>,
    /// Restrict to active or inactive employees.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort field.
    #[serde(default)]
    pub sort_by: EmployeeSortField,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl EmployeeFilter {
    /// Returns true if the employee passes the search, department and
    /// active filters. Paging is not considered.
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(active) = self.is_active {
            if employee.is_active != active {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if employee.department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => {
                let needle = search.to_lowercase();
                let contains = |value: &str| value.to_lowercase().contains(&needle);
                contains(&employee.name)
                    || contains(&employee.employee_code)
                    || employee.email.as_deref().is_some_and(contains)
                    || employee.position.as_deref().is_some_and(contains)
            }
        }
    }
}

/// Paging metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The returned page (1-based).
    pub page: u32,
    /// The page size.
    pub limit: u32,
    /// Number of matching rows across all pages.
    pub total_count: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Computes paging metadata for a page of a listing.
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(limit.max(1)));
        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePage {
    /// The employees on this page.
    pub employees: Vec<Employee>,
    /// Paging metadata.
    pub pagination: Pagination,
}

/// Headcount statistics for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStats {
    /// Employees with the active flag set.
    pub total_active: u64,
    /// Soft-deleted employees.
    pub total_inactive: u64,
    /// All employees.
    pub total_employees: u64,
    /// Mean basic salary of active employees (zero when none).
    pub average_salary: Decimal,
    /// Employees whose joining date is within the last 30 days.
    pub recent_joins: u64,
}
