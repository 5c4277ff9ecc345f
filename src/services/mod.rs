//! Service layer for the Payroll Engine.
//!
//! Services resolve the acting account from an [`AccountContext`], validate
//! input, enforce tenant scoping and talk to storage through the
//! [`repository`](crate::repository) traits.
//!
//! [`AccountContext`]: crate::models::AccountContext

mod accounts;
mod employees;
mod guard;
mod payroll;
mod report;

pub use accounts::AccountService;
pub use employees::EmployeeService;
pub use guard::ScopeGuard;
pub use payroll::PayrollService;
