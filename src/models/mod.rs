//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod account;
mod employee;
mod patch;
mod period;
mod salary_record;

pub use account::{Account, AccountContext, AccountId, NewAccount};
pub use employee::{
    Employee, EmployeeFilter, EmployeePage, EmployeePatch, EmployeeSortField, EmployeeStats,
    EmployeeSummary, NewEmployee, Pagination, SortOrder,
};
pub use patch::Patch;
pub use period::{MONTH_NAMES, Period, month_name};
pub use salary_record::{
    DashboardStats, MonthlyReport, NewSalaryRecord, SalaryRecord, SalaryRecordFilter,
    SalaryRecordPatch, SalaryRecordView, SalaryStatus,
};
