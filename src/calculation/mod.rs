//! Calculation logic for the Payroll Engine.
//!
//! This module contains the pure salary computation shared by every
//! payroll operation that needs gross, deduction or net totals.

mod salary;

pub use salary::{SalaryCalculation, SalaryInputs, calculate_salary};
