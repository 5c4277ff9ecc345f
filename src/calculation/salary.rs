//! Salary calculation functionality.
//!
//! This module provides the pure gross/net salary computation used when
//! creating, updating, listing and generating salary records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The inputs to a salary calculation.
///
/// All adjustments default to zero. Inputs are expected to be non-negative;
/// the calculator itself does not reject negative values, that is the job
/// of the validation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalaryInputs {
    /// Basic monthly salary.
    pub basic_salary: Decimal,
    /// One-off bonus for the period.
    pub bonus: Decimal,
    /// Amount withheld for the period.
    pub deductions: Decimal,
    /// Allowances paid on top of the basic salary.
    pub allowances: Decimal,
    /// Overtime hours worked in the period.
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    pub overtime_rate: Decimal,
}

impl SalaryInputs {
    /// Creates inputs with the given basic salary and no adjustments.
    pub fn new(basic_salary: Decimal) -> Self {
        Self {
            basic_salary,
            ..Default::default()
        }
    }

    /// Sets the bonus.
    pub fn with_bonus(mut self, bonus: Decimal) -> Self {
        self.bonus = bonus;
        self
    }

    /// Sets the deductions.
    pub fn with_deductions(mut self, deductions: Decimal) -> Self {
        self.deductions = deductions;
        self
    }

    /// Sets the allowances.
    pub fn with_allowances(mut self, allowances: Decimal) -> Self {
        self.allowances = allowances;
        self
    }

    /// Sets overtime hours and the hourly overtime rate.
    pub fn with_overtime(mut self, hours: Decimal, rate: Decimal) -> Self {
        self.overtime_hours = hours;
        self.overtime_rate = rate;
        self
    }
}

/// The result of a salary calculation: every input plus the derived totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCalculation {
    /// Basic monthly salary.
    pub basic_salary: Decimal,
    /// Bonus for the period.
    pub bonus: Decimal,
    /// Deductions for the period.
    pub deductions: Decimal,
    /// Allowances for the period.
    pub allowances: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    pub overtime_rate: Decimal,
    /// `overtime_hours * overtime_rate`.
    pub overtime_pay: Decimal,
    /// `basic_salary + bonus + allowances + overtime_pay`.
    pub gross_salary: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// `gross_salary - total_deductions`, the payable amount.
    pub net_salary: Decimal,
}

/// Calculates gross and net salary.
///
/// ```text
/// overtime_pay     = overtime_hours * overtime_rate
/// gross_salary     = basic_salary + bonus + allowances + overtime_pay
/// total_deductions = deductions
/// net_salary       = gross_salary - total_deductions
/// ```
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_salary, SalaryInputs};
/// use rust_decimal::Decimal;
///
/// let inputs = SalaryInputs::new(Decimal::new(75000, 0))
///     .with_bonus(Decimal::new(2000, 0))
///     .with_deductions(Decimal::new(800, 0));
///
/// let result = calculate_salary(&inputs);
/// assert_eq!(result.gross_salary, Decimal::new(77000, 0));
/// assert_eq!(result.net_salary, Decimal::new(76200, 0));
/// ```
pub fn calculate_salary(inputs: &SalaryInputs) -> SalaryCalculation {
    let overtime_pay = inputs.overtime_hours * inputs.overtime_rate;
    let gross_salary = inputs.basic_salary + inputs.bonus + inputs.allowances + overtime_pay;
    let total_deductions = inputs.deductions;
    let net_salary = gross_salary - total_deductions;

    SalaryCalculation {
        basic_salary: inputs.basic_salary,
        bonus: inputs.bonus,
        deductions: inputs.deductions,
        allowances: inputs.allowances,
        overtime_hours: inputs.overtime_hours,
        overtime_rate: inputs.overtime_rate,
        overtime_pay,
        gross_salary,
        total_deductions,
        net_salary,
    }
}
