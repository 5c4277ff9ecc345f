//! Payroll period model.
//!
//! This module contains the [`Period`] type identifying the month and year a
//! salary record is computed for.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns the English name of a month, or `"Unknown"` outside 1-12.
///
/// # Example
///
/// ```
/// use payroll_engine::models::month_name;
///
/// assert_eq!(month_name(6), "June");
/// assert_eq!(month_name(13), "Unknown");
/// ```
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "Unknown",
    }
}

/// A payroll period: one calendar month of one year.
///
/// Periods order chronologically (year first, then month).
///
/// # Example
///
/// ```
/// use payroll_engine::models::Period;
///
/// let june = Period::new(6, 2024);
/// let july = Period::new(7, 2024);
/// assert!(june < july);
/// assert_eq!(june.label(), "June 2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// The calendar year.
    pub year: i32,
    /// The month of the year (1-12).
    pub month: u32,
}

impl Period {
    /// Creates a period from a month and year.
    pub fn new(month: u32, year: i32) -> Self {
        Self { year, month }
    }

    /// Returns the period containing the current UTC date.
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today.month(), today.year())
    }

    /// Returns the English name of this period's month.
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Returns a human-readable label such as `"June 2024"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}
