//! Salary record models.
//!
//! This module contains the [`SalaryRecord`] type and the payloads, filters
//! and result structures used by the payroll lifecycle operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Employee, EmployeeSummary, Patch, Period};
use crate::calculation::{SalaryCalculation, SalaryInputs, calculate_salary};

/// Lifecycle status of a salary record.
///
/// Records start as `Draft`. `Approve` moves any record to `Approved`;
/// no operation moves a record to `Paid`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SalaryStatus;
///
/// assert_eq!(serde_json::to_string(&SalaryStatus::Draft).unwrap(), "\"DRAFT\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryStatus {
    /// Newly created, awaiting approval.
    #[default]
    Draft,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
}

/// One employee's payroll for one (month, year) period.
///
/// `basic_salary` is a snapshot of the employee's salary when the record was
/// created; later changes to the employee do not flow into the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee this record pays.
    pub employee_id: Uuid,
    /// Month of the period (1-12).
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Basic salary snapshot.
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
    /// Stored net salary.
    pub total_salary: Decimal,
    /// Lifecycle status.
    pub status: SalaryStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was last approved.
    pub processed_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl SalaryRecord {
    /// Builds a draft record for an employee, snapshotting the basic salary
    /// from `inputs` and storing the calculated net salary as the total.
    pub fn draft(employee_id: Uuid, period: Period, inputs: SalaryInputs, notes: Option<String>) -> Self {
        let calculation = calculate_salary(&inputs);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            month: period.month,
            year: period.year,
            basic_salary: inputs.basic_salary,
            bonus: inputs.bonus,
            deductions: inputs.deductions,
            allowances: inputs.allowances,
            overtime_hours: inputs.overtime_hours,
            overtime_rate: inputs.overtime_rate,
            total_salary: calculation.net_salary,
            status: SalaryStatus::Draft,
            notes,
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the zero-adjustment draft used by monthly report generation.
    pub fn backfill(employee: &Employee, period: Period) -> Self {
        Self::draft(employee.id, period, SalaryInputs::new(employee.basic_salary), None)
    }

    /// Returns the record's period.
    pub fn period(&self) -> Period {
        Period::new(self.month, self.year)
    }

    /// Returns the calculation inputs stored on the record.
    pub fn inputs(&self) -> SalaryInputs {
        SalaryInputs {
            basic_salary: self.basic_salary,
            bonus: self.bonus,
            deductions: self.deductions,
            allowances: self.allowances,
            overtime_hours: self.overtime_hours,
            overtime_rate: self.overtime_rate,
        }
    }

    /// Recalculates the record from its stored values.
    pub fn calculation(&self) -> SalaryCalculation {
        calculate_salary(&self.inputs())
    }

    /// Merges a patch over the record and recalculates the total.
    ///
    /// The basic salary snapshot is never touched.
    pub fn apply(&mut self, patch: SalaryRecordPatch) {
        patch.bonus.apply_to(&mut self.bonus);
        patch.deductions.apply_to(&mut self.deductions);
        patch.allowances.apply_to(&mut self.allowances);
        patch.overtime_hours.apply_to(&mut self.overtime_hours);
        patch.overtime_rate.apply_to(&mut self.overtime_rate);
        patch.notes.apply_to(&mut self.notes);
        self.total_salary = self.calculation().net_salary;
        self.updated_at = Utc::now();
    }

    /// Marks the record approved and stamps the processing time.
    pub fn approve(&mut self) {
        let now = Utc::now();
        self.status = SalaryStatus::Approved;
        self.processed_at = Some(now);
        self.updated_at = now;
    }
}

/// Payload for creating a salary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSalaryRecord {
    /// The employee to pay.
    pub employee_id: Uuid,
    /// Month of the period (1-12).
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Optional bonus (defaults to zero).
    #[serde(default)]
    pub bonus: Option<Decimal>,
    /// Optional deductions (defaults to zero).
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Optional allowances (defaults to zero).
    #[serde(default)]
    pub allowances: Option<Decimal>,
    /// Optional overtime hours (defaults to zero).
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Optional overtime rate (defaults to zero).
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSalaryRecord {
    /// Creates a payload with no adjustments.
    pub fn new(employee_id: Uuid, month: u32, year: i32) -> Self {
        Self {
            employee_id,
            month,
            year,
            bonus: None,
            deductions: None,
            allowances: None,
            overtime_hours: None,
            overtime_rate: None,
            notes: None,
        }
    }

    /// Returns the requested period.
    pub fn period(&self) -> Period {
        Period::new(self.month, self.year)
    }

    /// Combines the payload's adjustments with a basic salary snapshot.
    pub fn inputs(&self, basic_salary: Decimal) -> SalaryInputs {
        SalaryInputs {
            basic_salary,
            bonus: self.bonus.unwrap_or_default(),
            deductions: self.deductions.unwrap_or_default(),
            allowances: self.allowances.unwrap_or_default(),
            overtime_hours: self.overtime_hours.unwrap_or_default(),
            overtime_rate: self.overtime_rate.unwrap_or_default(),
        }
    }
}

/// Partial update of a salary record. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecordPatch {
    /// New bonus.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub bonus: Patch<Decimal>,
    /// New deductions.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub deductions: Patch<Decimal>,
    /// New allowances.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub allowances: Patch<Decimal>,
    /// New overtime hours.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub overtime_hours: Patch<Decimal>,
    /// New overtime rate.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub overtime_rate: Patch<Decimal>,
    /// New notes; `null` clears them.
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<Option<String>>,
}

/// Filters for salary record listings. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecordFilter {
    /// Restrict to a month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Restrict to a year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Substring of the employee's department.
    #[serde(default)]
    pub department: Option<String>,
    /// Restrict to a status.
    #[serde(default)]
    pub status: Option<SalaryStatus>,
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
}

impl SalaryRecordFilter {
    /// A filter selecting every record of one period.
    pub fn for_period(period: Period) -> Self {
        Self {
            month: Some(period.month),
            year: Some(period.year),
            ..Default::default()
        }
    }

    /// Returns true if the record and its employee pass every filter.
    pub fn matches(&self, record: &SalaryRecord, employee: &Employee) -> bool {
        self.month.is_none_or(|m| record.month == m)
            && self.year.is_none_or(|y| record.year == y)
            && self.status.is_none_or(|s| record.status == s)
            && self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.department.as_deref().is_none_or(|department| {
                employee
                    .department
                    .as_deref()
                    .is_some_and(|d| d.contains(department))
            })
    }
}

/// A salary record as listed, with its employee and computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecordView {
    /// The stored record.
    #[serde(flatten)]
    pub record: SalaryRecord,
    /// The record's employee.
    pub employee: EmployeeSummary,
    /// Gross salary recomputed from the stored values.
    pub gross_salary: Decimal,
    /// Total deductions recomputed from the stored values.
    pub total_deductions: Decimal,
    /// Net salary recomputed from the stored values.
    pub net_salary: Decimal,
}

impl SalaryRecordView {
    /// Annotates a record with its employee summary and computed totals.
    pub fn new(record: SalaryRecord, employee: &Employee) -> Self {
        let calculation = record.calculation();
        Self {
            record,
            employee: employee.summary(),
            gross_salary: calculation.gross_salary,
            total_deductions: calculation.total_deductions,
            net_salary: calculation.net_salary,
        }
    }
}

/// Payroll dashboard figures for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// The period the period-scoped figures refer to.
    pub period: Period,
    /// Records in the period.
    pub total_records: u64,
    /// Sum of `total_salary` over the period's records.
    pub total_payroll: Decimal,
    /// All-time count of `DRAFT` records (not period-scoped).
    pub pending_approvals: u64,
    /// Distinct employees with at least one record ever.
    pub active_employees: u64,
}

/// Result of generating a monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// The generated period.
    pub period: Period,
    /// Every record of the period after generation.
    pub records: Vec<SalaryRecordView>,
    /// Number of records created by this call.
    pub new_records_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    use crate::models::NewEmployee;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(department: Option<&str>) -> Employee {
        Employee::create(
            Uuid::new_v4(),
            NewEmployee {
                employee_code: "EMP001".to_string(),
                name: "John Smith".to_string(),
                email: None,
                joining_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                basic_salary: dec("75000"),
                department: department.map(str::to_string),
                position: None,
                is_active: true,
            },
        )
    }

    fn create_test_record() -> SalaryRecord {
        let inputs = SalaryInputs::new(dec("75000"))
            .with_bonus(dec("2000"))
            .with_deductions(dec("800"));
        SalaryRecord::draft(Uuid::new_v4(), Period::new(6, 2024), inputs, None)
    }

    #[test]
    fn test_draft_stores_net_as_total() {
        let record = create_test_record();
        assert_eq!(record.total_salary, dec("76200"));
        assert_eq!(record.status, SalaryStatus::Draft);
        assert_eq!(record.processed_at, None);
    }

    #[test]
    fn test_backfill_uses_basic_salary_as_total() {
        let employee = create_test_employee(None);
        let record = SalaryRecord::backfill(&employee, Period::new(1, 2025));
        assert_eq!(record.total_salary, dec("75000"));
        assert_eq!(record.bonus, Decimal::ZERO);
        assert_eq!(record.employee_id, employee.id);
    }

    #[test]
    fn test_apply_patch_keeps_snapshot_and_unset_fields() {
        let mut record = create_test_record();
        record.apply(SalaryRecordPatch {
            bonus: Patch::Set(dec("3000")),
            ..Default::default()
        });

        assert_eq!(record.basic_salary, dec("75000"));
        assert_eq!(record.deductions, dec("800"));
        assert_eq!(record.total_salary, dec("77200"));
    }

    #[test]
    fn test_approve_sets_status_and_timestamp() {
        let mut record = create_test_record();
        record.approve();
        assert_eq!(record.status, SalaryStatus::Approved);
        assert!(record.processed_at.is_some());
    }

    #[test]
    fn test_new_salary_record_defaults_adjustments_to_zero() {
        let json = r#"{
            "employee_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "month": 6,
            "year": 2024,
            "bonus": "2000"
        }"#;
        let input: NewSalaryRecord = serde_json::from_str(json).unwrap();
        let inputs = input.inputs(dec("75000"));
        assert_eq!(inputs.bonus, dec("2000"));
        assert_eq!(inputs.deductions, Decimal::ZERO);
        assert_eq!(inputs.overtime_rate, Decimal::ZERO);
    }

    #[test]
    fn test_filter_department_is_substring() {
        let employee = create_test_employee(Some("Engineering"));
        let mut record = create_test_record();
        record.employee_id = employee.id;

        let filter = SalaryRecordFilter {
            department: Some("Engine".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&record, &employee));

        let filter = SalaryRecordFilter {
            department: Some("Design".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&record, &employee));
    }

    #[test]
    fn test_filter_for_period() {
        let employee = create_test_employee(None);
        let record = create_test_record();
        assert!(SalaryRecordFilter::for_period(Period::new(6, 2024)).matches(&record, &employee));
        assert!(!SalaryRecordFilter::for_period(Period::new(7, 2024)).matches(&record, &employee));
    }

    #[test]
    fn test_view_computes_totals_from_snapshot() {
        let mut employee = create_test_employee(None);
        let record = create_test_record();
        employee.basic_salary = dec("99999");

        let view = SalaryRecordView::new(record, &employee);
        assert_eq!(view.gross_salary, dec("77000"));
        assert_eq!(view.total_deductions, dec("800"));
        assert_eq!(view.net_salary, dec("76200"));
        assert_eq!(view.employee.basic_salary, dec("99999"));
    }

    #[test]
    fn test_status_deserializes_upper_case() {
        let status: SalaryStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, SalaryStatus::Paid);
    }
}
