//! Monthly report generation.

use std::collections::HashSet;

use tracing::{debug, info};
use uuid::Uuid;

use super::PayrollService;
use crate::error::PayrollResult;
use crate::models::{AccountContext, MonthlyReport, Period, SalaryRecord, SalaryRecordFilter};
use crate::validation::validate_period;

impl PayrollService {
    /// Ensures every active employee of the acting account has a record for
    /// the period, then returns the period's full listing.
    ///
    /// Missing records are backfilled as `DRAFT` with zero adjustments and a
    /// total equal to the basic salary. Calling this again for the same
    /// period creates nothing. A record inserted concurrently by another
    /// request is treated as already present.
    pub async fn generate_monthly_report(
        &self,
        ctx: &AccountContext,
        month: u32,
        year: i32,
    ) -> PayrollResult<MonthlyReport> {
        let account_id = self.accounts.resolve_id(ctx).await?;
        validate_period(month, year, &self.config.validation)?;
        let period = Period::new(month, year);
        let filter = SalaryRecordFilter::for_period(period);

        let active_employees: Vec<_> = self
            .employees
            .list_by_account(account_id)
            .await?
            .into_iter()
            .filter(|employee| employee.is_active)
            .collect();
        let existing: HashSet<Uuid> = self
            .salary_records
            .list(account_id, &filter)
            .await?
            .into_iter()
            .map(|(record, _)| record.employee_id)
            .collect();

        let mut new_records_count = 0u64;
        for employee in active_employees
            .iter()
            .filter(|employee| !existing.contains(&employee.id))
        {
            let record = SalaryRecord::backfill(employee, period);
            if self.salary_records.insert_if_absent(&record).await? {
                new_records_count += 1;
            } else {
                debug!(employee_id = %employee.id, "Record created concurrently, skipping");
            }
        }

        let records = self.list_for_account(account_id, &filter).await?;

        info!(
            %account_id,
            period = %period.label(),
            new_records = new_records_count,
            total_records = records.len(),
            "Monthly report generated"
        );
        Ok(MonthlyReport {
            period,
            records,
            new_records_count,
        })
    }
}
