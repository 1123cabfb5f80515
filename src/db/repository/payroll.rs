//! Payroll Repository (periods + records)

use super::{Db, RepoError, RepoResult, next_id};
use crate::db::models::{PayrollPeriod, PayrollRecord, PeriodStatus};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: Db,
}

impl PayrollRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    // ===== Periods =====

    pub fn create_period(
        &self,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: NaiveDateTime,
    ) -> RepoResult<PayrollPeriod> {
        if end_date < start_date {
            return Err(RepoError::Validation(format!(
                "Period end {end_date} is before start {start_date}"
            )));
        }
        let mut periods = self.db.tables.periods.write();
        let id = next_id(&periods);
        let period = PayrollPeriod {
            id: Some(id),
            name,
            start_date,
            end_date,
            status: PeriodStatus::Draft,
            created_at: Some(now),
        };
        periods.insert(id, period.clone());
        Ok(period)
    }

    pub fn find_period(&self, id: i64) -> RepoResult<Option<PayrollPeriod>> {
        Ok(self.db.tables.periods.read().get(&id).cloned())
    }

    /// Advance a period's status. Regression is rejected; same-status is a
    /// no-op (recalculating a completed period is allowed).
    pub fn advance_period_status(&self, id: i64, next: PeriodStatus) -> RepoResult<PayrollPeriod> {
        let mut periods = self.db.tables.periods.write();
        let period = periods
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Payroll period {id} not found")))?;
        if !period.status.can_advance_to(next) {
            return Err(RepoError::Validation(format!(
                "Period status cannot regress from {:?} to {:?}",
                period.status, next
            )));
        }
        period.status = next;
        Ok(period.clone())
    }

    // ===== Records =====

    pub fn find_record_by_id(&self, id: i64) -> RepoResult<Option<PayrollRecord>> {
        Ok(self.db.tables.payroll_records.read().get(&id).cloned())
    }

    pub fn find_records_by_period(&self, period_id: i64) -> RepoResult<Vec<PayrollRecord>> {
        Ok(self
            .db
            .tables
            .payroll_records
            .read()
            .values()
            .filter(|r| r.period_id == period_id)
            .cloned()
            .collect())
    }

    /// Insert-or-overwrite keyed by (employee, period), the idempotence
    /// point for recalculation. An existing row keeps its id and approval
    /// fields; all derived fields are replaced.
    pub fn upsert_record(&self, mut record: PayrollRecord) -> RepoResult<PayrollRecord> {
        let mut records = self.db.tables.payroll_records.write();

        let existing = records
            .values()
            .find(|r| r.employee_id == record.employee_id && r.period_id == record.period_id)
            .cloned();

        let id = match existing {
            Some(prev) => {
                record.status = prev.status;
                record.approved_by = prev.approved_by;
                record.approved_at = prev.approved_at;
                prev.id
                    .ok_or_else(|| RepoError::Validation("Stored payroll record has no id".into()))?
            }
            None => next_id(&records),
        };

        record.id = Some(id);
        records.insert(id, record.clone());
        Ok(record)
    }

    /// Overwrite a record in place (approval stamping).
    pub fn update_record(&self, record: PayrollRecord) -> RepoResult<PayrollRecord> {
        let id = record
            .id
            .ok_or_else(|| RepoError::Validation("Payroll record has no id".into()))?;
        let mut records = self.db.tables.payroll_records.write();
        if !records.contains_key(&id) {
            return Err(RepoError::NotFound(format!("Payroll record {id} not found")));
        }
        records.insert(id, record.clone());
        Ok(record)
    }
}
