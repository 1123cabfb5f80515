//! Attendance Repository
//!
//! The check-in invariant lives here: `create_checked_in` verifies under the
//! table's write lock that no open record exists for the (employee, date)
//! pair before inserting. Concurrent check-in attempts serialize on that
//! lock, so exactly one succeeds.

use super::{Db, RepoError, RepoResult, next_id};
use crate::db::models::{AttendanceModification, AttendanceRecord};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    db: Db,
}

impl AttendanceRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<AttendanceRecord>> {
        Ok(self.db.tables.attendance.read().get(&id).cloned())
    }

    /// Open record (check-in set, check-out unset) for one employee on one date.
    pub fn find_open(&self, employee_id: i64, date: NaiveDate) -> RepoResult<Option<AttendanceRecord>> {
        Ok(self
            .db
            .tables
            .attendance
            .read()
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date && r.is_open())
            .cloned())
    }

    /// Any record for one employee on one date (open or closed).
    pub fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        Ok(self
            .db
            .tables
            .attendance
            .read()
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    /// Insert a new open record, enforcing at most one open session per
    /// (employee, date). Returns `Duplicate` carrying the existing id.
    pub fn create_checked_in(&self, mut record: AttendanceRecord) -> RepoResult<AttendanceRecord> {
        let mut attendance = self.db.tables.attendance.write();

        if let Some(existing) = attendance
            .values()
            .find(|r| r.employee_id == record.employee_id && r.date == record.date && r.is_open())
        {
            return Err(RepoError::Duplicate(format!(
                "Open attendance {} already exists for employee {} on {}",
                existing.id.unwrap_or_default(),
                record.employee_id,
                record.date
            )));
        }

        let id = next_id(&attendance);
        record.id = Some(id);
        attendance.insert(id, record.clone());
        Ok(record)
    }

    /// Overwrite a record (check-out completion or administrative edit).
    pub fn update(&self, record: AttendanceRecord) -> RepoResult<AttendanceRecord> {
        let id = record
            .id
            .ok_or_else(|| RepoError::Validation("Attendance record has no id".into()))?;
        let mut attendance = self.db.tables.attendance.write();
        if !attendance.contains_key(&id) {
            return Err(RepoError::NotFound(format!(
                "Attendance record {id} not found"
            )));
        }
        attendance.insert(id, record.clone());
        Ok(record)
    }

    /// Records for one employee with `date` in [start, end], date order.
    pub fn find_by_employee_in_range(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .db
            .tables
            .attendance
            .read()
            .values()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// All records with `date` in [start, end].
    pub fn find_in_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<AttendanceRecord>> {
        Ok(self
            .db
            .tables
            .attendance
            .read()
            .values()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }

    // ===== Audit trail (append-only) =====

    pub fn append_modification(&self, mut entry: AttendanceModification) -> RepoResult<AttendanceModification> {
        let mut modifications = self.db.tables.modifications.write();
        entry.id = Some(modifications.len() as i64 + 1);
        modifications.push(entry.clone());
        Ok(entry)
    }

    /// Audit history for one attendance record, newest first.
    pub fn modifications_for(&self, attendance_id: i64) -> RepoResult<Vec<AttendanceModification>> {
        let mut entries: Vec<_> = self
            .db
            .tables
            .modifications
            .read()
            .iter()
            .filter(|m| m.attendance_id == attendance_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(entries)
    }
}
