//! Attendance Modification Service (考勤修改 + 审计)
//!
//! Administrative overrides bypass the check-in/check-out state machine,
//! so every change appends an immutable audit row first capturing the old
//! value. The audit trail is append-only, never edited or deleted.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::Clock;
use crate::db::models::{AttendanceField, AttendanceModification, AttendanceStatus};
use crate::db::repository::AttendanceRepository;
use crate::utils::time::{parse_datetime, round2};
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// One requested edit in a bulk batch.
#[derive(Debug, Clone, Serialize)]
pub struct BulkEdit {
    pub attendance_id: i64,
    pub field: AttendanceField,
    pub new_value: Option<String>,
    pub reason: String,
}

/// Bulk batch tally: items succeed or fail independently.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BulkModificationOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// 考勤修改服务
#[derive(Clone)]
pub struct ModificationService {
    attendance: AttendanceRepository,
    clock: Arc<dyn Clock>,
}

impl ModificationService {
    pub fn new(attendance: AttendanceRepository, clock: Arc<dyn Clock>) -> Self {
        Self { attendance, clock }
    }

    /// Apply one audited edit to an attendance record.
    ///
    /// `new_value = None` clears a clearable field (check-in/check-out).
    /// Changing either timestamp recomputes `total_hours` (difference when
    /// both are present, else 0).
    pub fn modify(
        &self,
        attendance_id: i64,
        field: AttendanceField,
        new_value: Option<String>,
        reason: &str,
        actor_id: i64,
    ) -> AppResult<()> {
        validate_required_text(reason, "Modification reason", MAX_NOTE_LEN)?;

        let mut record = self.attendance.find_by_id(attendance_id)?.ok_or_else(|| {
            AppError::not_found(format!("Attendance record {attendance_id} not found"))
        })?;

        // Capture the old value before any overwrite; the audit row must
        // never be lossy.
        let old_value = match field {
            AttendanceField::CheckIn => record.check_in.map(|t| t.format(DATETIME_FMT).to_string()),
            AttendanceField::CheckOut => {
                record.check_out.map(|t| t.format(DATETIME_FMT).to_string())
            }
            AttendanceField::Status => Some(record.status.to_string()),
            AttendanceField::Notes => record.notes.clone(),
        };

        match field {
            AttendanceField::CheckIn => {
                record.check_in = parse_optional_datetime(new_value.as_deref())?;
            }
            AttendanceField::CheckOut => {
                record.check_out = parse_optional_datetime(new_value.as_deref())?;
            }
            AttendanceField::Status => {
                let raw = new_value
                    .as_deref()
                    .ok_or_else(|| AppError::invalid_input("Status cannot be cleared"))?;
                record.status = raw.parse::<AttendanceStatus>()?;
            }
            AttendanceField::Notes => {
                record.notes = new_value.clone();
            }
        }

        if matches!(field, AttendanceField::CheckIn | AttendanceField::CheckOut) {
            record.total_hours = match (record.check_in, record.check_out) {
                (Some(check_in), Some(check_out)) => {
                    round2((check_out - check_in).num_seconds() as f64 / 3600.0)
                }
                _ => 0.0,
            };
        }

        let now = self.clock.now();
        record.updated_at = Some(now);
        self.attendance.update(record)?;

        self.attendance.append_modification(AttendanceModification {
            id: None,
            attendance_id,
            field_changed: field,
            old_value,
            new_value,
            reason: reason.to_string(),
            modified_by: actor_id,
            modified_at: now,
        })?;

        info!(attendance_id, %field, actor_id, "Attendance record modified");
        Ok(())
    }

    /// Apply a batch of edits; each item succeeds or fails on its own and a
    /// failure never aborts the rest.
    pub fn modify_bulk(&self, edits: Vec<BulkEdit>, actor_id: i64) -> BulkModificationOutcome {
        let mut outcome = BulkModificationOutcome::default();

        for edit in edits {
            match self.modify(
                edit.attendance_id,
                edit.field,
                edit.new_value,
                &edit.reason,
                actor_id,
            ) {
                Ok(()) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(attendance_id = edit.attendance_id, error = %e, "Bulk edit item failed");
                    outcome.failed += 1;
                    outcome
                        .errors
                        .push(format!("attendance {}: {e}", edit.attendance_id));
                }
            }
        }

        outcome
    }

    /// Audit history for one attendance record, newest first.
    pub fn history(&self, attendance_id: i64) -> AppResult<Vec<AttendanceModification>> {
        Ok(self.attendance.modifications_for(attendance_id)?)
    }
}

fn parse_optional_datetime(raw: Option<&str>) -> AppResult<Option<chrono::NaiveDateTime>> {
    match raw {
        None => Ok(None),
        // The admin frontend sends the literal string "None" to clear
        Some("None") | Some("") => Ok(None),
        Some(value) => Ok(Some(parse_datetime(value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, FixedClock};
    use crate::db::Db;
    use crate::db::models::EmployeeCreate;
    use crate::db::repository::{EmployeeRepository, ShiftRepository};
    use crate::shifts::ShiftService;
    use chrono::{NaiveDate, NaiveDateTime};

    fn monday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn fixture() -> (ModificationService, i64) {
        let db = Db::open_in_memory();
        let clock = Arc::new(FixedClock::new(monday(18, 0)));
        let employees = EmployeeRepository::new(db.clone());
        let attendance = AttendanceRepository::new(db.clone());

        let employee_id = employees
            .create(
                EmployeeCreate {
                    code: "EMP001".into(),
                    name: "Test Employee".into(),
                    phone: None,
                    email: None,
                    department: None,
                    position: None,
                    hire_date: None,
                    monthly_salary: 1600.0,
                },
                monday(8, 0),
            )
            .unwrap()
            .id
            .unwrap();

        let shifts = ShiftService::new(
            ShiftRepository::new(db.clone()),
            clock.clone(),
            &Config::default(),
        );
        let service = crate::attendance::AttendanceService::new(
            attendance.clone(),
            employees,
            shifts,
            clock.clone(),
        );
        service.check_in_at(employee_id, monday(9, 0)).unwrap();
        let attendance_id = service.check_out_at(employee_id, monday(17, 0)).unwrap().attendance_id;

        (ModificationService::new(attendance, clock), attendance_id)
    }

    #[test]
    fn test_modify_appends_exactly_one_audit_row() {
        let (service, attendance_id) = fixture();

        service
            .modify(
                attendance_id,
                AttendanceField::CheckOut,
                Some("2025-06-02 18:00:00".into()),
                "Forgot badge at gate",
                7,
            )
            .unwrap();

        let history = service.history(attendance_id).unwrap();
        assert_eq!(history.len(), 1);
        let entry = &history[0];
        assert_eq!(entry.field_changed, AttendanceField::CheckOut);
        assert_eq!(entry.old_value.as_deref(), Some("2025-06-02 17:00:00"));
        assert_eq!(entry.new_value.as_deref(), Some("2025-06-02 18:00:00"));
        assert_eq!(entry.reason, "Forgot badge at gate");
        assert_eq!(entry.modified_by, 7);
    }

    #[test]
    fn test_timestamp_edit_recomputes_total_hours() {
        let (service, attendance_id) = fixture();

        service
            .modify(
                attendance_id,
                AttendanceField::CheckOut,
                Some("2025-06-02T19:30".into()),
                "Worked the evening rush",
                7,
            )
            .unwrap();

        let record = service.attendance.find_by_id(attendance_id).unwrap().unwrap();
        assert_eq!(record.total_hours, 10.5);
    }

    #[test]
    fn test_clearing_check_out_zeroes_hours() {
        let (service, attendance_id) = fixture();

        service
            .modify(attendance_id, AttendanceField::CheckOut, None, "Re-open session", 7)
            .unwrap();

        let record = service.attendance.find_by_id(attendance_id).unwrap().unwrap();
        assert!(record.check_out.is_none());
        assert_eq!(record.total_hours, 0.0);

        let history = service.history(attendance_id).unwrap();
        assert_eq!(history[0].old_value.as_deref(), Some("2025-06-02 17:00:00"));
        assert!(history[0].new_value.is_none());
    }

    #[test]
    fn test_missing_reason_rejected_without_audit_row() {
        let (service, attendance_id) = fixture();

        let err = service
            .modify(
                attendance_id,
                AttendanceField::Status,
                Some("late".into()),
                "  ",
                7,
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(service.history(attendance_id).unwrap().is_empty());
    }

    #[test]
    fn test_bad_datetime_rejected_before_mutation() {
        let (service, attendance_id) = fixture();

        let err = service
            .modify(
                attendance_id,
                AttendanceField::CheckIn,
                Some("11/10/2025 9am".into()),
                "Fix typo",
                7,
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let record = service.attendance.find_by_id(attendance_id).unwrap().unwrap();
        assert_eq!(record.check_in, Some(monday(9, 0)));
        assert!(service.history(attendance_id).unwrap().is_empty());
    }

    #[test]
    fn test_bulk_failures_do_not_abort_batch() {
        let (service, attendance_id) = fixture();

        let outcome = service.modify_bulk(
            vec![
                BulkEdit {
                    attendance_id,
                    field: AttendanceField::Status,
                    new_value: Some("late".into()),
                    reason: "Gate camera shows 09:20".into(),
                },
                BulkEdit {
                    attendance_id: 9999,
                    field: AttendanceField::Notes,
                    new_value: Some("ghost".into()),
                    reason: "Should fail".into(),
                },
                BulkEdit {
                    attendance_id,
                    field: AttendanceField::Notes,
                    new_value: Some("Adjusted after review".into()),
                    reason: "Weekly review".into(),
                },
            ],
            7,
        );

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("9999"));
    }
}
