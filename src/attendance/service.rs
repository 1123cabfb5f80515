//! Attendance Service (打卡状态机)
//!
//! Transitions per (employee, calendar date):
//!
//! ```text
//! NoSession ──check_in──▶ CheckedIn ──check_out──▶ CheckedOut
//! ```
//!
//! The at-most-one-open-session invariant is enforced by the repository
//! under its write lock; this service re-checks up front only so it can
//! reject with the existing attendance id.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::core::Clock;
use crate::db::models::{AttendanceRecord, AttendanceStatus, Shift};
use crate::db::repository::{AttendanceRepository, EmployeeRepository, RepoError};
use crate::shifts::ShiftService;
use crate::utils::time::round2;
use crate::utils::{AppError, AppResult};

/// Shift snapshot returned to the web layer on check-in.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftSummary {
    pub id: i64,
    pub name: String,
    /// "HH:MM"
    pub start_time: String,
    pub end_time: String,
}

impl ShiftSummary {
    fn from_shift(shift: &Shift) -> Option<Self> {
        Some(Self {
            id: shift.id?,
            name: shift.name.clone(),
            start_time: shift.start_time.format("%H:%M").to_string(),
            end_time: shift.end_time.format("%H:%M").to_string(),
        })
    }
}

/// Successful check-in result
#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub attendance_id: i64,
    pub checked_in_at: NaiveDateTime,
    pub status: AttendanceStatus,
    /// Convenience flag for kiosk frontends (`status == Late`)
    pub late: bool,
    pub shift: Option<ShiftSummary>,
}

/// Successful check-out result
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutOutcome {
    pub attendance_id: i64,
    pub checked_out_at: NaiveDateTime,
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
}

/// 考勤服务
#[derive(Clone)]
pub struct AttendanceService {
    attendance: AttendanceRepository,
    employees: EmployeeRepository,
    shifts: ShiftService,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(
        attendance: AttendanceRepository,
        employees: EmployeeRepository,
        shifts: ShiftService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            attendance,
            employees,
            shifts,
            clock,
        }
    }

    pub fn check_in(&self, employee_id: i64) -> AppResult<CheckInOutcome> {
        self.check_in_at(employee_id, self.clock.now())
    }

    /// Check in at an explicit instant.
    pub fn check_in_at(&self, employee_id: i64, at: NaiveDateTime) -> AppResult<CheckInOutcome> {
        let employee = self
            .employees
            .find_by_id(employee_id)?
            .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;
        if !employee.is_active {
            return Err(AppError::invalid_input(format!(
                "Employee {} is inactive",
                employee.code
            )));
        }

        let date = at.date();

        if let Some(open) = self.attendance.find_open(employee_id, date)? {
            return Err(AppError::AlreadyCheckedIn {
                attendance_id: open.id.unwrap_or_default(),
            });
        }

        let shift = self.shifts.current_shift(employee_id, date.weekday())?;
        let status = match &shift {
            Some(shift) if self.shifts.is_late(shift, at.time()) => AttendanceStatus::Late,
            _ => AttendanceStatus::Present,
        };

        let record = AttendanceRecord {
            id: None,
            employee_id,
            shift_id: shift.as_ref().and_then(|s| s.id),
            date,
            check_in: Some(at),
            check_out: None,
            total_hours: 0.0,
            overtime_hours: 0.0,
            status,
            notes: None,
            created_at: Some(at),
            updated_at: Some(at),
        };

        let record = match self.attendance.create_checked_in(record) {
            Ok(record) => record,
            // Lost the race against a concurrent check-in for the same day
            Err(RepoError::Duplicate(_)) => {
                let open = self.attendance.find_open(employee_id, date)?;
                return Err(AppError::AlreadyCheckedIn {
                    attendance_id: open.and_then(|r| r.id).unwrap_or_default(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let attendance_id = record.id.unwrap_or_default();
        info!(employee_id, attendance_id, %status, "Employee checked in");

        Ok(CheckInOutcome {
            attendance_id,
            checked_in_at: at,
            status,
            late: status == AttendanceStatus::Late,
            shift: shift.as_ref().and_then(ShiftSummary::from_shift),
        })
    }

    pub fn check_out(&self, employee_id: i64) -> AppResult<CheckOutOutcome> {
        self.check_out_at(employee_id, self.clock.now())
    }

    /// Check out at an explicit instant and compute worked/overtime hours.
    pub fn check_out_at(&self, employee_id: i64, at: NaiveDateTime) -> AppResult<CheckOutOutcome> {
        let date = at.date();
        let mut record = self
            .attendance
            .find_open(employee_id, date)?
            .ok_or(AppError::NoOpenSession)?;

        let check_in = record.check_in.ok_or(AppError::NoOpenSession)?;
        if at < check_in {
            return Err(AppError::invalid_input(format!(
                "Check-out {at} is before check-in {check_in}"
            )));
        }

        let total_hours = (at - check_in).num_seconds() as f64 / 3600.0;

        // Split against the shift's expected duration when one was resolved
        let (regular_hours, overtime_hours) = match record.shift_id {
            Some(shift_id) => {
                let duration = self
                    .shifts
                    .get(shift_id)?
                    .map(|s| s.duration_hours())
                    .unwrap_or(total_hours);
                if total_hours > duration {
                    (duration, total_hours - duration)
                } else {
                    (total_hours, 0.0)
                }
            }
            None => (total_hours, 0.0),
        };

        record.check_out = Some(at);
        record.total_hours = round2(total_hours);
        record.overtime_hours = round2(overtime_hours);
        record.updated_at = Some(at);
        let record = self.attendance.update(record)?;

        let attendance_id = record.id.unwrap_or_default();
        info!(
            employee_id,
            attendance_id,
            total_hours = record.total_hours,
            "Employee checked out"
        );

        Ok(CheckOutOutcome {
            attendance_id,
            checked_out_at: at,
            total_hours: round2(total_hours),
            regular_hours: round2(regular_hours),
            overtime_hours: round2(overtime_hours),
        })
    }

    /// Today's record for an employee, open or closed.
    pub fn today(&self, employee_id: i64) -> AppResult<Option<AttendanceRecord>> {
        let date = self.clock.now().date();
        Ok(self.attendance.find_by_employee_and_date(employee_id, date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, FixedClock};
    use crate::db::Db;
    use crate::db::models::{EmployeeCreate, ShiftCreate};
    use crate::db::repository::ShiftRepository;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    struct Fixture {
        service: AttendanceService,
        shifts: ShiftService,
        employees: EmployeeRepository,
        clock: Arc<FixedClock>,
        employee_id: i64,
    }

    fn monday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        // 2025-06-02 is a Monday
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn fixture() -> Fixture {
        let db = Db::open_in_memory();
        let clock = Arc::new(FixedClock::new(monday(9, 0, 0)));
        let employees = EmployeeRepository::new(db.clone());
        let shifts = ShiftService::new(
            ShiftRepository::new(db.clone()),
            clock.clone(),
            &Config::default(),
        );
        let service = AttendanceService::new(
            AttendanceRepository::new(db),
            employees.clone(),
            shifts.clone(),
            clock.clone(),
        );

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
                monday(8, 0, 0),
            )
            .unwrap()
            .id
            .unwrap();

        Fixture {
            service,
            shifts,
            employees,
            clock,
            employee_id,
        }
    }

    fn assign_morning_shift(fixture: &Fixture) {
        fixture
            .shifts
            .create(ShiftCreate {
                employee_id: Some(fixture.employee_id),
                name: "Morning".into(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                days_of_week: vec![Weekday::Mon, Weekday::Tue],
                description: None,
            })
            .unwrap();
    }

    #[test]
    fn test_check_in_resolves_shift_and_status() {
        let fixture = fixture();
        assign_morning_shift(&fixture);

        let outcome = fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 5, 0))
            .unwrap();
        assert_eq!(outcome.status, AttendanceStatus::Present);
        let shift = outcome.shift.unwrap();
        assert_eq!(shift.name, "Morning");
        assert_eq!(shift.start_time, "09:00");
    }

    #[test]
    fn test_late_check_in_past_grace() {
        let fixture = fixture();
        assign_morning_shift(&fixture);

        let outcome = fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 15, 1))
            .unwrap();
        assert_eq!(outcome.status, AttendanceStatus::Late);
        assert!(outcome.late);
    }

    #[test]
    fn test_double_check_in_rejected() {
        let fixture = fixture();
        fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap();

        let err = fixture
            .service
            .check_in_at(fixture.employee_id, monday(10, 0, 0))
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyCheckedIn { .. }));
    }

    #[test]
    fn test_check_out_without_check_in_rejected() {
        let fixture = fixture();
        let err = fixture
            .service
            .check_out_at(fixture.employee_id, monday(17, 0, 0))
            .unwrap_err();
        assert!(matches!(err, AppError::NoOpenSession));
    }

    #[test]
    fn test_hours_split_against_shift_duration() {
        let fixture = fixture();
        assign_morning_shift(&fixture);

        fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap();
        // 10 hours against an 8 hour shift
        let outcome = fixture
            .service
            .check_out_at(fixture.employee_id, monday(19, 0, 0))
            .unwrap();
        assert_eq!(outcome.total_hours, 10.0);
        assert_eq!(outcome.regular_hours, 8.0);
        assert_eq!(outcome.overtime_hours, 2.0);
    }

    #[test]
    fn test_no_shift_means_no_overtime() {
        let fixture = fixture();
        fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap();
        let outcome = fixture
            .service
            .check_out_at(fixture.employee_id, monday(19, 30, 0))
            .unwrap();
        assert_eq!(outcome.total_hours, 10.5);
        assert_eq!(outcome.regular_hours, 10.5);
        assert_eq!(outcome.overtime_hours, 0.0);
    }

    #[test]
    fn test_check_in_again_after_check_out_allowed() {
        // Closing the session frees the (employee, date) slot again
        let fixture = fixture();
        fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap();
        fixture
            .service
            .check_out_at(fixture.employee_id, monday(12, 0, 0))
            .unwrap();

        let second = fixture
            .service
            .check_in_at(fixture.employee_id, monday(13, 0, 0));
        assert!(second.is_ok());
    }

    #[test]
    fn test_inactive_employee_cannot_check_in() {
        let fixture = fixture();
        fixture
            .employees
            .soft_delete(fixture.employee_id, monday(8, 30, 0))
            .unwrap();

        let err = fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_today_uses_clock_date() {
        let fixture = fixture();
        fixture.clock.set(monday(9, 0, 0));
        fixture
            .service
            .check_in_at(fixture.employee_id, monday(9, 0, 0))
            .unwrap();
        assert!(fixture.service.today(fixture.employee_id).unwrap().is_some());
    }
}
