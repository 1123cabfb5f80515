//! Work Statistics (工时统计)
//!
//! Pure aggregation of a period's attendance records. Expected working days
//! are weekdays (Mon-Fri) only; weekend shifts still count toward hours
//! worked but never toward absence.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::db::models::AttendanceRecord;
use crate::utils::time::is_weekday;

/// 一个工资周期内的工时统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkStatistics {
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub days_worked: u32,
    pub days_absent: u32,
    pub days_late: u32,
}

/// Weekday (Mon–Fri) count between start and end, inclusive.
pub fn expected_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut count = 0;
    let mut date = start;
    while date <= end {
        if is_weekday(date) {
            count += 1;
        }
        date += Duration::days(1);
    }
    count
}

impl WorkStatistics {
    /// Aggregate attendance records for a period.
    ///
    /// `workday_start` is the payroll-wide lateness reference (default
    /// 09:00), distinct from per-shift lateness, which is decided at
    /// check-in time against the resolved shift.
    pub fn from_records(
        records: &[AttendanceRecord],
        period_start: NaiveDate,
        period_end: NaiveDate,
        workday_start: NaiveTime,
        standard_day_hours: f64,
    ) -> Self {
        let expected_days = expected_working_days(period_start, period_end);

        let mut total_hours = 0.0;
        let mut days_worked = 0;
        let mut days_late = 0;

        for record in records {
            let Some(check_in) = record.check_in else {
                continue;
            };
            days_worked += 1;
            total_hours += record.total_hours;
            if check_in.time() > workday_start {
                days_late += 1;
            }
        }

        let days_absent = expected_days.saturating_sub(days_worked);
        let expected_total_hours = expected_days as f64 * standard_day_hours;

        Self {
            total_hours,
            regular_hours: total_hours.min(expected_total_hours),
            overtime_hours: (total_hours - expected_total_hours).max(0.0),
            days_worked,
            days_absent,
            days_late,
        }
    }
}
