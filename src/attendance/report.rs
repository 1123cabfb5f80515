//! Shift Compliance Report (考勤合规报表)
//!
//! Aggregates attendance over a date range for the reporting layer. The
//! document rendering (PDF/Excel) is a downstream consumer; this only
//! produces the numbers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::AttendanceStatus;
use crate::db::repository::{AttendanceRepository, ShiftRepository};
use crate::utils::AppResult;
use crate::utils::time::round2;

/// Per-shift usage statistics
#[derive(Debug, Clone, Serialize)]
pub struct ShiftUsage {
    pub shift_name: String,
    pub records: usize,
    pub avg_hours: f64,
    pub avg_overtime: f64,
}

/// 合规报表
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_records: usize,
    pub on_time_records: usize,
    pub late_records: usize,
    pub absent_records: usize,
    pub on_time_percentage: f64,
    pub late_percentage: f64,
    /// Share of records that resolved to a shift at check-in
    pub shift_coverage_percentage: f64,
    pub shift_statistics: Vec<ShiftUsage>,
}

impl ComplianceReport {
    pub fn build(
        attendance: &AttendanceRepository,
        shifts: &ShiftRepository,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Self> {
        let records = attendance.find_in_range(start_date, end_date)?;

        let total = records.len();
        let on_time = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        let late = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Late)
            .count();
        let absent = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Absent)
            .count();
        let with_shift = records.iter().filter(|r| r.shift_id.is_some()).count();

        let pct = |count: usize| {
            if total > 0 {
                round2(count as f64 / total as f64 * 100.0)
            } else {
                0.0
            }
        };

        // Hours per shift name, only for closed records
        let mut per_shift: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
        for record in &records {
            let Some(shift_id) = record.shift_id else {
                continue;
            };
            if record.total_hours == 0.0 && record.check_out.is_none() {
                continue;
            }
            let Some(shift) = shifts.find_by_id(shift_id)? else {
                continue;
            };
            let entry = per_shift.entry(shift.name).or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += record.total_hours;
            entry.2 += record.overtime_hours;
        }

        let shift_statistics = per_shift
            .into_iter()
            .map(|(shift_name, (count, hours, overtime))| ShiftUsage {
                shift_name,
                records: count,
                avg_hours: round2(hours / count as f64),
                avg_overtime: round2(overtime / count as f64),
            })
            .collect();

        Ok(Self {
            start_date,
            end_date,
            total_records: total,
            on_time_records: on_time,
            late_records: late,
            absent_records: absent,
            on_time_percentage: pct(on_time),
            late_percentage: pct(late),
            shift_coverage_percentage: pct(with_shift),
            shift_statistics,
        })
    }
}
