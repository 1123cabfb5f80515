//! Shift Model (班次管理)
//!
//! A shift row is either a *template* (`employee_id` is `None`) or an
//! *assignment* bound to exactly one employee. Templates are copied into
//! assignments, never referenced, so later template edits do not silently
//! change an employee's schedule.

use chrono::{NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{self, default_true};

/// Shift ID type
pub type ShiftId = i64;

/// Shift entity (班次)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: Option<ShiftId>,

    /// 所属员工 (None = 模板)
    pub employee_id: Option<i64>,

    /// 班次名称
    pub name: String,

    /// 上班时间
    #[serde(with = "serde_helpers::hhmm")]
    pub start_time: NaiveTime,

    /// 下班时间 (小于 start_time ⇒ 跨夜班)
    #[serde(with = "serde_helpers::hhmm")]
    pub end_time: NaiveTime,

    /// 适用星期 (小写英文名存储)
    #[serde(with = "serde_helpers::weekday_list")]
    pub days_of_week: Vec<Weekday>,

    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Shift {
    /// Template shifts have no employee owner.
    pub fn is_template(&self) -> bool {
        self.employee_id.is_none()
    }

    /// Overnight shift: end-of-day wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn covers_day(&self, day: Weekday) -> bool {
        self.days_of_week.contains(&day)
    }

    /// Expected shift duration in hours, overnight-aware.
    ///
    /// `start=22:00, end=06:00` ⇒ `(24 − 22) + 6 = 8.0`
    pub fn duration_hours(&self) -> f64 {
        let start = self.start_time.hour() as f64 + self.start_time.minute() as f64 / 60.0;
        let end = self.end_time.hour() as f64 + self.end_time.minute() as f64 / 60.0;
        if self.is_overnight() {
            (24.0 - start) + end
        } else {
            end - start
        }
    }
}

/// Create shift payload (assignment or template)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub employee_id: Option<i64>,
    pub name: String,
    #[serde(with = "serde_helpers::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "serde_helpers::hhmm")]
    pub end_time: NaiveTime,
    #[serde(with = "serde_helpers::weekday_list")]
    pub days_of_week: Vec<Weekday>,
    pub description: Option<String>,
}

/// Update shift payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<Weekday>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
