//! Attendance Model (考勤记录)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::AppError;

/// Attendance record ID type
pub type AttendanceId = i64;

/// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    HalfDay,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::Present
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
            Self::HalfDay => "half_day",
        };
        f.write_str(s)
    }
}

impl FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "late" => Ok(Self::Late),
            "absent" => Ok(Self::Absent),
            "half_day" => Ok(Self::HalfDay),
            other => Err(AppError::invalid_input(format!(
                "Invalid attendance status: {other}"
            ))),
        }
    }
}

/// Attendance record: one row per employee per calendar date.
///
/// An *open* record has `check_in` set and `check_out` unset.
/// The repository enforces at most one open record per (employee, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Option<AttendanceId>,
    pub employee_id: i64,

    /// 打卡时解析出的班次 (可能无班次)
    pub shift_id: Option<i64>,

    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,

    /// 总工时 (签退时计算, 2 位小数)
    #[serde(default)]
    pub total_hours: f64,

    /// 加班工时 (超出班次时长的部分)
    #[serde(default)]
    pub overtime_hours: f64,

    #[serde(default)]
    pub status: AttendanceStatus,

    pub notes: Option<String>,

    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl AttendanceRecord {
    /// Open session: checked in, not yet checked out.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}

/// Modifiable attendance fields (administrative override targets)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceField {
    CheckIn,
    CheckOut,
    Status,
    Notes,
}

impl fmt::Display for AttendanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::Status => "status",
            Self::Notes => "notes",
        };
        f.write_str(s)
    }
}

impl FromStr for AttendanceField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check_in" => Ok(Self::CheckIn),
            "check_out" => Ok(Self::CheckOut),
            "status" => Ok(Self::Status),
            "notes" => Ok(Self::Notes),
            other => Err(AppError::invalid_input(format!(
                "Field is not modifiable: {other}"
            ))),
        }
    }
}

/// Append-only audit entry for manual attendance edits.
///
/// Never updated or deleted; `old_value` is `None` only when the field was
/// previously unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceModification {
    pub id: Option<i64>,
    pub attendance_id: AttendanceId,
    pub field_changed: AttendanceField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub reason: String,
    /// 操作人 (管理员用户 id)
    pub modified_by: i64,
    pub modified_at: NaiveDateTime,
}
