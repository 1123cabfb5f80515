//! Salary Rule Model (薪资规则)
//!
//! Rules are read-only inputs to the payroll engine, configured by admins.
//! The engine applies active rules in repository order (insertion order),
//! dispatching on `rule_type`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::serde_helpers::default_true;

/// Rule type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Overtime,
    Tax,
    Bonus,
    Deduction,
}

/// Salary rule entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRule {
    pub id: Option<i64>,
    pub name: String,
    pub rule_type: RuleType,

    /// 加班触发阈值 (小时, 可选)
    pub threshold_hours: Option<f64>,
    /// 加班倍率 (overtime 规则)
    pub rate_multiplier: Option<f64>,
    /// 固定金额 (bonus/deduction/tax)
    pub fixed_amount: Option<f64>,
    /// 百分比 (0-100, percentage 优先于 fixed_amount)
    pub percentage: Option<f64>,

    // ===== 适用范围 =====
    #[serde(default = "default_true")]
    pub applies_to_all: bool,
    pub department_filter: Option<String>,
    pub position_filter: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub created_at: Option<NaiveDateTime>,
}
