//! Payroll Models (工资周期 / 工资记录)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Payroll period ID type
pub type PeriodId = i64;

/// 工资周期状态: 单调推进, 从不回退
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Draft,
    Processing,
    Completed,
    Paid,
}

impl PeriodStatus {
    /// Status only ever advances draft → processing → completed → paid.
    pub fn can_advance_to(self, next: PeriodStatus) -> bool {
        next >= self
    }
}

/// Payroll period entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub id: Option<PeriodId>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
    pub created_at: Option<NaiveDateTime>,
}

/// 工资记录状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    Pending,
    Approved,
    Paid,
}

/// Payroll record: one per (employee, period).
///
/// Every derived field is overwritten on recalculation; the record is an
/// idempotent projection of the period's attendance data plus the active
/// rule set at calculation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub id: Option<i64>,
    pub employee_id: i64,
    pub period_id: PeriodId,

    // ===== 工时统计 =====
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub days_worked: u32,
    pub days_absent: u32,
    pub days_late: u32,

    // ===== 工资构成 =====
    /// 月薪快照
    pub base_salary: f64,
    /// 时薪 (base_salary / MONTHLY_HOURS)
    pub hourly_rate: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub bonus: f64,

    // ===== 扣款 =====
    pub tax_deduction: f64,
    pub insurance_deduction: f64,
    pub other_deductions: f64,
    pub late_penalty: f64,
    pub absence_deduction: f64,

    // ===== 汇总 =====
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,

    pub status: PayrollStatus,
    pub approved_by: Option<i64>,
    pub approved_at: Option<NaiveDateTime>,
    pub calculated_at: Option<NaiveDateTime>,
}

impl PayrollRecord {
    /// Fresh zeroed record for an (employee, period) pair.
    pub fn blank(employee_id: i64, period_id: PeriodId) -> Self {
        Self {
            id: None,
            employee_id,
            period_id,
            total_hours: 0.0,
            regular_hours: 0.0,
            overtime_hours: 0.0,
            days_worked: 0,
            days_absent: 0,
            days_late: 0,
            base_salary: 0.0,
            hourly_rate: 0.0,
            regular_pay: 0.0,
            overtime_pay: 0.0,
            bonus: 0.0,
            tax_deduction: 0.0,
            insurance_deduction: 0.0,
            other_deductions: 0.0,
            late_penalty: 0.0,
            absence_deduction: 0.0,
            gross_salary: 0.0,
            total_deductions: 0.0,
            net_salary: 0.0,
            status: PayrollStatus::Pending,
            approved_by: None,
            approved_at: None,
            calculated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_status_monotonic() {
        assert!(PeriodStatus::Draft.can_advance_to(PeriodStatus::Processing));
        assert!(PeriodStatus::Processing.can_advance_to(PeriodStatus::Completed));
        assert!(PeriodStatus::Completed.can_advance_to(PeriodStatus::Completed));
        assert!(!PeriodStatus::Completed.can_advance_to(PeriodStatus::Draft));
        assert!(!PeriodStatus::Paid.can_advance_to(PeriodStatus::Processing));
    }
}
