//! Data Models
//!
//! Typed entities shared by repositories and services. Serialization matches
//! the storage-boundary contracts: feature vectors as ordered float arrays,
//! day-of-week sets as lowercase weekday names, shift times as `HH:MM`.

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod salary_rule;
pub mod serde_helpers;
pub mod shift;

pub use attendance::{
    AttendanceField, AttendanceId, AttendanceModification, AttendanceRecord, AttendanceStatus,
};
pub use employee::{Employee, EmployeeCreate, EmployeeId, EmployeeUpdate};
pub use payroll::{PayrollPeriod, PayrollRecord, PayrollStatus, PeriodId, PeriodStatus};
pub use salary_rule::{RuleType, SalaryRule};
pub use shift::{Shift, ShiftCreate, ShiftId, ShiftUpdate};
