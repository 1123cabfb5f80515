//! 考勤模块
//!
//! Per-employee-per-day state machine (`NoSession → CheckedIn → CheckedOut`),
//! audited administrative overrides, and compliance reporting.

pub mod modification;
pub mod report;
pub mod service;

pub use modification::{BulkEdit, BulkModificationOutcome, ModificationService};
pub use report::ComplianceReport;
pub use service::{AttendanceService, CheckInOutcome, CheckOutOutcome, ShiftSummary};
