//! 工资模块
//!
//! Aggregates attendance into work statistics, applies the configured rule
//! set, and produces idempotent per-(employee, period) payroll records.

pub mod engine;
pub mod rules;
pub mod statistics;

pub use engine::{PayrollService, PayrollSummary, PeriodRunOutcome};
pub use statistics::WorkStatistics;
