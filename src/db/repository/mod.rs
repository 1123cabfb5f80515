//! Repository Module
//!
//! Per-entity repositories over a shared in-process store. Each repository
//! takes a cheap [`Db`] clone; all access goes through per-table
//! `parking_lot::RwLock`s, which is the serialization point the attendance
//! invariant relies on (unique open session per employee per date).

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod salary_rule;
pub mod shift;

// Re-exports
pub use attendance::AttendanceRepository;
pub use employee::EmployeeRepository;
pub use payroll::PayrollRepository;
pub use salary_rule::SalaryRuleRepository;
pub use shift::ShiftRepository;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::db::models::{
    AttendanceModification, AttendanceRecord, Employee, PayrollPeriod, PayrollRecord, SalaryRule,
    Shift,
};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Repository-level Result type
pub type RepoResult<T> = Result<T, RepoError>;

/// Shared store handle; clone freely, all clones see the same tables.
#[derive(Clone, Default)]
pub struct Db {
    pub(crate) tables: Arc<Tables>,
}

impl Db {
    pub fn open_in_memory() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

/// In-memory tables. `BTreeMap` keeps iteration in id (insertion) order,
/// which is the documented "repository order" rule evaluation depends on.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) employees: RwLock<BTreeMap<i64, Employee>>,
    pub(crate) shifts: RwLock<BTreeMap<i64, Shift>>,
    pub(crate) attendance: RwLock<BTreeMap<i64, AttendanceRecord>>,
    pub(crate) modifications: RwLock<Vec<AttendanceModification>>,
    pub(crate) periods: RwLock<BTreeMap<i64, PayrollPeriod>>,
    pub(crate) payroll_records: RwLock<BTreeMap<i64, PayrollRecord>>,
    pub(crate) salary_rules: RwLock<BTreeMap<i64, SalaryRule>>,
}

/// Next id for a table: max key + 1 (derived under the caller's write lock).
pub(crate) fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |last| last + 1)
}
