//! 班次模块
//!
//! Shift CRUD, template assignment, and the per-weekday resolver the
//! attendance state machine leans on.

pub mod service;

pub use service::ShiftService;
