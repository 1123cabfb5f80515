//! Unified Result Types
//!
//! Provides type aliases for commonly used Result types across the application

use crate::utils::AppError;

/// Application-level Result type
///
/// Used in service methods and application logic
pub type AppResult<T> = Result<T, AppError>;
