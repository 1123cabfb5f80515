//! 统一错误处理
//!
//! 提供应用级错误类型：
//! - [`AppError`] - 应用错误枚举
//!
//! # 错误分类
//!
//! | 分类 | 说明 |
//! |------|------|
//! | 业务逻辑错误 | 资源不存在、重复打卡、无打卡记录 |
//! | 输入错误 | 向量长度不符、无效日期/星期 |
//! | 数据错误 | 存储的特征向量无法解析 |
//! | 系统错误 | 存储错误、工资计算失败 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Employee not found"))
//! ```

use tracing::error;

/// 应用错误枚举
///
/// State-machine violations ([`AppError::AlreadyCheckedIn`],
/// [`AppError::NoOpenSession`]) are user-facing rejections, not faults:
/// callers surface the message and carry on. [`AppError::CorruptData`] is
/// recoverable inside batch scans and must never abort a whole batch.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (员工/班次/周期/记录)
    NotFound(String),

    #[error("Employee already checked in today (attendance {attendance_id})")]
    /// 当天已有未关闭的打卡记录
    AlreadyCheckedIn { attendance_id: i64 },

    #[error("No check-in record found for today")]
    /// 当天无打卡记录，无法签退
    NoOpenSession,

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (员工编号重复)
    Conflict(String),

    // ========== 输入错误 ==========
    #[error("Invalid input: {0}")]
    /// 无效输入 (向量长度、日期格式、星期名)
    InvalidInput(String),

    // ========== 数据错误 ==========
    #[error("Corrupt stored data: {0}")]
    /// 存储数据损坏 (特征向量解析失败)
    CorruptData(String),

    // ========== 系统错误 ==========
    #[error("Payroll calculation failed: {0}")]
    /// 工资计算失败
    Calculation(String),

    #[error("Storage error: {0}")]
    /// 存储层错误
    Database(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn corrupt_data(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }

    pub fn calculation(msg: impl Into<String>) -> Self {
        Self::Calculation(msg.into())
    }

    /// Whether the error is a state-machine precondition rejection
    /// (safe to surface verbatim, no operator attention required).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::AlreadyCheckedIn { .. } | Self::NoOpenSession)
    }
}

impl From<crate::db::repository::RepoError> for AppError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::InvalidInput(msg),
            RepoError::Database(msg) => {
                error!(target: "database", error = %msg, "Storage error occurred");
                AppError::Database(msg)
            }
        }
    }
}
