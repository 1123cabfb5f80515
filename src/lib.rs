//! Faceclock - 人脸识别考勤与工资核算核心
//!
//! # 架构概述
//!
//! 本 crate 提供考勤系统的业务核心，供上层 API/桌面端接入：
//!
//! - **人脸匹配** (`matching`): 特征向量比对、员工识别
//! - **班次** (`shifts`): 班次模板、分配、迟到判定
//! - **考勤** (`attendance`): 签到/签退状态机、审计修改、合规报表
//! - **工资** (`payroll`): 工时统计、薪资规则、周期核算
//! - **存储** (`db`): 模型与仓储层
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、时钟
//! ├── matching/      # 人脸特征比对
//! ├── shifts/        # 班次解析
//! ├── attendance/    # 考勤状态机
//! ├── payroll/       # 工资引擎
//! ├── db/            # 模型 + 仓储
//! └── utils/         # 错误、时间、日志
//! ```

pub mod attendance;
pub mod core;
pub mod db;
pub mod matching;
pub mod payroll;
pub mod shifts;
pub mod utils;

// Re-export 公共类型
pub use attendance::{AttendanceService, ModificationService};
pub use core::{Clock, Config, SystemClock};
pub use matching::{FaceMatcher, FeatureVector, RecognitionService};
pub use payroll::{PayrollService, WorkStatistics};
pub use shifts::ShiftService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
