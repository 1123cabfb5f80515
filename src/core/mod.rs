//! 核心模块 - 配置与时钟
//!
//! - [`Config`] - 环境变量驱动的运行配置
//! - [`Clock`] - 可注入的"当前时间"提供者

pub mod clock;
pub mod config;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
