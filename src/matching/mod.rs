//! 人脸匹配模块
//!
//! - [`FeatureVector`] - 固定长度特征向量 (存储格式: JSON float array)
//! - [`FaceMatcher`] - 相关系数匹配器 (nearest-neighbor under tolerance)
//! - [`FeatureExtractor`] - 外部视觉库的注入点 (black box)
//! - [`RecognitionService`] - 注册/识别流程

pub mod feature;
pub mod matcher;
pub mod service;

pub use feature::FeatureVector;
pub use matcher::FaceMatcher;
pub use service::{FeatureExtractor, MatchHit, RecognitionService};
