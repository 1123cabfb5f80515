//! 数据库层 - 模型与仓储
//!
//! The durable storage engine is an external collaborator; this layer is the
//! generic repository surface the core computes against (CRUD-by-id plus
//! filtered queries), backed by an in-process store.

pub mod models;
pub mod repository;

pub use repository::Db;
