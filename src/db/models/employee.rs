//! Employee Model (员工管理)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::default_true;

/// Employee ID type (internal numeric id)
pub type EmployeeId = i64;

/// Employee entity
///
/// `face_encoding` holds the persisted feature vector in its storage form
/// (ordered JSON float array). Parsing into a typed
/// [`FeatureVector`](crate::matching::FeatureVector) happens in one place,
/// the recognition scan, so a corrupt row can be skipped instead of
/// poisoning every read site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,

    /// 员工编号 (业务唯一键, 如 "EMP001")
    pub code: String,

    /// 姓名
    pub name: String,

    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,

    /// 入职日期
    pub hire_date: Option<NaiveDate>,

    /// 人脸特征向量 (JSON float array 存储格式)
    pub face_encoding: Option<String>,

    /// 月薪 (用于换算时薪)
    #[serde(default)]
    pub monthly_salary: f64,

    /// 软删除标记: 员工从不物理删除，保证考勤/工资历史完整
    #[serde(default = "default_true")]
    pub is_active: bool,

    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub code: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_salary: f64,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
