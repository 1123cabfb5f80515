use chrono::NaiveTime;

/// 考勤/工资核心配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | MATCH_TOLERANCE | 0.6 | 人脸相似度阈值 (0-1, similarity 刻度) |
/// | LATE_GRACE_MINUTES | 15 | 迟到宽限 (分钟) |
/// | STANDARD_DAY_HOURS | 8.0 | 标准工作日小时数 |
/// | MONTHLY_HOURS | 160.0 | 月薪→时薪换算小时数 (20 天 × 8 小时) |
/// | OVERTIME_MULTIPLIER | 1.5 | 默认加班倍率 |
/// | WORKDAY_START | 09:00 | 工资统计用的标准上班时间 |
///
/// # 示例
///
/// ```ignore
/// MATCH_TOLERANCE=0.7 LATE_GRACE_MINUTES=10 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 人脸匹配阈值 (similarity 刻度, 越高越严格)
    pub match_tolerance: f64,
    /// 迟到宽限分钟数 (超过班次开始时间 + 宽限才算迟到)
    pub late_grace_minutes: i64,
    /// 标准工作日小时数
    pub standard_day_hours: f64,
    /// 月薪换算时薪的除数
    pub monthly_hours: f64,
    /// 默认加班倍率 (可被 overtime 规则覆盖)
    pub overtime_multiplier: f64,
    /// 标准上班时间 (工资统计判定迟到用)
    pub workday_start: NaiveTime,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            match_tolerance: std::env::var("MATCH_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.6),
            late_grace_minutes: std::env::var("LATE_GRACE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            standard_day_hours: std::env::var("STANDARD_DAY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8.0),
            monthly_hours: std::env::var("MONTHLY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(160.0),
            overtime_multiplier: std::env::var("OVERTIME_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.5),
            workday_start: std::env::var("WORKDAY_START")
                .ok()
                .and_then(|v| crate::utils::time::parse_hhmm(&v).ok())
                .unwrap_or_else(|| NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_tolerance: 0.6,
            late_grace_minutes: 15,
            standard_day_hours: 8.0,
            monthly_hours: 160.0,
            overtime_multiplier: 1.5,
            workday_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        }
    }
}
