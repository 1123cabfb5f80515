//! 时间工具函数
//!
//! 所有字符串→日期/时间转换统一在这里完成，
//! repository 层只接收已解析的 chrono 类型。

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::invalid_input(format!("Invalid time format: {}", time)))
}

/// 解析日期时间字符串
///
/// Accepts both the HTML `datetime-local` shape (`2025-10-11T16:00`) and the
/// plain `%Y-%m-%d %H:%M:%S` shape used by admin tooling.
pub fn parse_datetime(value: &str) -> AppResult<NaiveDateTime> {
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
    } else {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
    }
    .map_err(|_| AppError::invalid_input(format!("Invalid datetime format: {}", value)))
}

/// 解析星期名 (大小写不敏感)
pub fn parse_weekday(name: &str) -> AppResult<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(AppError::invalid_input(format!(
            "Invalid weekday name: {}",
            name
        ))),
    }
}

/// 星期 → 小写英文名 (存储格式)
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// 是否为工作日 (周一至周五)
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 四舍五入到 2 位小数 (小时数 / 金额)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
