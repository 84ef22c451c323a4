//! 时间工具函数 — UTC 日期转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Invalid date format. Please use YYYY-MM-DD."))
}

/// 当前 UTC 日期
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// 日期开始 (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
        .timestamp_millis()
}

/// 日期结束 → 次日 00:00:00 UTC 的 Unix millis
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day)
}

/// Unix millis → RFC 3339 字符串 (UTC)
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
