//! 时间工具函数 (业务时区转换)
//!
//! 日期→时间戳转换在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 本地时间不存在时按 UTC 计算。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 次日 00:00:00 的 Unix millis，调用方使用 `< end` 语义
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// 当前日期 (业务时区)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Inclusive date strings → `[from, to)` millis
///
/// Either side may be open. `from > to` is rejected.
pub fn date_range_millis(
    from: Option<&str>,
    to: Option<&str>,
    tz: Tz,
) -> AppResult<(Option<i64>, Option<i64>)> {
    let from = from.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;
    let to = to.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;
    if let (Some(f), Some(t)) = (from, to)
        && f > t
    {
        return Err(AppError::validation(format!(
            "date_from {f} is after date_to {t}"
        )));
    }
    Ok((
        from.map(|d| day_start_millis(d, tz)),
        to.map(|d| day_end_millis(d, tz)),
    ))
}
