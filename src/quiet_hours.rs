//! Time-of-day gate with wrap-around support.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

use crate::config::QuietHours;

/// True when `hour` falls inside the configured quiet interval.
/// `start <= end` means `[start, end)`; `start > end` wraps past midnight.
pub fn is_quiet(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Hour-of-day for `timestamp` (unix seconds) shifted by a fixed offset in
/// hours. A fixed offset, not a tz database lookup: single-region deployment,
/// no DST.
pub fn local_hour(timestamp: i64, utc_offset_hours: i32) -> u32 {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| Utc.fix());
    let utc: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    utc.with_timezone(&offset).hour()
}

/// True when quiet hours are enabled and the event timestamp falls inside
/// the configured interval.
pub fn applies(cfg: &QuietHours, timestamp: i64) -> bool {
    cfg.enabled
        && is_quiet(
            local_hour(timestamp, cfg.utc_offset_hours),
            cfg.start_hour,
            cfg.end_hour,
        )
}
