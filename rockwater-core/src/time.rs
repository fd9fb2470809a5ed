//! Time utilities: minute arithmetic and timezone-aware display.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A point in time. Always UTC inside the core; zones only matter for display.
pub type PointInTime = DateTime<Utc>;

/// `t + minutes`, or `None` when the result leaves chrono's representable range.
pub fn checked_add_minutes(t: PointInTime, minutes: i32) -> Option<PointInTime> {
    t.checked_add_signed(Duration::minutes(i64::from(minutes)))
}

/// Whole minutes from `a` to `b` (negative when `b` is earlier).
pub fn minutes_between(a: PointInTime, b: PointInTime) -> i64 {
    (b - a).num_minutes()
}

/// Parse a local time like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_to_utc(local: &str, tz: &str) -> Result<PointInTime> {
    let tz = parse_tz(tz)?;

    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// "HH:MM" in the given zone.
pub fn format_clock(t: PointInTime, tz: &str) -> Result<String> {
    let tz = parse_tz(tz)?;
    Ok(t.with_timezone(&tz).format("%H:%M").to_string())
}

/// Whether two instants fall on the same calendar day in `tz`.
pub fn is_same_local_day(a: PointInTime, b: PointInTime, tz: &str) -> Result<bool> {
    let tz = parse_tz(tz)?;
    Ok(a.with_timezone(&tz).date_naive() == b.with_timezone(&tz).date_naive())
}

/// Helper: format a UTC time into RFC3339.
pub fn to_rfc3339_utc(dt: PointInTime) -> String {
    dt.to_rfc3339()
}

pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}
