use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse the date strings upstream emits.
///
/// - `YYYY-MM-DD`: midnight UTC
/// - RFC 3339 with offset: converted to UTC
/// - `YYYY-MM-DDTHH:MM:SS[.fff]` without offset: read as UTC
///
/// Anything else yields `None`.
pub fn parse_loose(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole days from `from` to `to`, rounded up. Negative when `to` is earlier.
pub fn ceil_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}

/// `YYYY-MM-DD` for the UTC calendar day of `now`.
pub fn day_string(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// RFC 3339 timestamp with millisecond precision and a `Z` suffix.
pub fn timestamp_string(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn one_week() -> Duration {
    Duration::days(7)
}
