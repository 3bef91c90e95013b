use chrono::{DateTime, Utc};

const UNITS: &[(i64, &str)] = &[
    (31_536_000, "year"),
    (2_592_000, "month"),
    (604_800, "week"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Coarse relative age of `timestamp` as seen from `now`, e.g. `"3 days ago"`.
///
/// The largest unit with a whole count of at least one wins. Anything under a
/// minute, including timestamps in the future, is `"just now"`.
pub fn time_since(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - timestamp).num_seconds();
    for &(size, unit) in UNITS {
        let count = elapsed / size;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {unit}{plural} ago");
        }
    }
    "just now".to_string()
}

pub fn time_since_now(timestamp: DateTime<Utc>) -> String {
    time_since(timestamp, Utc::now())
}

/// Parses an RFC 3339 timestamp; `None` when it is malformed.
pub fn time_since_str(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp.trim()).ok()?;
    Some(time_since(parsed.with_timezone(&Utc), now))
}
