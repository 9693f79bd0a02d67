//! Time utilities for backend timestamps
//!
//! The analytics backend emits both RFC 3339 timestamps and naive ISO-8601
//! ones (Python `datetime.isoformat()` without an offset). Naive values are
//! taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a backend timestamp, returning `None` when it is not recognised
///
/// # Examples
/// ```
/// use funnel_watch::utils::time::parse_backend_timestamp;
///
/// assert!(parse_backend_timestamp("2024-03-01T12:30:00Z").is_some());
/// assert!(parse_backend_timestamp("2024-03-01T12:30:00.123456").is_some());
/// assert!(parse_backend_timestamp("yesterday").is_none());
/// ```
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter: optional timestamp that never fails the surrounding document
pub fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_backend_timestamp(&s),
        _ => None,
    })
}

/// Format a timestamp for console output
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Human-readable age of a timestamp relative to `now`
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use funnel_watch::utils::time::format_age;
///
/// let now = Utc::now();
/// assert_eq!(format_age(&(now - Duration::seconds(42)), &now), "42s ago");
/// assert_eq!(format_age(&(now - Duration::minutes(5)), &now), "5m ago");
/// ```
pub fn format_age(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let secs = (*now - *then).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
