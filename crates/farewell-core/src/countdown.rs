//! Time remaining until the homecoming.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_done: bool,
}

impl TimeLeft {
    pub const DONE: TimeLeft = TimeLeft {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        is_done: true,
    };
}

pub fn time_left(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let remaining = (target - now).num_seconds();
    if remaining <= 0 {
        return TimeLeft::DONE;
    }
    TimeLeft {
        days: remaining / 86_400,
        hours: (remaining / 3_600) % 24,
        minutes: (remaining / 60) % 60,
        seconds: remaining % 60,
        is_done: false,
    }
}

/// Parse an RFC 3339 timestamp, or a zone-less `YYYY-MM-DDTHH:MM:SS`
/// interpreted in the local time zone.
pub fn parse_target(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
