//! Timestamp parsing and display-zone formatting.
//!
//! The board server hands out two flavours of timestamps: presence status
//! times are zone-naive UTC, schedule entry times are either offset-bearing
//! (written by drag/resize) or zone-naive in the board's display zone
//! (written by the create form). Everything is normalized to `DateTime<Utc>`
//! at the edge and only converted back to the display zone for rendering.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::entry::EntryWindow;
use crate::error::{WhereaboutsError, WhereaboutsResult};

/// Length of the window a new entry gets when no explicit end is given.
pub const DEFAULT_ENTRY_LENGTH_MINUTES: i64 = 60;

/// Display format for status timestamps (24-hour clock).
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Form field format, the same shape a `datetime-local` input uses.
const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a server timestamp. Strings carrying an offset are absolute;
/// zone-naive strings are read as wall-clock time in `naive_zone`.
pub fn parse_instant(raw: &str, naive_zone: &Tz) -> WhereaboutsResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| WhereaboutsError::InvalidTimestamp(raw.to_string()))?;

    naive_zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| WhereaboutsError::InvalidTimestamp(raw.to_string()))
}

/// Parse a zone-naive server timestamp as UTC.
pub fn parse_server_timestamp(raw: &str) -> WhereaboutsResult<DateTime<Utc>> {
    parse_instant(raw, &chrono_tz::UTC)
}

/// Format a server timestamp in the display zone.
///
/// Empty input yields an empty string. Input that cannot be parsed is
/// returned unchanged rather than hidden.
pub fn format_in_zone(raw: &str, tz: &Tz) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    match parse_server_timestamp(raw) {
        Ok(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The window offered for a new entry: `now .. now + 1h`.
pub fn default_window(now: DateTime<Utc>) -> EntryWindow {
    EntryWindow {
        start: now,
        end: now + Duration::minutes(DEFAULT_ENTRY_LENGTH_MINUTES),
    }
}

/// Render an instant as a form field value in the display zone.
pub fn to_local_input(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format(LOCAL_INPUT_FORMAT).to_string()
}

/// Parse a form field value (`YYYY-MM-DDTHH:MM`) in the display zone.
pub fn parse_local_input(raw: &str, tz: &Tz) -> WhereaboutsResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), LOCAL_INPUT_FORMAT)
        .map_err(|_| WhereaboutsError::InvalidTimestamp(raw.to_string()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| WhereaboutsError::InvalidTimestamp(raw.to_string()))
}
