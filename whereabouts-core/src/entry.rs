//! Schedule entries: time-blocked "where am I" records owned by the server.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::WhereaboutsResult;
use crate::protocol::WireEntry;
use crate::time::parse_instant;

/// Server-assigned entry identifier.
pub type EntryId = i64;

/// A schedule entry as the client sees it, with absolute start/end instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub location: String,
    pub info_source: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ScheduleEntry {
    /// Convert a wire entry, reading zone-naive times in `tz`.
    pub fn from_wire(wire: WireEntry, tz: &Tz) -> WhereaboutsResult<Self> {
        let start_time = parse_instant(wire.start_time.as_deref().unwrap_or_default(), tz)?;
        let end_time = parse_instant(wire.end_time.as_deref().unwrap_or_default(), tz)?;

        let info_source = wire.info_source.filter(|s| !s.trim().is_empty());

        Ok(ScheduleEntry {
            id: wire.id,
            location: wire.location,
            info_source,
            start_time,
            end_time,
        })
    }

    pub fn window(&self) -> EntryWindow {
        EntryWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn set_window(&mut self, window: EntryWindow) {
        self.start_time = window.start;
        self.end_time = window.end;
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

/// A start/end pair in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An entry plus the derived overlap flag. Recomputed on every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictAnnotatedEntry {
    pub entry: ScheduleEntry,
    pub is_conflicting: bool,
}
