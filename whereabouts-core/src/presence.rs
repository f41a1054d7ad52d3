//! The single, board-wide presence status.

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::time::format_in_zone;

/// Presence value. The three known literals are what the server accepts;
/// anything else it reports is carried as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PresenceStatus {
    Present,
    Absent,
    LeftWithBackpack,
    Unknown(String),
}

impl PresenceStatus {
    pub const PRESENT: &'static str = "在";
    pub const ABSENT: &'static str = "不在";
    pub const LEFT_WITH_BACKPACK: &'static str = "背包走了";

    /// The statuses a user can set.
    pub const SETTABLE: [PresenceStatus; 3] = [
        PresenceStatus::Present,
        PresenceStatus::Absent,
        PresenceStatus::LeftWithBackpack,
    ];

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            Self::PRESENT => PresenceStatus::Present,
            Self::ABSENT => PresenceStatus::Absent,
            Self::LEFT_WITH_BACKPACK => PresenceStatus::LeftWithBackpack,
            other => PresenceStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PresenceStatus::Present => Self::PRESENT,
            PresenceStatus::Absent => Self::ABSENT,
            PresenceStatus::LeftWithBackpack => Self::LEFT_WITH_BACKPACK,
            PresenceStatus::Unknown(raw) => raw,
        }
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            PresenceStatus::Present => StatusCategory::In,
            PresenceStatus::Absent => StatusCategory::Out,
            PresenceStatus::LeftWithBackpack => StatusCategory::Gone,
            PresenceStatus::Unknown(_) => StatusCategory::Unknown,
        }
    }
}

impl From<String> for PresenceStatus {
    fn from(raw: String) -> Self {
        PresenceStatus::from_wire(&raw)
    }
}

impl From<PresenceStatus> for String {
    fn from(status: PresenceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display category for a status, chosen by exact string match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    In,
    Out,
    Gone,
    Unknown,
}

/// Current status as `GET /api/status_712` and the live stream report it.
/// `created_at` is zone-naive UTC, or empty when nothing was ever set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// What the status display shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub category: StatusCategory,
    /// "(updated: ...)" in the display zone, or empty.
    pub updated_label: String,
}

impl StatusView {
    pub fn from_snapshot(snapshot: &StatusSnapshot, tz: &Tz) -> Self {
        let category = PresenceStatus::from_wire(&snapshot.status).category();

        let updated_label = if snapshot.created_at.trim().is_empty() {
            String::new()
        } else {
            format!("(updated: {})", format_in_zone(&snapshot.created_at, tz))
        };

        StatusView {
            text: snapshot.status.clone(),
            category,
            updated_label,
        }
    }

    /// Shown when the status could not be fetched.
    pub fn lookup_failed() -> Self {
        StatusView {
            text: "lookup failed".to_string(),
            category: StatusCategory::Unknown,
            updated_label: String::new(),
        }
    }
}
