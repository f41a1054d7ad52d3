//! Wire types for the board server's JSON API.
//!
//! Request bodies mirror what the server validates; response types are
//! deliberately loose (optional fields, raw timestamp strings) so one odd row
//! does not poison a whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::EntryId;

/// A schedule entry exactly as `GET /api/status` returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEntry {
    pub id: EntryId,
    pub location: String,
    #[serde(default)]
    pub info_source: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /api/update`. Missing times are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub location: String,
    pub info_source: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/update/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWindowRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Body of `POST /api/status_712`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

/// Error body. The server answers `{"error": ...}` for rejected values and
/// `{"detail": ...}` for request validation failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }

        match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .map(String::from)
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}
