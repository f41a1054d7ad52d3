//! Core types for whereabouts.
//!
//! Shared between the terminal client and anything else that talks to the
//! board server:
//! - `entry` / `conflict`: schedule entries and pairwise overlap detection
//! - `presence`: the board-wide presence status and its display categories
//! - `consent` / `state`: locally persisted notification consent
//! - `reconnect`: the live stream's reconnect state machine
//! - `protocol`: JSON bodies of the server API

pub mod config;
pub mod conflict;
pub mod consent;
pub mod entry;
pub mod error;
pub mod presence;
pub mod protocol;
pub mod reconnect;
pub mod state;
pub mod time;

pub use conflict::detect_conflicts;
pub use entry::{ConflictAnnotatedEntry, EntryId, EntryWindow, ScheduleEntry};
pub use error::{WhereaboutsError, WhereaboutsResult};
pub use presence::{PresenceStatus, StatusCategory, StatusSnapshot, StatusView};
