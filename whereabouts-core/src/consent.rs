//! Locally persisted notification consent.
//!
//! This records what the user told *us* (enable, skip, ...) and is only used
//! to decide whether the onboarding guide should be shown again. The
//! platform's own permission state is tracked separately.

use std::fmt;
use std::path::PathBuf;

use crate::error::WhereaboutsResult;
use crate::state::StateDir;

const CONSENT_FILE: &str = "notification_setting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationConsent {
    #[default]
    Unset,
    Granted,
    Denied,
    Skipped,
    Unsupported,
}

impl NotificationConsent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationConsent::Unset => "unset",
            NotificationConsent::Granted => "granted",
            NotificationConsent::Denied => "denied",
            NotificationConsent::Skipped => "skipped",
            NotificationConsent::Unsupported => "unsupported",
        }
    }

    /// Parse a stored value. Anything unrecognized reads as `Unset`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "granted" => NotificationConsent::Granted,
            "denied" => NotificationConsent::Denied,
            "skipped" => NotificationConsent::Skipped,
            "unsupported" => NotificationConsent::Unsupported,
            _ => NotificationConsent::Unset,
        }
    }
}

impl fmt::Display for NotificationConsent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The file holding the consent value.
#[derive(Debug, Clone)]
pub struct ConsentStore {
    state: StateDir,
}

impl ConsentStore {
    pub fn new(state: StateDir) -> Self {
        ConsentStore { state }
    }

    pub fn open_default() -> WhereaboutsResult<Self> {
        Ok(Self::new(StateDir::open_default()?))
    }

    pub fn path(&self) -> PathBuf {
        self.state.path().join(CONSENT_FILE)
    }

    pub fn load(&self) -> NotificationConsent {
        self.state
            .read(CONSENT_FILE)
            .map(|content| NotificationConsent::parse(&content))
            .unwrap_or_default()
    }

    pub fn save(&self, consent: NotificationConsent) -> WhereaboutsResult<()> {
        self.state.write(CONSENT_FILE, consent.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConsentStore::new(StateDir::new(dir.path()));
        assert_eq!(store.load(), NotificationConsent::Unset);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConsentStore::new(StateDir::new(dir.path().join("nested")));

        store.save(NotificationConsent::Skipped).unwrap();
        assert_eq!(store.load(), NotificationConsent::Skipped);

        store.save(NotificationConsent::Granted).unwrap();
        assert_eq!(store.load(), NotificationConsent::Granted);
        assert!(!dir.path().join("nested/notification_setting.tmp").exists());
    }

    #[test]
    fn garbage_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONSENT_FILE), "maybe later").unwrap();
        assert_eq!(ConsentStore::new(StateDir::new(dir.path())).load(), NotificationConsent::Unset);
    }
}
