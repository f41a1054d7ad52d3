//! OS-level notifications: platform permission, local consent, delivery.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono_tz::Tz;
use dialoguer::Confirm;
use tracing::{debug, info, warn};

use whereabouts_core::StatusSnapshot;
use whereabouts_core::consent::{ConsentStore, NotificationConsent};
use whereabouts_core::state::StateDir;
use whereabouts_core::time::format_in_zone;
use whereabouts_core::{WhereaboutsError, WhereaboutsResult};

use crate::surface::{GuidePanel, Surface, Toast};

/// Tag shared by every presence notification so a new push replaces the last.
pub const STATUS_NOTIFICATION_TAG: &str = "presence-status-update";
pub const TEST_NOTIFICATION_TAG: &str = "test-notification";

const PERMISSION_FILE: &str = "desktop_permission";

/// Platform permission, as the notification primitive reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotification {
    pub title: String,
    pub body: String,
    pub tag: String,
    /// Stay on screen until the user interacts with it.
    pub require_interaction: bool,
}

impl SystemNotification {
    pub fn status_update(snapshot: &StatusSnapshot, tz: &Tz) -> Self {
        SystemNotification {
            title: "Status update".to_string(),
            body: format!(
                "Latest: {}\nUpdated: {}",
                snapshot.status,
                format_in_zone(&snapshot.created_at, tz)
            ),
            tag: STATUS_NOTIFICATION_TAG.to_string(),
            require_interaction: true,
        }
    }

    pub fn test() -> Self {
        SystemNotification {
            title: "Test notification".to_string(),
            body: "Notifications are on. You will be told whenever the status changes."
                .to_string(),
            tag: TEST_NOTIFICATION_TAG.to_string(),
            require_interaction: true,
        }
    }
}

pub trait NotificationPlatform {
    /// Whether this platform can show notifications at all.
    fn is_supported(&self) -> bool;

    fn permission(&self) -> Permission;

    /// Ask the user for permission.
    fn request_permission(&mut self) -> WhereaboutsResult<Permission>;

    fn show(&self, notification: &SystemNotification) -> WhereaboutsResult<()>;
}

/// Show a notification if the platform allows it. Missing capability or
/// permission is a silent no-op; a failure to build or show the notification
/// falls back to an in-page warning toast.
pub fn send_system_notification(
    platform: &dyn NotificationPlatform,
    surface: &mut dyn Surface,
    notification: &SystemNotification,
) {
    if !platform.is_supported() {
        debug!(tag = %notification.tag, "notifications unsupported, skipping");
        return;
    }

    if platform.permission() != Permission::Granted {
        debug!(tag = %notification.tag, "no notification permission, skipping");
        return;
    }

    match platform.show(notification) {
        Ok(()) => info!(tag = %notification.tag, "system notification shown"),
        Err(e) => {
            warn!(tag = %notification.tag, error = %e, "system notification failed");
            surface.toast(Toast::warning(format!(
                "{}: {}",
                notification.title, notification.body
            )));
        }
    }
}

/// Drives the onboarding / manual guide from platform permission and the
/// locally stored consent.
pub struct ConsentFlow {
    store: ConsentStore,
}

impl ConsentFlow {
    pub fn new(store: ConsentStore) -> Self {
        ConsentFlow { store }
    }

    #[cfg(test)]
    pub fn consent(&self) -> NotificationConsent {
        self.store.load()
    }

    fn record(&self, consent: NotificationConsent) {
        debug!(%consent, "notification consent");
        if let Err(e) = self.store.save(consent) {
            warn!(error = %e, "could not persist notification consent");
        }
    }

    /// Load-time check. Returns whether notifications are granted.
    pub fn check(&mut self, platform: &dyn NotificationPlatform, surface: &mut dyn Surface) -> bool {
        if !platform.is_supported() {
            warn!("desktop notifications are not supported on this platform");
            surface.toast(Toast::warning(
                "Desktop notifications are not supported on this system",
            ));
            self.record(NotificationConsent::Unsupported);
            return false;
        }

        match platform.permission() {
            Permission::Granted => {
                self.record(NotificationConsent::Granted);
                surface.hide_guide();
                true
            }
            Permission::Denied => {
                surface.show_guide(GuidePanel::ManualSteps);
                self.record(NotificationConsent::Denied);
                false
            }
            Permission::Default => {
                if self.store.load() == NotificationConsent::Unset {
                    surface.show_guide(GuidePanel::Onboarding);
                }
                false
            }
        }
    }

    /// "Enable" in the onboarding guide.
    pub fn enable(
        &mut self,
        platform: &mut dyn NotificationPlatform,
        surface: &mut dyn Surface,
    ) -> bool {
        match platform.request_permission() {
            Ok(Permission::Granted) => {
                self.record(NotificationConsent::Granted);
                surface.hide_guide();
                send_system_notification(platform, surface, &SystemNotification::test());
                true
            }
            Ok(Permission::Denied) => {
                surface.show_guide(GuidePanel::ManualSteps);
                self.record(NotificationConsent::Denied);
                false
            }
            Ok(Permission::Default) => false,
            Err(e) => {
                warn!(error = %e, "notification permission request failed");
                false
            }
        }
    }

    /// "Skip" in the onboarding guide. Suppresses future onboarding.
    pub fn skip(&mut self, surface: &mut dyn Surface) {
        surface.hide_guide();
        self.record(NotificationConsent::Skipped);
    }

    /// "Retry" in the manual guide: run the whole check again.
    pub fn retry(&mut self, platform: &dyn NotificationPlatform, surface: &mut dyn Surface) -> bool {
        let granted = self.check(platform, surface);
        if !granted {
            surface.toast(Toast::warning(
                "Notifications are still off. Follow the steps to enable them manually.",
            ));
        }
        granted
    }
}

/// Desktop notifications through `notify-rust`. Permission is asked once
/// with a terminal prompt and remembered in the state directory.
pub struct DesktopPlatform {
    state: StateDir,
}

impl DesktopPlatform {
    pub fn new(state: StateDir) -> Self {
        DesktopPlatform { state }
    }

    fn store_permission(&self, permission: Permission) -> WhereaboutsResult<()> {
        let value = match permission {
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Default => "default",
        };
        self.state.write(PERMISSION_FILE, value)
    }
}

impl NotificationPlatform for DesktopPlatform {
    fn is_supported(&self) -> bool {
        cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly",
            target_os = "macos",
            target_os = "windows"
        ))
    }

    fn permission(&self) -> Permission {
        match self.state.read(PERMISSION_FILE).as_deref().map(str::trim) {
            Some("granted") => Permission::Granted,
            Some("denied") => Permission::Denied,
            _ => Permission::Default,
        }
    }

    fn request_permission(&mut self) -> WhereaboutsResult<Permission> {
        let answer = Confirm::new()
            .with_prompt("  Allow whereabouts to show desktop notifications?")
            .default(true)
            .interact_opt()
            .map_err(|e| WhereaboutsError::Io(std::io::Error::other(e.to_string())))?;

        let permission = match answer {
            Some(true) => Permission::Granted,
            Some(false) => Permission::Denied,
            None => return Ok(Permission::Default),
        };

        self.store_permission(permission)?;
        Ok(permission)
    }

    fn show(&self, notification: &SystemNotification) -> WhereaboutsResult<()> {
        let mut n = notify_rust::Notification::new();
        n.summary(&notification.title)
            .body(&notification.body)
            .appname("whereabouts");

        if notification.require_interaction {
            n.timeout(notify_rust::Timeout::Never);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            n.id(tag_id(&notification.tag));
            if notification.require_interaction {
                n.hint(notify_rust::Hint::Resident(true));
            }
        }

        n.show()
            .map(|_| ())
            .map_err(|e| WhereaboutsError::Io(std::io::Error::other(e.to_string())))
    }
}

/// Stable, non-zero notification id for a tag. Showing a notification with
/// an existing id replaces it.
pub fn tag_id(tag: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    tag.hash(&mut hasher);
    (hasher.finish() as u32).max(1)
}


#[cfg(test)]
mod tests {
    use super::testing::FakePlatform;
    use super::*;
    use crate::surface::ToastKind;
    use crate::surface::testing::RecordingSurface;

    fn flow() -> (ConsentFlow, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConsentStore::new(StateDir::new(dir.path()));
        (ConsentFlow::new(store), dir)
    }

    #[test]
    fn unsupported_platform_is_recorded_and_toasted() {
        let (mut flow, _dir) = flow();
        let mut surface = RecordingSurface::new();

        assert!(!flow.check(&FakePlatform::unsupported(), &mut surface));
        assert_eq!(flow.consent(), NotificationConsent::Unsupported);
        assert_eq!(surface.toast_kinds(), vec![ToastKind::Warning]);
        assert_eq!(surface.guide, None);
    }

    #[test]
    fn granted_hides_guide() {
        let (mut flow, _dir) = flow();
        let mut surface = RecordingSurface::new();
        surface.guide = Some(GuidePanel::Onboarding);

        assert!(flow.check(&FakePlatform::with_permission(Permission::Granted), &mut surface));
        assert_eq!(flow.consent(), NotificationConsent::Granted);
        assert_eq!(surface.guide, None);
    }

    #[test]
    fn denied_shows_manual_steps() {
        let (mut flow, _dir) = flow();
        let mut surface = RecordingSurface::new();

        assert!(!flow.check(&FakePlatform::with_permission(Permission::Denied), &mut surface));
        assert_eq!(flow.consent(), NotificationConsent::Denied);
        assert_eq!(surface.guide, Some(GuidePanel::ManualSteps));
    }

    #[test]
    fn onboarding_only_while_unset() {
        let (mut flow, _dir) = flow();
        let platform = FakePlatform::with_permission(Permission::Default);

        let mut surface = RecordingSurface::new();
        flow.check(&platform, &mut surface);
        assert_eq!(surface.guide, Some(GuidePanel::Onboarding));

        flow.skip(&mut surface);
        assert_eq!(surface.guide, None);
        assert_eq!(flow.consent(), NotificationConsent::Skipped);

        let mut surface = RecordingSurface::new();
        flow.check(&platform, &mut surface);
        assert_eq!(surface.guide, None);
    }

    #[test]
    fn enable_granted_sends_test_notification() {
        let (mut flow, _dir) = flow();
        let mut platform = FakePlatform::with_permission(Permission::Default);
        platform.prompt_answer = Permission::Granted;
        let mut surface = RecordingSurface::new();
        surface.guide = Some(GuidePanel::Onboarding);

        assert!(flow.enable(&mut platform, &mut surface));

        assert_eq!(platform.prompts, 1);
        assert_eq!(surface.guide, None);
        assert_eq!(flow.consent(), NotificationConsent::Granted);
        let shown = platform.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].tag, TEST_NOTIFICATION_TAG);
    }

    #[test]
    fn enable_denied_switches_to_manual_steps() {
        let (mut flow, _dir) = flow();
        let mut platform = FakePlatform::with_permission(Permission::Default);
        platform.prompt_answer = Permission::Denied;
        let mut surface = RecordingSurface::new();

        assert!(!flow.enable(&mut platform, &mut surface));
        assert_eq!(surface.guide, Some(GuidePanel::ManualSteps));
        assert_eq!(flow.consent(), NotificationConsent::Denied);
        assert!(platform.shown.borrow().is_empty());
    }

    #[test]
    fn retry_warns_when_still_off() {
        let (mut flow, _dir) = flow();
        let mut surface = RecordingSurface::new();

        assert!(!flow.retry(&FakePlatform::with_permission(Permission::Denied), &mut surface));
        assert_eq!(surface.last_toast().unwrap().kind, ToastKind::Warning);

        let mut surface = RecordingSurface::new();
        assert!(flow.retry(&FakePlatform::with_permission(Permission::Granted), &mut surface));
        assert!(surface.toasts.is_empty());
    }

    #[test]
    fn delivery_requires_exact_grant() {
        let mut surface = RecordingSurface::new();
        for platform in [
            FakePlatform::unsupported(),
            FakePlatform::with_permission(Permission::Default),
            FakePlatform::with_permission(Permission::Denied),
        ] {
            send_system_notification(&platform, &mut surface, &SystemNotification::test());
            assert!(platform.shown.borrow().is_empty());
        }
        assert!(surface.toasts.is_empty());
    }

    #[test]
    fn failed_delivery_falls_back_to_toast() {
        let mut platform = FakePlatform::with_permission(Permission::Granted);
        platform.fail_show = true;
        let mut surface = RecordingSurface::new();

        send_system_notification(&platform, &mut surface, &SystemNotification::test());

        let toast = surface.last_toast().unwrap();
        assert_eq!(toast.kind, ToastKind::Warning);
        assert!(toast.text.starts_with("Test notification: "));
    }

    #[test]
    fn status_notification_shape() {
        let snapshot = StatusSnapshot {
            status: "背包走了".into(),
            created_at: "2025-06-30 03:04:45".into(),
        };
        let n = SystemNotification::status_update(&snapshot, &chrono_tz::Asia::Shanghai);
        assert_eq!(n.tag, STATUS_NOTIFICATION_TAG);
        assert!(n.require_interaction);
        assert_eq!(n.body, "Latest: 背包走了\nUpdated: 2025-06-30 11:04:45");
    }

    #[test]
    fn tag_ids_are_stable() {
        assert_eq!(tag_id(STATUS_NOTIFICATION_TAG), tag_id(STATUS_NOTIFICATION_TAG));
        assert_ne!(tag_id(STATUS_NOTIFICATION_TAG), 0);
    }

    #[test]
    fn desktop_permission_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let platform = DesktopPlatform::new(StateDir::new(dir.path()));
        assert_eq!(platform.permission(), Permission::Default);

        platform.store_permission(Permission::Denied).unwrap();
        assert_eq!(platform.permission(), Permission::Denied);
    }
}
