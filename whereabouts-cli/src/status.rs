//! Board-wide presence status: fetch, set, and apply live pushes.

use chrono_tz::Tz;
use tracing::{info, warn};

use whereabouts_core::{PresenceStatus, StatusSnapshot, StatusView};

use crate::client::Client;
use crate::notifier::{NotificationPlatform, SystemNotification, send_system_notification};
use crate::surface::{Surface, Toast};

pub struct StatusController {
    tz: Tz,
}

impl StatusController {
    pub fn new(tz: Tz) -> Self {
        StatusController { tz }
    }

    /// Fetch and render the current status. Failures render "lookup failed".
    pub async fn load(&self, client: &Client, surface: &mut dyn Surface) {
        let view = match client.get_status().await {
            Ok(snapshot) => StatusView::from_snapshot(&snapshot, &self.tz),
            Err(e) => {
                warn!(error = %e, "could not fetch status");
                StatusView::lookup_failed()
            }
        };
        surface.render_status(&view);
    }

    /// Set the status. The display is not touched here; the change comes
    /// back over the live stream like anyone else's.
    pub async fn set(&self, client: &Client, surface: &mut dyn Surface, status: &PresenceStatus) {
        match client.set_status(status).await {
            Ok(()) => {
                info!(%status, "status set");
                surface.toast(Toast::success(format!("Status updated to: {status}")));
            }
            Err(e) => {
                warn!(%status, error = %e, "could not set status");
                surface.toast(Toast::failure(format!("Update failed: {e}")));
            }
        }
    }

    /// A snapshot arrived on the live stream.
    pub fn apply_push(
        &self,
        surface: &mut dyn Surface,
        platform: &dyn NotificationPlatform,
        snapshot: &StatusSnapshot,
    ) {
        info!(status = %snapshot.status, "status pushed");
        surface.render_status(&StatusView::from_snapshot(snapshot, &self.tz));
        surface.toast(Toast::info(format!("Status changed: {}", snapshot.status)));
        send_system_notification(
            platform,
            surface,
            &SystemNotification::status_update(snapshot, &self.tz),
        );
    }
}
