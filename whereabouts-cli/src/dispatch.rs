//! Every user action and server push the board reacts to, and the one place
//! that routes them to a controller.

use chrono_tz::Tz;
use tracing::debug;

use whereabouts_core::consent::ConsentStore;
use whereabouts_core::{EntryId, EntryWindow, PresenceStatus, StatusSnapshot};

use crate::client::Client;
use crate::notifier::{ConsentFlow, NotificationPlatform};
use crate::schedule::{FormEdit, ScheduleController};
use crate::status::StatusController;
use crate::surface::Surface;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Initial load: form window, status, notification check, entry list.
    PageLoaded,
    RefreshRequested,
    StatusRefreshRequested,
    NotificationCheckRequested,
    PresetSelected(String),
    FormEdited(FormEdit),
    SubmitClicked,
    EntryMoved {
        id: EntryId,
        from: EntryWindow,
        to: EntryWindow,
    },
    EntryClicked(EntryId),
    DeleteConfirmed(EntryId),
    DeleteDismissed(EntryId),
    StatusButtonClicked(PresenceStatus),
    StatusPushed(StatusSnapshot),
    EnableNotificationsClicked,
    SkipNotificationsClicked,
    RetryNotificationsClicked,
}

/// The board controller: owns the collaborators and the per-feature state.
pub struct Board<S: Surface, P: NotificationPlatform> {
    client: Client,
    surface: S,
    platform: P,
    schedule: ScheduleController,
    status: StatusController,
    consent: ConsentFlow,
}

impl<S: Surface, P: NotificationPlatform> Board<S, P> {
    pub fn new(client: Client, tz: Tz, surface: S, platform: P, consent: ConsentStore) -> Self {
        Board {
            client,
            surface,
            platform,
            schedule: ScheduleController::new(tz),
            status: StatusController::new(tz),
            consent: ConsentFlow::new(consent),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn schedule(&self) -> &ScheduleController {
        &self.schedule
    }

    pub async fn dispatch(&mut self, event: UiEvent) {
        debug!(?event, "dispatch");

        match event {
            UiEvent::PageLoaded => {
                self.schedule.reset_form_window();
                self.status.load(&self.client, &mut self.surface).await;
                self.consent.check(&self.platform, &mut self.surface);
                self.schedule.refresh(&self.client, &mut self.surface).await;
            }
            UiEvent::RefreshRequested => {
                self.schedule.refresh(&self.client, &mut self.surface).await;
            }
            UiEvent::StatusRefreshRequested => {
                self.status.load(&self.client, &mut self.surface).await;
            }
            UiEvent::NotificationCheckRequested => {
                self.consent.check(&self.platform, &mut self.surface);
            }
            UiEvent::PresetSelected(label) => self.schedule.select_preset(label),
            UiEvent::FormEdited(edit) => self.schedule.edit_form(edit),
            UiEvent::SubmitClicked => {
                self.schedule.submit(&self.client, &mut self.surface).await;
            }
            UiEvent::EntryMoved { id, from, to } => {
                self.schedule
                    .move_entry(&self.client, &mut self.surface, id, from, to)
                    .await;
            }
            UiEvent::EntryClicked(id) => self.schedule.request_delete(&mut self.surface, id),
            UiEvent::DeleteConfirmed(id) => {
                self.schedule
                    .confirm_delete(&self.client, &mut self.surface, id)
                    .await;
            }
            UiEvent::DeleteDismissed(id) => self.schedule.dismiss_delete(id),
            UiEvent::StatusButtonClicked(status) => {
                self.status.set(&self.client, &mut self.surface, &status).await;
            }
            UiEvent::StatusPushed(snapshot) => {
                self.status
                    .apply_push(&mut self.surface, &self.platform, &snapshot);
            }
            UiEvent::EnableNotificationsClicked => {
                self.consent.enable(&mut self.platform, &mut self.surface);
            }
            UiEvent::SkipNotificationsClicked => self.consent.skip(&mut self.surface),
            UiEvent::RetryNotificationsClicked => {
                self.consent.retry(&self.platform, &mut self.surface);
            }
        }
    }
}
