//! Keeps the rendered schedule in step with the server.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use whereabouts_core::protocol::CreateEntryRequest;
use whereabouts_core::time::{default_window, parse_local_input, to_local_input};
use whereabouts_core::{
    EntryId, EntryWindow, ScheduleEntry, WhereaboutsError, WhereaboutsResult, detect_conflicts,
};

use crate::client::Client;
use crate::surface::{SubmitControl, Surface, Toast};

/// The create form. Times are `YYYY-MM-DDTHH:MM` in the display zone;
/// an empty time is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub location: String,
    pub info_source: String,
    pub start: String,
    pub end: String,
}

/// Partial form update; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormEdit {
    pub location: Option<String>,
    pub info_source: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EntryForm {
    pub fn new(now: DateTime<Utc>, tz: &Tz) -> Self {
        let mut form = EntryForm {
            location: String::new(),
            info_source: String::new(),
            start: String::new(),
            end: String::new(),
        };
        form.reset_window(now, tz);
        form
    }

    pub fn reset_window(&mut self, now: DateTime<Utc>, tz: &Tz) {
        let window = default_window(now);
        self.start = to_local_input(window.start, tz);
        self.end = to_local_input(window.end, tz);
    }

    pub fn clear(&mut self, now: DateTime<Utc>, tz: &Tz) {
        self.location.clear();
        self.info_source.clear();
        self.reset_window(now, tz);
    }

    pub fn apply(&mut self, edit: FormEdit) {
        if let Some(location) = edit.location {
            self.location = location;
        }
        if let Some(info_source) = edit.info_source {
            self.info_source = info_source;
        }
        if let Some(start) = edit.start {
            self.start = start;
        }
        if let Some(end) = edit.end {
            self.end = end;
        }
    }

    /// Validate locally and build the request body.
    pub fn to_request(&self, tz: &Tz) -> WhereaboutsResult<CreateEntryRequest> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(WhereaboutsError::Validation(
                "Please enter a location!".to_string(),
            ));
        }

        Ok(CreateEntryRequest {
            location: location.to_string(),
            info_source: self.info_source.trim().to_string(),
            start_time: optional_time(&self.start, "start", tz)?,
            end_time: optional_time(&self.end, "end", tz)?,
        })
    }
}

fn optional_time(raw: &str, field: &str, tz: &Tz) -> WhereaboutsResult<Option<DateTime<Utc>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_local_input(raw, tz)
        .map(Some)
        .map_err(|_| WhereaboutsError::Validation(format!("Invalid {field} time '{raw}'")))
}

/// Create / move / delete entries and re-render after each change.
pub struct ScheduleController {
    tz: Tz,
    form: EntryForm,
    /// Last fetched entries, in start order.
    entries: Vec<ScheduleEntry>,
}

impl ScheduleController {
    pub fn new(tz: Tz) -> Self {
        ScheduleController {
            form: EntryForm::new(Utc::now(), &tz),
            tz,
            entries: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn reset_form_window(&mut self) {
        self.form.reset_window(Utc::now(), &self.tz);
    }

    pub fn edit_form(&mut self, edit: FormEdit) {
        self.form.apply(edit);
    }

    pub fn select_preset(&mut self, label: String) {
        self.form.location = label;
    }

    /// Fetch, annotate conflicts, render. A failed fetch goes to the
    /// surface's failure path and is not retried.
    pub async fn refresh(&mut self, client: &Client, surface: &mut dyn Surface) {
        match client.list_entries().await {
            Ok(entries) => {
                let annotated = detect_conflicts(entries);
                debug!(
                    count = annotated.len(),
                    conflicts = annotated.iter().filter(|a| a.is_conflicting).count(),
                    "entries fetched"
                );
                self.entries = annotated.iter().map(|a| a.entry.clone()).collect();
                surface.render_entries(&annotated);
            }
            Err(e) => {
                warn!(error = %e, "could not fetch entries");
                surface.show_fetch_failure(&e);
            }
        }
    }

    /// Submit the create form.
    pub async fn submit(&mut self, client: &Client, surface: &mut dyn Surface) {
        let request = match self.form.to_request(&self.tz) {
            Ok(request) => request,
            Err(e) => {
                surface.toast(Toast::warning(e.to_string()));
                return;
            }
        };

        surface.set_submit_control(SubmitControl::Submitting);

        match client.create_entry(&request).await {
            Ok(()) => {
                info!(location = %request.location, "entry created");
                self.form.clear(Utc::now(), &self.tz);
                self.refresh(client, surface).await;
                surface.toast(Toast::success("Entry added!"));
            }
            Err(e) => {
                warn!(error = %e, "could not create entry");
                surface.toast(Toast::failure(e.to_string()));
            }
        }

        surface.set_submit_control(SubmitControl::Ready);
    }

    /// A drag or resize already moved the entry on screen from `from` to `to`.
    /// If the server refuses, the entry is put back.
    pub async fn move_entry(
        &mut self,
        client: &Client,
        surface: &mut dyn Surface,
        id: EntryId,
        from: EntryWindow,
        to: EntryWindow,
    ) {
        surface.toast(Toast::info("Saving..."));

        match client.update_window(id, to).await {
            Ok(()) => {
                info!(id, "entry window updated");
                self.refresh(client, surface).await;
                surface.toast(Toast::success("Entry updated!"));
            }
            Err(e) => {
                warn!(id, error = %e, "could not update entry window");
                surface.toast(Toast::failure(format!("Update failed: {e}")));
                surface.revert_entry(id, from);
            }
        }
    }

    pub fn request_delete(&mut self, surface: &mut dyn Surface, id: EntryId) {
        match self.entry(id) {
            Some(entry) => surface.ask_delete_confirmation(entry),
            None => surface.toast(Toast::warning(format!("Entry {id} is not on the board"))),
        }
    }

    pub async fn confirm_delete(&mut self, client: &Client, surface: &mut dyn Surface, id: EntryId) {
        match client.delete_entry(id).await {
            Ok(()) => {
                info!(id, "entry deleted");
                self.entries.retain(|e| e.id != id);
                surface.remove_entry(id);
                surface.toast(Toast::success("Entry deleted!"));
            }
            Err(e) => {
                warn!(id, error = %e, "could not delete entry");
                surface.toast(Toast::failure(format!("Delete failed: {e}")));
            }
        }
    }

    pub fn dismiss_delete(&mut self, id: EntryId) {
        debug!(id, "delete dismissed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ToastKind;
    use crate::surface::testing::RecordingSurface;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true}))
    }

    fn entries_body() -> serde_json::Value {
        serde_json::json!([
            {"id": 3, "location": "Library", "info_source": null,
             "start_time": "2025-06-30 10:00:00", "end_time": "2025-06-30 11:00:00"},
            {"id": 1, "location": "Lab 712", "info_source": "wechat",
             "start_time": "2025-06-30 09:00:00", "end_time": "2025-06-30 10:00:00"},
            {"id": 2, "location": "Meeting", "info_source": null,
             "start_time": "2025-06-30 09:30:00", "end_time": "2025-06-30 09:45:00"}
        ])
    }

    async fn mount_entries(server: &MockServer, expected_fetches: u64) {
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries_body()))
            .expect(expected_fetches)
            .mount(server)
            .await;
    }

    fn setup(server: &MockServer) -> (Client, ScheduleController, RecordingSurface) {
        let client = Client::new(&Url::parse(&server.uri()).unwrap(), Shanghai);
        (client, ScheduleController::new(Shanghai), RecordingSurface::new())
    }

    fn window(start: (u32, u32), end: (u32, u32)) -> EntryWindow {
        EntryWindow {
            start: Utc.with_ymd_and_hms(2025, 6, 30, start.0, start.1, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 30, end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn form_defaults_to_one_hour_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 1, 15, 0).unwrap();
        let form = EntryForm::new(now, &Shanghai);
        assert_eq!(form.start, "2025-06-30T09:15");
        assert_eq!(form.end, "2025-06-30T10:15");
        assert!(form.location.is_empty());
    }

    #[test]
    fn form_builds_trimmed_request() {
        let mut form = EntryForm::new(Utc::now(), &Shanghai);
        form.apply(FormEdit {
            location: Some("  Lab 712 ".into()),
            info_source: Some(" phone ".into()),
            start: Some("2025-06-30T09:00".into()),
            end: Some(String::new()),
        });

        let req = form.to_request(&Shanghai).unwrap();
        assert_eq!(req.location, "Lab 712");
        assert_eq!(req.info_source, "phone");
        assert_eq!(
            req.start_time,
            Some(Utc.with_ymd_and_hms(2025, 6, 30, 1, 0, 0).unwrap())
        );
        assert_eq!(req.end_time, None);
    }

    #[test]
    fn form_rejects_bad_time() {
        let mut form = EntryForm::new(Utc::now(), &Shanghai);
        form.location = "Office".into();
        form.start = "tomorrow-ish".into();
        assert!(matches!(
            form.to_request(&Shanghai),
            Err(WhereaboutsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn refresh_renders_sorted_conflicts() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        let (client, mut controller, mut surface) = setup(&server);

        controller.refresh(&client, &mut surface).await;

        let flags: Vec<(i64, bool)> = surface
            .entries
            .iter()
            .map(|a| (a.entry.id, a.is_conflicting))
            .collect();
        assert_eq!(flags, vec![(1, true), (2, true), (3, false)]);
        assert_eq!(controller.entries().len(), 3);
    }

    #[tokio::test]
    async fn refresh_failure_goes_to_failure_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);

        controller.refresh(&client, &mut surface).await;

        assert_eq!(surface.fetch_failures.len(), 1);
        assert_eq!(surface.render_count, 0);
    }

    #[tokio::test]
    async fn empty_location_never_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/update"))
            .respond_with(ok())
            .expect(0)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.edit_form(FormEdit {
            location: Some("   ".into()),
            ..FormEdit::default()
        });

        controller.submit(&client, &mut surface).await;

        assert_eq!(surface.toast_kinds(), vec![ToastKind::Warning]);
        assert!(surface.submit_history.is_empty());
    }

    #[tokio::test]
    async fn successful_create_clears_form_and_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/update"))
            .and(body_json(serde_json::json!({
                "location": "Lab 712",
                "info_source": "",
                "start_time": null,
                "end_time": null
            })))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;
        mount_entries(&server, 1).await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.edit_form(FormEdit {
            location: Some("Lab 712".into()),
            start: Some(String::new()),
            end: Some(String::new()),
            ..FormEdit::default()
        });

        controller.submit(&client, &mut surface).await;

        assert!(controller.form().location.is_empty());
        assert!(!controller.form().start.is_empty());
        assert_eq!(surface.render_count, 1);
        assert_eq!(surface.last_toast().unwrap().kind, ToastKind::Success);
        assert_eq!(
            surface.submit_history,
            vec![SubmitControl::Submitting, SubmitControl::Ready]
        );
    }

    #[tokio::test]
    async fn failed_create_keeps_input_and_reenables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/update"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "disk full"})),
            )
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.select_preset("Gym".into());

        controller.submit(&client, &mut surface).await;

        assert_eq!(controller.form().location, "Gym");
        let toast = surface.last_toast().unwrap();
        assert_eq!(toast.kind, ToastKind::Failure);
        assert!(toast.text.contains("disk full"));
        assert_eq!(
            surface.submit_history,
            vec![SubmitControl::Submitting, SubmitControl::Ready]
        );
    }

    #[tokio::test]
    async fn failed_move_restores_pre_gesture_window() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        Mock::given(method("PUT"))
            .and(path("/api/update/1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        let from = surface.window_of(1).unwrap();
        let to = window((5, 0), (6, 0));
        surface.drag(1, to);
        assert_eq!(surface.window_of(1), Some(to));

        controller.move_entry(&client, &mut surface, 1, from, to).await;

        assert_eq!(surface.window_of(1), Some(from));
        assert_eq!(surface.reverted, vec![(1, from)]);
        assert_eq!(
            surface.toast_kinds(),
            vec![ToastKind::Info, ToastKind::Failure]
        );
    }

    #[tokio::test]
    async fn inverted_window_is_left_to_the_server() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        Mock::given(method("PUT"))
            .and(path("/api/update/1"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "end before start"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        let from = surface.window_of(1).unwrap();
        let to = window((6, 0), (5, 0));
        surface.drag(1, to);

        controller.move_entry(&client, &mut surface, 1, from, to).await;

        assert_eq!(surface.reverted, vec![(1, from)]);
        assert!(surface.last_toast().unwrap().text.contains("end before start"));
    }

    #[tokio::test]
    async fn successful_move_refetches() {
        let server = MockServer::start().await;
        mount_entries(&server, 2).await;
        Mock::given(method("PUT"))
            .and(path("/api/update/2"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        let from = surface.window_of(2).unwrap();
        controller
            .move_entry(&client, &mut surface, 2, from, window((3, 0), (4, 0)))
            .await;

        assert_eq!(surface.render_count, 2);
        assert!(surface.reverted.is_empty());
        assert_eq!(surface.last_toast().unwrap().kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn delete_needs_confirmation_and_skips_refetch() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        Mock::given(method("DELETE"))
            .and(path("/api/delete/3"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        controller.request_delete(&mut surface, 3);
        assert_eq!(surface.delete_prompts, vec![3]);
        assert_eq!(surface.entries.len(), 3);

        controller.confirm_delete(&client, &mut surface, 3).await;
        assert_eq!(surface.entries.len(), 2);
        assert!(controller.entry(3).is_none());
        assert_eq!(surface.render_count, 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_entry_rendered() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        Mock::given(method("DELETE"))
            .and(path("/api/delete/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not Found"})))
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        controller.confirm_delete(&client, &mut surface, 1).await;

        assert_eq!(surface.entries.len(), 3);
        let toast = surface.last_toast().unwrap();
        assert_eq!(toast.kind, ToastKind::Failure);
        assert!(toast.text.contains("Not Found"));
    }

    #[tokio::test]
    async fn dismissed_delete_sends_nothing() {
        let server = MockServer::start().await;
        mount_entries(&server, 1).await;
        Mock::given(method("DELETE"))
            .respond_with(ok())
            .expect(0)
            .mount(&server)
            .await;
        let (client, mut controller, mut surface) = setup(&server);
        controller.refresh(&client, &mut surface).await;

        controller.request_delete(&mut surface, 2);
        controller.dismiss_delete(2);

        assert_eq!(surface.entries.len(), 3);
    }
}
