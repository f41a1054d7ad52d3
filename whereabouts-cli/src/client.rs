//! HTTP client for the board server.

use chrono_tz::Tz;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use whereabouts_core::protocol::{
    CreateEntryRequest, ErrorBody, SetStatusRequest, SuccessResponse, UpdateWindowRequest,
    WireEntry,
};
use whereabouts_core::{
    EntryId, EntryWindow, PresenceStatus, ScheduleEntry, StatusSnapshot, WhereaboutsError,
    WhereaboutsResult,
};

/// HTTP client for the board server.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tz: Tz,
}

impl Client {
    /// `tz` is the display zone, used to read zone-naive entry times.
    pub fn new(base_url: &Url, tz: Tz) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            tz,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /api/status
    pub async fn list_entries(&self) -> WhereaboutsResult<Vec<ScheduleEntry>> {
        let resp = self
            .http
            .get(self.url("/api/status"))
            .send()
            .await
            .map_err(transport)?;

        let wire: Vec<WireEntry> = json(check(resp).await?).await?;

        let entries = wire
            .into_iter()
            .filter_map(|w| {
                let id = w.id;
                match ScheduleEntry::from_wire(w, &self.tz) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(id, error = %e, "skipping entry with unusable times");
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    /// POST /api/update
    pub async fn create_entry(&self, req: &CreateEntryRequest) -> WhereaboutsResult<()> {
        let resp = self
            .http
            .post(self.url("/api/update"))
            .json(req)
            .send()
            .await
            .map_err(transport)?;

        acknowledged(check(resp).await?).await
    }

    /// PUT /api/update/:id
    pub async fn update_window(&self, id: EntryId, window: EntryWindow) -> WhereaboutsResult<()> {
        let body = UpdateWindowRequest {
            start_time: window.start,
            end_time: window.end,
        };

        let resp = self
            .http
            .put(self.url(&format!("/api/update/{id}")))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        acknowledged(check(resp).await?).await
    }

    /// DELETE /api/delete/:id
    pub async fn delete_entry(&self, id: EntryId) -> WhereaboutsResult<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/delete/{id}")))
            .send()
            .await
            .map_err(transport)?;

        acknowledged(check(resp).await?).await
    }

    /// GET /api/status_712
    pub async fn get_status(&self) -> WhereaboutsResult<StatusSnapshot> {
        let resp = self
            .http
            .get(self.url("/api/status_712"))
            .send()
            .await
            .map_err(transport)?;

        json(check(resp).await?).await
    }

    /// POST /api/status_712
    pub async fn set_status(&self, status: &PresenceStatus) -> WhereaboutsResult<()> {
        let body = SetStatusRequest {
            status: status.as_str().to_string(),
        };

        let resp = self
            .http
            .post(self.url("/api/status_712"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        acknowledged(check(resp).await?).await
    }

    /// GET /api/events, left open as a server-sent event stream.
    pub async fn open_stream(&self) -> WhereaboutsResult<Response> {
        let resp = self
            .http
            .get(self.url("/api/events"))
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await
            .map_err(|e| WhereaboutsError::StreamDisconnected(e.to_string()))?;

        check(resp).await
    }
}

fn transport(err: reqwest::Error) -> WhereaboutsError {
    WhereaboutsError::Transport(err.to_string())
}

/// Turn a non-success response into `WhereaboutsError::Http`, using the
/// server's own message when the body carries one.
async fn check(resp: Response) -> WhereaboutsResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message())
        .unwrap_or_else(|| fallback_message(status, &text));

    debug!(status = status.as_u16(), %message, "request rejected");

    Err(WhereaboutsError::Http {
        status: status.as_u16(),
        message,
    })
}

fn fallback_message(status: StatusCode, text: &str) -> String {
    let text = text.trim();
    if !text.is_empty() && text.len() <= 200 {
        return text.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Mutating endpoints answer `{"success": true}`.
async fn acknowledged(resp: Response) -> WhereaboutsResult<()> {
    let ack: SuccessResponse = json(resp).await?;
    if !ack.success {
        return Err(WhereaboutsError::MalformedResponse(
            "server did not acknowledge the request".to_string(),
        ));
    }
    Ok(())
}

async fn json<T: DeserializeOwned>(resp: Response) -> WhereaboutsResult<T> {
    let bytes = resp.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| WhereaboutsError::MalformedResponse(e.to_string()))
}
