//! Live status over server-sent events, with reconnect.

use std::future::Future;
use std::time::{Duration, Instant};

use eventsource_stream::Eventsource;
use futures::StreamExt;
use tracing::{debug, info, warn};

use whereabouts_core::reconnect::ReconnectSchedule;
use whereabouts_core::{StatusSnapshot, WhereaboutsError};

use crate::dispatch::{Board, UiEvent};
use crate::notifier::NotificationPlatform;
use crate::surface::Surface;

pub struct LiveStatusStream {
    schedule: ReconnectSchedule,
}

impl LiveStatusStream {
    pub fn new(reconnect_delay: Duration) -> Self {
        LiveStatusStream {
            schedule: ReconnectSchedule::new(reconnect_delay),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> whereabouts_core::reconnect::StreamState {
        self.schedule.state()
    }

    /// Open the stream and feed every pushed snapshot to the board until the
    /// connection ends. Always returns the reason it ended.
    pub async fn connect_once<S, P>(&mut self, board: &mut Board<S, P>) -> WhereaboutsError
    where
        S: Surface,
        P: NotificationPlatform,
    {
        let resp = match board.client().open_stream().await {
            Ok(resp) => resp,
            Err(e) => return e,
        };

        self.schedule.on_open();
        info!(url = %board.client().base_url(), "live status stream connected");

        let mut events = std::pin::pin!(resp.bytes_stream().eventsource());

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => return WhereaboutsError::StreamDisconnected(e.to_string()),
            };

            // Only unnamed events carry status snapshots.
            if !event.event.is_empty() && event.event != "message" {
                debug!(event = %event.event, "ignoring named event");
                continue;
            }

            if event.data.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<StatusSnapshot>(&event.data) {
                Ok(snapshot) => board.dispatch(UiEvent::StatusPushed(snapshot)).await,
                Err(e) => warn!(data = %event.data, error = %e, "ignoring malformed status push"),
            }
        }

        WhereaboutsError::StreamDisconnected("closed by server".to_string())
    }

    /// Keep the stream up until `shutdown` resolves. Each failure waits out
    /// the reconnect delay before trying again.
    pub async fn run<S, P, F>(&mut self, board: &mut Board<S, P>, shutdown: F)
    where
        S: Surface,
        P: NotificationPlatform,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let reason = tokio::select! {
                _ = &mut shutdown => return,
                reason = self.connect_once(board) => reason,
            };

            self.schedule.on_error(Instant::now());
            let Some(retry_at) = self.schedule.retry_at() else {
                continue;
            };

            warn!(
                error = %reason,
                retry_in = %humantime::format_duration(self.schedule.delay()),
                "live status stream lost"
            );

            tokio::select! {
                _ = &mut shutdown => return,
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(retry_at)) => {}
            }

            if self.schedule.take_due(Instant::now()) {
                debug!("reconnecting live status stream");
            }
        }
    }
}
