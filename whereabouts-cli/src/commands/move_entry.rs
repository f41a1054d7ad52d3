use anyhow::Result;
use whereabouts_core::config::BoardConfig;
use whereabouts_core::{EntryId, EntryWindow};

use super::new::{apply_duration, parse_when};
use crate::dispatch::UiEvent;

/// Reschedule an entry. Without `--end` or `--duration` the entry keeps
/// its length. The window goes to the server as given; if it is refused the
/// entry is put back.
pub async fn run(
    config: &BoardConfig,
    id: EntryId,
    start: String,
    end: Option<String>,
    duration: Option<String>,
) -> Result<()> {
    let tz = config.timezone()?;
    let mut board = super::open_board(config)?;

    board.surface_mut().set_echo_entries(false);
    board.dispatch(UiEvent::RefreshRequested).await;
    board.surface_mut().set_echo_entries(true);

    let Some(from) = board.schedule().entry(id).map(|e| e.window()) else {
        anyhow::bail!("Entry {} not found", id);
    };

    let new_start = parse_when(&start, &tz)?;
    let new_end = match (end, duration) {
        (Some(end), _) => parse_when(&end, &tz)?,
        (None, Some(duration)) => apply_duration(new_start, &duration)?,
        (None, None) => new_start + (from.end - from.start),
    };

    let to = EntryWindow {
        start: new_start,
        end: new_end,
    };

    board.dispatch(UiEvent::EntryMoved { id, from, to }).await;

    Ok(())
}
