pub mod config;
pub mod delete;
pub mod entries;
pub mod move_entry;
pub mod new;
pub mod notify;
pub mod status;
pub mod watch;

use anyhow::Result;
use whereabouts_core::config::BoardConfig;
use whereabouts_core::consent::ConsentStore;
use whereabouts_core::state::StateDir;

use crate::client::Client;
use crate::dispatch::Board;
use crate::notifier::DesktopPlatform;
use crate::terminal::TerminalSurface;

pub type TerminalBoard = Board<TerminalSurface, DesktopPlatform>;

/// Build the board session every command runs against.
pub fn open_board(config: &BoardConfig) -> Result<TerminalBoard> {
    let server_url = config.server_url()?;
    let tz = config.timezone()?;
    let state = StateDir::open_default()?;

    tracing::debug!(server = %server_url, %tz, state = %state.path().display(), "opening board");

    Ok(Board::new(
        Client::new(&server_url, tz),
        tz,
        TerminalSurface::new(tz),
        DesktopPlatform::new(state.clone()),
        ConsentStore::new(state),
    ))
}
