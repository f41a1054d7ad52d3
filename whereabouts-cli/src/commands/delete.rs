use anyhow::Result;
use dialoguer::Confirm;
use whereabouts_core::EntryId;
use whereabouts_core::config::BoardConfig;

use crate::dispatch::UiEvent;

pub async fn run(config: &BoardConfig, id: EntryId) -> Result<()> {
    let mut board = super::open_board(config)?;

    board.surface_mut().set_echo_entries(false);
    board.dispatch(UiEvent::RefreshRequested).await;
    board.surface_mut().set_echo_entries(true);

    board.dispatch(UiEvent::EntryClicked(id)).await;

    let Some(entry) = board.surface_mut().take_pending_delete() else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt("  Delete?")
        .default(false)
        .interact()?;

    if confirmed {
        board.dispatch(UiEvent::DeleteConfirmed(entry.id)).await;
    } else {
        board.dispatch(UiEvent::DeleteDismissed(entry.id)).await;
    }

    Ok(())
}
