use anyhow::Result;
use whereabouts_core::config::BoardConfig;

use crate::dispatch::UiEvent;

pub async fn run(config: &BoardConfig) -> Result<()> {
    let mut board = super::open_board(config)?;
    board.dispatch(UiEvent::RefreshRequested).await;
    Ok(())
}
