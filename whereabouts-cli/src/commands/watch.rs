use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::warn;
use whereabouts_core::config::BoardConfig;

use crate::dispatch::UiEvent;
use crate::stream::LiveStatusStream;

/// Load the board, then follow live status pushes until Ctrl-C.
pub async fn run(config: &BoardConfig) -> Result<()> {
    let mut board = super::open_board(config)?;
    let mut stream = LiveStatusStream::new(config.reconnect_delay()?);

    board.dispatch(UiEvent::PageLoaded).await;

    println!();
    println!("{}", "Watching for status changes (Ctrl-C to stop)".dimmed());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    stream.run(&mut board, shutdown).await;

    Ok(())
}
