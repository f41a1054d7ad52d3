use anyhow::Result;
use clap::ValueEnum;
use dialoguer::{Confirm, Select};
use whereabouts_core::config::BoardConfig;

use crate::dispatch::UiEvent;
use crate::surface::GuidePanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifyAction {
    /// Ask for permission to show desktop notifications
    Enable,
    /// Stop offering notifications
    Skip,
    /// Check again after enabling notifications by hand
    Retry,
}

impl From<NotifyAction> for UiEvent {
    fn from(action: NotifyAction) -> Self {
        match action {
            NotifyAction::Enable => UiEvent::EnableNotificationsClicked,
            NotifyAction::Skip => UiEvent::SkipNotificationsClicked,
            NotifyAction::Retry => UiEvent::RetryNotificationsClicked,
        }
    }
}

pub async fn run(config: &BoardConfig, action: Option<NotifyAction>) -> Result<()> {
    let mut board = super::open_board(config)?;

    if let Some(action) = action {
        board.dispatch(action.into()).await;
        return Ok(());
    }

    board.dispatch(UiEvent::NotificationCheckRequested).await;

    match board.surface().guide() {
        Some(GuidePanel::Onboarding) => {
            let items = ["Enable notifications", "Not now", "Don't ask again"];
            let selection = Select::new()
                .with_prompt("  Notifications")
                .items(&items)
                .default(0)
                .interact()?;
            match selection {
                0 => board.dispatch(UiEvent::EnableNotificationsClicked).await,
                2 => board.dispatch(UiEvent::SkipNotificationsClicked).await,
                _ => {}
            }
        }
        Some(GuidePanel::ManualSteps) => {
            let retry = Confirm::new()
                .with_prompt("  Check again?")
                .default(true)
                .interact()?;
            if retry {
                board.dispatch(UiEvent::RetryNotificationsClicked).await;
            }
        }
        None => {}
    }

    Ok(())
}
