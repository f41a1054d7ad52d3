use anyhow::Result;
use clap::ValueEnum;
use whereabouts_core::PresenceStatus;
use whereabouts_core::config::BoardConfig;

use crate::dispatch::UiEvent;

/// The three statuses the server accepts, in `PresenceStatus::SETTABLE`
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// 在
    In,
    /// 不在
    Out,
    /// 背包走了
    Gone,
}

impl From<StatusArg> for PresenceStatus {
    fn from(arg: StatusArg) -> Self {
        PresenceStatus::SETTABLE[arg as usize].clone()
    }
}

pub async fn show(config: &BoardConfig) -> Result<()> {
    let mut board = super::open_board(config)?;
    board.dispatch(UiEvent::StatusRefreshRequested).await;
    Ok(())
}

pub async fn set(config: &BoardConfig, status: StatusArg) -> Result<()> {
    let mut board = super::open_board(config)?;
    board
        .dispatch(UiEvent::StatusButtonClicked(status.into()))
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_settable_status_has_an_arg() {
        let mapped: Vec<PresenceStatus> = StatusArg::value_variants()
            .iter()
            .map(|arg| PresenceStatus::from(*arg))
            .collect();
        assert_eq!(mapped, PresenceStatus::SETTABLE.to_vec());
    }

    #[test]
    fn args_map_to_server_literals() {
        assert_eq!(PresenceStatus::from(StatusArg::In).as_str(), "在");
        assert_eq!(PresenceStatus::from(StatusArg::Out).as_str(), "不在");
        assert_eq!(PresenceStatus::from(StatusArg::Gone).as_str(), "背包走了");
    }
}
