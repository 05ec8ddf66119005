//! Timed tasks that feed a session's game loop.
//!
//! Nothing here touches game state directly: every task reports through a
//! `RoundEvent` and the game loop applies it.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::clock::COUNTDOWN_MESSAGES;

/// Events produced by timer and doll tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    Announce(&'static str),
    /// Countdown finished
    StartRound,
    /// The doll started turning; `backward` is the direction it turns to
    DollTurn { round: u32, backward: bool },
    /// The turn has progressed far enough for the facing flag to follow
    DollSettled { round: u32, backward: bool },
    TimeUp { round: u32 },
}

/// Sleep unless the round is stopped first. Returns false when stopped
/// (including when the round's stop sender is gone).
pub async fn sleep_or_stop(duration: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    if *stop.borrow() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = stop.wait_for(|stopped| *stopped) => false,
    }
}

/// "Starting in 3" .. "Go!!!", one step apart, then start the round.
/// Runs to completion; only a closed session cuts it short.
pub async fn run_countdown(step: Duration, events: mpsc::Sender<RoundEvent>) {
    for text in COUNTDOWN_MESSAGES {
        tokio::time::sleep(step).await;
        if events.send(RoundEvent::Announce(text)).await.is_err() {
            return;
        }
    }
    let _ = events.send(RoundEvent::StartRound).await;
}

/// One-shot round expiry. Does nothing if the round stops first.
pub async fn run_round_timer(
    round: u32,
    time_limit: Duration,
    events: mpsc::Sender<RoundEvent>,
    mut stop: watch::Receiver<bool>,
) {
    if sleep_or_stop(time_limit, &mut stop).await {
        let _ = events.send(RoundEvent::TimeUp { round }).await;
    }
}
