//! Round lifecycle: status, status message, restart control and the
//! round's time budget.

use redlight_shared::protocol::GameStatus;
use tokio::sync::watch;

use crate::tween::{Ease, Tween};

/// Messages shown during the pre-round countdown, in order.
pub const COUNTDOWN_MESSAGES: [&str; 4] = ["Starting in 3", "Starting in 2", "Starting in 1", "Go!!!"];

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Lose,
    Win,
    TimedOut,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Lose => "You Lose",
            Outcome::Win => "You Win",
            Outcome::TimedOut => "You ran out of time",
        }
    }
}

/// Handed out when a round starts. Tasks scheduled for the round watch
/// `stop` and exit once it turns true.
#[derive(Debug)]
pub struct RoundTicket {
    pub round: u32,
    pub stop: watch::Receiver<bool>,
}

pub struct GameClock {
    status: GameStatus,
    message: String,
    restart_enabled: bool,
    round: u32,
    time_limit: f64,
    progress: Option<Tween>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl GameClock {
    pub fn new(time_limit: f64) -> Self {
        Self {
            status: GameStatus::Loading,
            message: String::new(),
            restart_enabled: true,
            round: 0,
            time_limit,
            progress: None,
            stop_tx: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn restart_enabled(&self) -> bool {
        self.restart_enabled
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Fraction of the round's time left, 1.0 before the first round.
    pub fn progress(&self) -> f64 {
        self.progress.as_ref().map_or(1.0, Tween::value)
    }

    /// Accept a restart request. Returns false if the control is disabled
    /// (round running or countdown already in progress).
    pub fn begin(&mut self) -> bool {
        if !self.restart_enabled {
            return false;
        }
        debug_assert!(self.status != GameStatus::Started);
        self.restart_enabled = false;
        self.status = GameStatus::Loading;
        true
    }

    pub fn announce(&mut self, text: &str) {
        self.message.clear();
        self.message.push_str(text);
    }

    /// Loading -> Started. Any tasks left over from a previous round are stopped.
    pub fn start_round(&mut self) -> RoundTicket {
        self.stop_round_tasks();
        self.round += 1;
        self.status = GameStatus::Started;
        self.restart_enabled = false;
        self.progress = Some(Tween::new(1.0, 0.0, self.time_limit, Ease::Linear));

        let (stop_tx, stop) = watch::channel(false);
        self.stop_tx = Some(stop_tx);
        RoundTicket {
            round: self.round,
            stop,
        }
    }

    /// Started -> Over, only if the round is still running. Returns whether
    /// this call ended the round.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.status != GameStatus::Started {
            return false;
        }
        self.status = GameStatus::Over;
        self.announce(outcome.message());
        self.restart_enabled = true;
        self.stop_round_tasks();
        true
    }

    /// Round timer expiry. Ignored for rounds other than the current one.
    /// The bar is emptied so it agrees with the timer even if frames lagged.
    pub fn time_up(&mut self, round: u32) -> bool {
        if round != self.round || !self.finish(Outcome::TimedOut) {
            return false;
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.advance(self.time_limit);
        }
        true
    }

    /// True while events tagged with `round` may still change state.
    pub fn is_live(&self, round: u32) -> bool {
        round == self.round && self.status == GameStatus::Started
    }

    pub fn advance(&mut self, dt: f64) {
        if self.status != GameStatus::Started {
            return;
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.advance(dt);
        }
    }

    pub fn stop_round_tasks(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            stop_tx.send_replace(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading_with_restart_enabled() {
        let clock = GameClock::new(15.0);
        assert_eq!(clock.status(), GameStatus::Loading);
        assert!(clock.restart_enabled());
        assert_eq!(clock.progress(), 1.0);
        assert_eq!(clock.message(), "");
    }

    #[test]
    fn begin_disables_restart_until_round_ends() {
        let mut clock = GameClock::new(15.0);
        assert!(clock.begin());
        assert!(!clock.begin(), "second click during countdown must be refused");

        clock.start_round();
        assert!(!clock.begin());

        assert!(clock.finish(Outcome::Win));
        assert!(clock.restart_enabled());
        assert!(clock.begin());
        assert_eq!(clock.status(), GameStatus::Loading);
    }

    #[test]
    fn finish_only_from_started() {
        let mut clock = GameClock::new(15.0);
        assert!(!clock.finish(Outcome::Lose));
        assert_eq!(clock.status(), GameStatus::Loading);

        clock.begin();
        clock.start_round();
        assert!(clock.finish(Outcome::Lose));
        assert!(!clock.finish(Outcome::Win));
        assert_eq!(clock.message(), "You Lose");
    }

    #[test]
    fn time_up_after_finish_keeps_first_outcome() {
        let mut clock = GameClock::new(15.0);
        clock.begin();
        let ticket = clock.start_round();
        clock.finish(Outcome::Win);
        assert!(!clock.time_up(ticket.round));
        assert_eq!(clock.message(), "You Win");
    }

    #[test]
    fn stale_time_up_is_ignored() {
        let mut clock = GameClock::new(15.0);
        clock.begin();
        let first = clock.start_round();
        clock.finish(Outcome::Lose);
        clock.begin();
        let second = clock.start_round();
        assert_ne!(first.round, second.round);

        assert!(!clock.time_up(first.round));
        assert_eq!(clock.status(), GameStatus::Started);
        assert!(clock.time_up(second.round));
        assert_eq!(clock.message(), "You ran out of time");
    }

    #[test]
    fn time_up_empties_lagging_progress() {
        let mut clock = GameClock::new(15.0);
        clock.begin();
        let ticket = clock.start_round();
        // Frames covered less time than the timer measured.
        clock.advance(12.0);
        assert!(clock.progress() > 0.0);
        assert!(clock.time_up(ticket.round));
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn finish_signals_round_stop() {
        let mut clock = GameClock::new(15.0);
        clock.begin();
        let ticket = clock.start_round();
        assert!(!*ticket.stop.borrow());
        clock.finish(Outcome::TimedOut);
        assert!(*ticket.stop.borrow());
    }

    #[test]
    fn progress_depletes_linearly_and_freezes_when_over() {
        let mut clock = GameClock::new(15.0);
        clock.begin();
        clock.start_round();
        clock.advance(3.75);
        assert!((clock.progress() - 0.75).abs() < 1e-12);

        clock.finish(Outcome::Lose);
        clock.advance(5.0);
        assert!((clock.progress() - 0.75).abs() < 1e-12);
    }
}
