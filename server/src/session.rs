use redlight_shared::config::GameConfig;
use redlight_shared::protocol::{round4, GameStatus, SnapshotMsg};

use crate::clock::{GameClock, Outcome, RoundTicket};
use crate::doll::Doll;
use crate::player::Player;

/// All game state for one connected client. Owned by that client's game
/// loop task; nothing else mutates it.
pub struct Session {
    pub config: GameConfig,
    pub clock: GameClock,
    pub doll: Doll,
    pub player: Player,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            clock: GameClock::new(config.time_limit),
            doll: Doll::new(),
            player: Player::new(config.start_position),
            config,
        }
    }

    /// Restart control. On acceptance the player goes back to the start line
    /// and the caller runs the countdown.
    pub fn begin(&mut self) -> bool {
        if !self.clock.begin() {
            return false;
        }
        self.player.reset(self.config.start_position);
        self.doll.reset(&self.config.doll);
        true
    }

    pub fn announce(&mut self, text: &str) {
        self.clock.announce(text);
    }

    pub fn start_round(&mut self) -> RoundTicket {
        self.clock.start_round()
    }

    /// Run key pressed. Ignored unless a round is running.
    pub fn press(&mut self) -> bool {
        if self.clock.status() != GameStatus::Started {
            return false;
        }
        self.player.run(self.config.run_velocity);
        true
    }

    pub fn release(&mut self) {
        self.player.stop(self.config.stop_duration);
    }

    pub fn doll_turn(&mut self, round: u32, backward: bool) -> bool {
        if !self.clock.is_live(round) {
            return false;
        }
        self.doll.start_turn(backward, &self.config.doll);
        true
    }

    pub fn doll_settled(&mut self, round: u32, backward: bool) -> bool {
        if !self.clock.is_live(round) {
            return false;
        }
        self.doll.settle(backward);
        true
    }

    pub fn time_up(&mut self, round: u32) -> bool {
        self.clock.time_up(round)
    }

    /// One rendered frame. Does nothing once the round is over. Returns the
    /// outcome if this frame ended the round.
    pub fn frame(&mut self, dt: f64) -> Option<Outcome> {
        if self.clock.status() == GameStatus::Over {
            return None;
        }
        self.clock.advance(dt);
        self.doll.advance(dt);

        let verdict = self
            .player
            .update(dt, self.doll.looking_backward(), &self.config)?;
        self.clock.finish(verdict).then_some(verdict)
    }

    /// Stop any tasks still scheduled for the current round.
    pub fn shutdown(&mut self) {
        self.clock.stop_round_tasks();
    }

    pub fn snapshot(&self) -> SnapshotMsg {
        SnapshotMsg {
            status: self.clock.status(),
            message: self.clock.message().to_string(),
            position_x: round4(self.player.position_x),
            velocity: round4(self.player.velocity),
            looking_backward: self.doll.looking_backward(),
            doll_rotation_y: round4(self.doll.rotation_y()),
            progress: round4(self.clock.progress()),
            restart_enabled: self.clock.restart_enabled(),
            round: self.clock.round(),
        }
    }
}
