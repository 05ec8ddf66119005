use redlight_shared::config::GameConfig;

use crate::clock::Outcome;
use crate::tween::{Ease, Tween};

/// The runner sphere. Moves from `+start_position` toward the finish at
/// `-start_position`.
#[derive(Debug, Clone)]
pub struct Player {
    pub position_x: f64,
    pub velocity: f64,
    /// Active slow-down after the run key was released
    decay: Option<Tween>,
}

impl Player {
    pub fn new(start_position: f64) -> Self {
        Self {
            position_x: start_position,
            velocity: 0.0,
            decay: None,
        }
    }

    pub fn reset(&mut self, start_position: f64) {
        *self = Self::new(start_position);
    }

    /// Full speed immediately. Cancels a pending slow-down.
    pub fn run(&mut self, run_velocity: f64) {
        self.decay = None;
        self.velocity = run_velocity;
    }

    /// Ease velocity down to zero over `duration` seconds of model time.
    pub fn stop(&mut self, duration: f64) {
        if self.velocity <= 0.0 {
            return;
        }
        let tween = Tween::new(self.velocity, 0.0, duration, Ease::Power1Out);
        self.velocity = tween.value();
        self.decay = Some(tween);
    }

    pub fn is_decaying(&self) -> bool {
        self.decay.is_some()
    }

    fn advance_decay(&mut self, dt: f64) {
        if let Some(decay) = self.decay.as_mut() {
            self.velocity = decay.advance(dt);
            if decay.is_finished() {
                self.decay = None;
            }
        }
    }

    /// Termination conditions, loss first: moving while the doll watches
    /// beats crossing the line in the same frame.
    pub fn check(&self, looking_backward: bool, config: &GameConfig) -> Option<Outcome> {
        if self.velocity > 0.0 && !looking_backward {
            return Some(Outcome::Lose);
        }
        if self.position_x < config.end_position() + config.win_margin {
            return Some(Outcome::Win);
        }
        None
    }

    /// One frame: settle velocity, evaluate, then step position. The step is
    /// per frame, not scaled by `dt`.
    pub fn update(&mut self, dt: f64, looking_backward: bool, config: &GameConfig) -> Option<Outcome> {
        self.advance_decay(dt);
        let verdict = self.check(looking_backward, config);
        self.position_x -= self.velocity;
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn idle_player_does_not_move() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        for _ in 0..120 {
            assert_eq!(player.update(DT, false, &config), None);
        }
        assert_eq!(player.position_x, 4.0);
    }

    #[test]
    fn running_strictly_decreases_position() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        let mut last = player.position_x;
        for _ in 0..10 {
            player.update(DT, true, &config);
            assert!(player.position_x < last);
            last = player.position_x;
        }
        assert!((player.position_x - (4.0 - 10.0 * 0.03)).abs() < 1e-9);
    }

    #[test]
    fn moving_while_watched_loses() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        assert_eq!(player.update(DT, false, &config), Some(Outcome::Lose));
    }

    #[test]
    fn loss_beats_win_in_the_same_frame() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.position_x = -3.8;
        player.run(config.run_velocity);
        assert_eq!(player.check(false, &config), Some(Outcome::Lose));
        assert_eq!(player.check(true, &config), Some(Outcome::Win));
    }

    #[test]
    fn win_threshold_is_end_plus_margin() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.position_x = -3.59;
        assert_eq!(player.check(true, &config), None);
        player.position_x = -3.61;
        assert_eq!(player.check(true, &config), Some(Outcome::Win));
        // Standing still at the finish is safe from the doll.
        assert_eq!(player.check(false, &config), Some(Outcome::Win));
    }

    #[test]
    fn stop_takes_the_full_decay_window() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        player.stop(config.stop_duration);

        player.advance_decay(0.05);
        assert!(player.velocity > 0.0);
        assert!((player.velocity - 0.0075).abs() < 1e-12);

        player.advance_decay(0.05);
        assert_eq!(player.velocity, 0.0);
        assert!(!player.is_decaying());
    }

    #[test]
    fn releasing_key_as_doll_turns_still_loses() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        player.stop(config.stop_duration);
        assert_eq!(player.update(0.05, false, &config), Some(Outcome::Lose));
    }

    #[test]
    fn decay_finishes_after_six_frames() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        player.stop(config.stop_duration);
        for _ in 0..6 {
            player.update(DT, true, &config);
        }
        assert_eq!(player.velocity, 0.0);
        let parked = player.position_x;
        assert_eq!(player.update(DT, false, &config), None);
        assert_eq!(player.position_x, parked);
    }

    #[test]
    fn run_cancels_decay() {
        let config = GameConfig::default();
        let mut player = Player::new(config.start_position);
        player.run(config.run_velocity);
        player.stop(config.stop_duration);
        player.run(config.run_velocity);
        assert!(!player.is_decaying());
        player.update(DT, true, &config);
        assert_eq!(player.velocity, config.run_velocity);
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let mut player = Player::new(4.0);
        player.stop(0.1);
        assert!(!player.is_decaying());
        assert_eq!(player.velocity, 0.0);
    }
}
