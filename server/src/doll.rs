//! The doll: a facing flag the player is judged against, and the task that
//! keeps turning it around.
//!
//! The flag lags the visual turn by a settle delay, so what the player sees
//! and what the game checks stay roughly in step.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use redlight_shared::config::DollConfig;
use tokio::sync::{mpsc, watch};

use crate::timers::{sleep_or_stop, RoundEvent};
use crate::tween::{Ease, Tween};

#[derive(Debug, Clone)]
pub struct Doll {
    looking_backward: bool,
    rotation_y: f64,
    turn: Option<Tween>,
}

impl Doll {
    pub fn new() -> Self {
        Self {
            looking_backward: true,
            rotation_y: 0.0,
            turn: None,
        }
    }

    /// Facing away with the flag to match, no turn in progress.
    pub fn reset(&mut self, config: &DollConfig) {
        self.looking_backward = true;
        self.rotation_y = config.backward_rotation;
        self.turn = None;
    }

    pub fn looking_backward(&self) -> bool {
        self.looking_backward
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    /// Begin the visual turn. The facing flag is untouched until `settle`.
    pub fn start_turn(&mut self, backward: bool, config: &DollConfig) {
        let target = if backward { config.backward_rotation } else { 0.0 };
        let tween = Tween::new(self.rotation_y, target, config.turn_duration, Ease::Power1Out);
        self.rotation_y = tween.value();
        self.turn = Some(tween);
    }

    pub fn settle(&mut self, backward: bool) {
        self.looking_backward = backward;
    }

    pub fn advance(&mut self, dt: f64) {
        if let Some(turn) = self.turn.as_mut() {
            self.rotation_y = turn.advance(dt);
            if turn.is_finished() {
                self.turn = None;
            }
        }
    }
}

impl Default for Doll {
    fn default() -> Self {
        Self::new()
    }
}

fn random_hold(rng: &mut ChaCha8Rng, min: f64, max: f64) -> Duration {
    Duration::from_secs_f64(rng.gen_range(min..max))
}

/// One half-cycle: start the turn, flip the flag after `settle`, then hold
/// until `hold` has passed since the turn started. Returns false once the
/// round is stopped or the game loop is gone.
async fn turn_and_hold(
    round: u32,
    backward: bool,
    settle: Duration,
    hold: Duration,
    events: &mpsc::Sender<RoundEvent>,
    stop: &mut watch::Receiver<bool>,
) -> bool {
    if events
        .send(RoundEvent::DollTurn { round, backward })
        .await
        .is_err()
    {
        return false;
    }
    if !sleep_or_stop(settle, stop).await {
        return false;
    }
    if events
        .send(RoundEvent::DollSettled { round, backward })
        .await
        .is_err()
    {
        return false;
    }
    sleep_or_stop(hold.saturating_sub(settle), stop).await
}

/// Alternate backward / forward until the round's stop signal fires.
pub async fn run_doll_loop(
    round: u32,
    config: DollConfig,
    mut rng: ChaCha8Rng,
    events: mpsc::Sender<RoundEvent>,
    mut stop: watch::Receiver<bool>,
) {
    let backward_settle = Duration::from_secs_f64(config.backward_settle);
    let forward_settle = Duration::from_secs_f64(config.forward_settle);

    loop {
        let hold = random_hold(&mut rng, config.backward_hold_min, config.backward_hold_max);
        tracing::debug!("Round {} doll looks away for {:?}", round, hold);
        if !turn_and_hold(round, true, backward_settle, hold, &events, &mut stop).await {
            break;
        }

        let hold = random_hold(&mut rng, config.forward_hold_min, config.forward_hold_max);
        tracing::debug!("Round {} doll watches for {:?}", round, hold);
        if !turn_and_hold(round, false, forward_settle, hold, &events, &mut stop).await {
            break;
        }
    }

    tracing::debug!("Round {} doll loop stopped", round);
}
