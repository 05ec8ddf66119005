use crate::clock::RoundTicket;
use crate::config::ServerConfig;
use crate::doll::run_doll_loop;
use crate::session::Session;
use crate::timers::{run_countdown, run_round_timer, RoundEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use redlight_shared::protocol::{SnapshotMsg, RUN_KEY};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

/// Commands from the client connection to its game loop
#[derive(Debug, Clone)]
pub enum GameCommand {
    KeyDown { key: String },
    KeyUp { key: String },
    Restart,
    AssetError { asset: String, reason: String },
}

/// Seed for a round's doll schedule. Distinct per session and per round,
/// reproducible from the configured seed.
fn round_seed(base: u64, session_id: u32, round: u32) -> u64 {
    base.wrapping_add(((session_id as u64) << 32) | round as u64)
}

/// Run one session's game loop. Owns all game state for that session and
/// ends when the command channel closes.
pub async fn run_game_loop(
    session_id: u32,
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    snapshot_tx: broadcast::Sender<SnapshotMsg>,
    server_config: ServerConfig,
) {
    let game_config = server_config.game;
    let mut session = Session::new(game_config);
    let (event_tx, mut event_rx) = mpsc::channel::<RoundEvent>(64);

    let tick_period = Duration::from_secs_f64(1.0 / server_config.tick_rate_hz as f64);
    let snapshot_every_n = (server_config.tick_rate_hz / server_config.snapshot_rate_hz).max(1);
    let mut tick_count: u64 = 0;

    let mut tick_interval = tokio::time::interval(tick_period);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // Skipped ticks still count toward the tweens, so the time bar keeps
    // pace with the round timer.
    let mut last_frame = Instant::now();

    let _ = snapshot_tx.send(session.snapshot());

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f64();
                last_frame = now;

                if let Some(outcome) = session.frame(dt) {
                    tracing::info!(
                        "Session {} round {} ended: {}",
                        session_id,
                        session.clock.round(),
                        outcome.message()
                    );
                    let _ = snapshot_tx.send(session.snapshot());
                }

                // Snapshots at a lower rate than frames
                tick_count += 1;
                if tick_count % snapshot_every_n as u64 == 0 {
                    let _ = snapshot_tx.send(session.snapshot());
                }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                let changed = match cmd {
                    GameCommand::KeyDown { key } if key == RUN_KEY => session.press(),
                    GameCommand::KeyUp { key } if key == RUN_KEY => {
                        session.release();
                        true
                    }
                    GameCommand::KeyDown { .. } | GameCommand::KeyUp { .. } => false,
                    GameCommand::Restart => {
                        let accepted = session.begin();
                        if accepted {
                            tracing::info!("Session {} countdown started", session_id);
                            let step = Duration::from_secs_f64(game_config.countdown_step);
                            tokio::spawn(run_countdown(step, event_tx.clone()));
                        } else {
                            tracing::debug!("Session {} restart ignored", session_id);
                        }
                        accepted
                    }
                    GameCommand::AssetError { asset, reason } => {
                        tracing::warn!(
                            "Session {} failed to load asset {}: {}",
                            session_id,
                            asset,
                            reason
                        );
                        false
                    }
                };
                if changed {
                    let _ = snapshot_tx.send(session.snapshot());
                }
            }

            Some(event) = event_rx.recv() => {
                let changed = match event {
                    RoundEvent::Announce(text) => {
                        session.announce(text);
                        true
                    }
                    RoundEvent::StartRound => {
                        let ticket = session.start_round();
                        tracing::info!("Session {} round {} started", session_id, ticket.round);
                        spawn_round_tasks(ticket, session_id, &server_config, &event_tx);
                        true
                    }
                    RoundEvent::DollTurn { round, backward } => session.doll_turn(round, backward),
                    RoundEvent::DollSettled { round, backward } => {
                        session.doll_settled(round, backward)
                    }
                    RoundEvent::TimeUp { round } => {
                        let ended = session.time_up(round);
                        if ended {
                            tracing::info!(
                                "Session {} round {} ended: time limit reached",
                                session_id,
                                round
                            );
                        }
                        ended
                    }
                };
                if changed {
                    let _ = snapshot_tx.send(session.snapshot());
                } else {
                    tracing::debug!("Session {} dropped stale event", session_id);
                }
            }
        }
    }

    session.shutdown();
    tracing::info!("Session {} game loop ended", session_id);
}

fn spawn_round_tasks(
    ticket: RoundTicket,
    session_id: u32,
    server_config: &ServerConfig,
    event_tx: &mpsc::Sender<RoundEvent>,
) {
    let game_config = server_config.game;
    let seed = round_seed(server_config.rng_seed, session_id, ticket.round);

    tokio::spawn(run_doll_loop(
        ticket.round,
        game_config.doll,
        ChaCha8Rng::seed_from_u64(seed),
        event_tx.clone(),
        ticket.stop.clone(),
    ));
    tokio::spawn(run_round_timer(
        ticket.round,
        Duration::from_secs_f64(game_config.time_limit),
        event_tx.clone(),
        ticket.stop,
    ));
}
