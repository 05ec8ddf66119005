use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use redlight_shared::protocol::{
    ClientMsg, ServerMsg, SnapshotMsg, WelcomeMsg, PROTOCOL_VERSION,
};
use redlight_shared::scene::SceneLayout;
use tokio::sync::{broadcast, mpsc, Semaphore};

use crate::config::ServerConfig;
use crate::game_loop::{run_game_loop, GameCommand};

/// Largest client frame we accept; anything bigger drops the connection.
pub const MAX_MESSAGE_BYTES: usize = 1024;
/// Unparsable frames tolerated before the connection is dropped.
pub const MAX_PARSE_ERRORS: u32 = 5;

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub session_permits: Arc<Semaphore>,
    pub next_session_id: Arc<AtomicU32>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            session_permits: Arc::new(Semaphore::new(config.max_sessions)),
            config: Arc::new(config),
            next_session_id: Arc::new(AtomicU32::new(1)),
        }
    }
}

impl From<ClientMsg> for GameCommand {
    fn from(msg: ClientMsg) -> Self {
        match msg {
            ClientMsg::KeyDown { key } => GameCommand::KeyDown { key },
            ClientMsg::KeyUp { key } => GameCommand::KeyUp { key },
            ClientMsg::Restart => GameCommand::Restart,
            ClientMsg::AssetError { asset, reason } => GameCommand::AssetError { asset, reason },
        }
    }
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.max_message_size(MAX_MESSAGE_BYTES)
        .on_upgrade(|socket| handle_socket(socket, app_state))
}

async fn handle_socket(mut socket: WebSocket, app_state: AppState) {
    let Ok(_permit) = app_state.session_permits.clone().try_acquire_owned() else {
        tracing::warn!("Session limit reached, refusing connection");
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    let session_id = app_state.next_session_id.fetch_add(1, Ordering::Relaxed);
    let config = (*app_state.config).clone();

    let welcome = ServerMsg::Welcome(WelcomeMsg {
        protocol_version: PROTOCOL_VERSION,
        server_version: env!("CARGO_PKG_VERSION").to_string(),
        session_id,
        config: config.game,
        scene: SceneLayout::from_config(&config.game),
    });
    let welcome_json = match serde_json::to_string(&welcome) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode welcome: {}", e);
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();
    if sink.send(Message::Text(welcome_json.into())).await.is_err() {
        return;
    }

    // Subscribe before the loop starts so the first snapshot is not missed
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameCommand>(64);
    let (snapshot_tx, mut snapshot_rx) = broadcast::channel::<SnapshotMsg>(64);
    tokio::spawn(run_game_loop(session_id, cmd_rx, snapshot_tx, config));

    tracing::info!("Session {} connected", session_id);

    let mut parse_errors: u32 = 0;

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.len() > MAX_MESSAGE_BYTES {
                            tracing::warn!(
                                "Session {} sent {} byte frame, disconnecting",
                                session_id,
                                text.len()
                            );
                            break;
                        }
                        match serde_json::from_str::<ClientMsg>(&text) {
                            Ok(client_msg) => {
                                if cmd_tx.send(client_msg.into()).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                parse_errors += 1;
                                tracing::debug!("Session {} sent bad frame: {}", session_id, e);
                                if parse_errors > MAX_PARSE_ERRORS {
                                    tracing::warn!(
                                        "Session {} exceeded parse error limit, disconnecting",
                                        session_id
                                    );
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Session {} socket error: {}", session_id, e);
                        break;
                    }
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client
            result = snapshot_rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        let json = serde_json::to_string(&ServerMsg::Snapshot(snapshot));
                        if let Ok(json) = json {
                            if sink.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Session {} lagged by {} snapshots", session_id, n);
                        // Continue - snapshots are full state, dropping is fine
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    // Dropping the command sender ends the session's game loop
    drop(cmd_tx);
    let _ = sink.close().await;
    tracing::info!("Session {} disconnected", session_id);
}
