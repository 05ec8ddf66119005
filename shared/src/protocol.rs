use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::GameConfig;
use crate::scene::SceneLayout;

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// The only key the game reacts to.
pub const RUN_KEY: &str = "ArrowUp";

/// Round status as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Loading,
    Started,
    Over,
}

// === Server -> Client ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome(WelcomeMsg),
    #[serde(rename = "snapshot")]
    Snapshot(SnapshotMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub server_version: String,
    pub session_id: u32,
    pub config: GameConfig,
    pub scene: SceneLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMsg {
    pub status: GameStatus,
    /// Text for the status display
    pub message: String,
    pub position_x: f64,
    pub velocity: f64,
    pub looking_backward: bool,
    pub doll_rotation_y: f64,
    /// Remaining round time as a fraction, 1.0 at round start down to 0.0
    pub progress: f64,
    pub restart_enabled: bool,
    /// Number of rounds started in this session
    pub round: u32,
}

// === Client -> Server ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "key_down")]
    KeyDown { key: String },
    #[serde(rename = "key_up")]
    KeyUp { key: String },
    #[serde(rename = "restart")]
    Restart,
    /// The renderer failed to load an asset (model, texture, audio).
    #[serde(rename = "asset_error")]
    AssetError { asset: String, reason: String },
}

// === Conversion helpers ===

/// Round to 4 decimal places (plenty for on-screen positions, keeps JSON small)
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> SnapshotMsg {
        SnapshotMsg {
            status: GameStatus::Started,
            message: "Go!!!".to_string(),
            position_x: 3.91,
            velocity: 0.03,
            looking_backward: true,
            doll_rotation_y: -3.15,
            progress: 0.75,
            restart_enabled: false,
            round: 2,
        }
    }

    #[test]
    fn server_msg_welcome_roundtrip() {
        let config = GameConfig::default();
        let msg = ServerMsg::Welcome(WelcomeMsg {
            protocol_version: PROTOCOL_VERSION,
            server_version: "0.1.0".to_string(),
            session_id: 7,
            config,
            scene: SceneLayout::from_config(&config),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"welcome\""));
        assert!(json.contains("\"protocolVersion\":1"));
        assert!(json.contains("\"sessionId\":7"));
        let parsed: ServerMsg = serde_json::from_str(&json).unwrap();
        match parsed {
            ServerMsg::Welcome(w) => {
                assert_eq!(w.protocol_version, PROTOCOL_VERSION);
                assert_eq!(w.session_id, 7);
                assert_eq!(w.config, config);
                assert_eq!(w.scene.track.len(), 3);
            }
            _ => panic!("Expected Welcome"),
        }
    }

    #[test]
    fn snapshot_uses_lowercase_status_and_camel_case_fields() {
        let json = serde_json::to_string(&ServerMsg::Snapshot(sample_snapshot())).unwrap();
        assert!(json.contains("\"type\":\"snapshot\""));
        assert!(json.contains("\"status\":\"started\""));
        assert!(json.contains("\"positionX\":3.91"));
        assert!(json.contains("\"lookingBackward\":true"));
        assert!(json.contains("\"restartEnabled\":false"));
        let parsed: ServerMsg = serde_json::from_str(&json).unwrap();
        match parsed {
            ServerMsg::Snapshot(s) => assert_eq!(s, sample_snapshot()),
            _ => panic!("Expected Snapshot"),
        }
    }

    #[test]
    fn client_msg_key_events_parse() {
        let down: ClientMsg =
            serde_json::from_str(r#"{"type":"key_down","key":"ArrowUp"}"#).unwrap();
        match down {
            ClientMsg::KeyDown { key } => assert_eq!(key, RUN_KEY),
            _ => panic!("Expected KeyDown"),
        }
        let up: ClientMsg = serde_json::from_str(r#"{"type":"key_up","key":"ArrowUp"}"#).unwrap();
        assert!(matches!(up, ClientMsg::KeyUp { .. }));
    }

    #[test]
    fn client_msg_restart_has_no_payload() {
        let json = serde_json::to_string(&ClientMsg::Restart).unwrap();
        assert_eq!(json, r#"{"type":"restart"}"#);
    }

    #[test]
    fn client_msg_asset_error_roundtrip() {
        let msg = ClientMsg::AssetError {
            asset: "models/scene.gltf".to_string(),
            reason: "404".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"asset_error\""));
        let parsed: ClientMsg = serde_json::from_str(&json).unwrap();
        match parsed {
            ClientMsg::AssetError { asset, reason } => {
                assert_eq!(asset, "models/scene.gltf");
                assert_eq!(reason, "404");
            }
            _ => panic!("Expected AssetError"),
        }
    }

    #[test]
    fn round4_trims_noise() {
        assert_eq!(round4(3.999999999), 4.0);
        assert_eq!(round4(-3.61234), -3.6123);
    }
}
