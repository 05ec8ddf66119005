//! Static scene layout handed to the renderer on connect.
//!
//! The server never renders; it only describes what to put where. Positions
//! that change during play (player x, doll yaw, progress bar scale) travel in
//! snapshots instead.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::GameConfig;

pub const CLEAR_COLOR: u32 = 0xb7c3f3;
pub const TRACK_COLOR: u32 = 0xe5a716;
pub const POST_COLOR: u32 = 0xfbc851;
pub const PROGRESS_COLOR: u32 = 0xebaa12;
pub const PLAYER_COLOR: u32 = 0xffffff;

pub const DOLL_MODEL_PATH: &str = "models/scene.gltf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct BoxPiece {
    /// Width, height, depth
    pub size: [f64; 3],
    pub position: [f64; 3],
    pub rotation_y: f64,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SphereActor {
    pub radius: f64,
    pub position: [f64; 3],
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ModelActor {
    pub path: String,
    pub scale: f64,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SceneLayout {
    pub clear_color: u32,
    pub camera_z: f64,
    /// Floor, start post, finish post
    pub track: Vec<BoxPiece>,
    /// Full-width progress bar; the renderer scales x by the snapshot's progress
    pub progress_bar: BoxPiece,
    pub player: SphereActor,
    pub doll: ModelActor,
}

impl SceneLayout {
    pub fn from_config(config: &GameConfig) -> Self {
        let start = config.start_position;
        let end = config.end_position();

        let floor = BoxPiece {
            size: [start * 2.0 + 0.4, 1.5, 1.0],
            position: [0.0, 0.0, -1.0],
            rotation_y: 0.0,
            color: TRACK_COLOR,
        };
        let start_post = BoxPiece {
            size: [0.2, 1.5, 1.0],
            position: [start, 0.0, 0.0],
            rotation_y: -0.45,
            color: POST_COLOR,
        };
        let finish_post = BoxPiece {
            size: [0.2, 1.5, 1.0],
            position: [end, 0.0, 0.0],
            rotation_y: 0.45,
            color: POST_COLOR,
        };

        Self {
            clear_color: CLEAR_COLOR,
            camera_z: 5.0,
            track: vec![floor, start_post, finish_post],
            progress_bar: BoxPiece {
                size: [5.0, 0.1, 1.0],
                position: [0.0, 3.35, 0.0],
                rotation_y: 0.0,
                color: PROGRESS_COLOR,
            },
            player: SphereActor {
                radius: 0.3,
                position: [start, 0.0, 1.0],
                color: PLAYER_COLOR,
            },
            doll: ModelActor {
                path: DOLL_MODEL_PATH.to_string(),
                scale: 0.4,
                position: [0.0, -1.0, 0.0],
            },
        }
    }
}
