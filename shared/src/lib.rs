//! Types shared between the game server and the browser renderer.
//!
//! TypeScript bindings are exported to `static/generated/` by `ts-rs` when the
//! tests of this crate run.

pub mod config;
pub mod protocol;
pub mod scene;
