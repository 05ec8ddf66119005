//! Red Light, Green Light game server library.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod app;
pub mod clock;
pub mod config;
pub mod doll;
pub mod game_loop;
pub mod player;
pub mod session;
pub mod timers;
pub mod tween;
pub mod ws;
