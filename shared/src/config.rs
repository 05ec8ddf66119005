use std::time::Duration;

/// Longest single delay any timer may be configured with (seconds).
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Every timed value ends up in a `Duration`; reject what would not fit or
/// would stall a session for hours.
fn check_delay(name: &str, secs: f64) -> Result<(), String> {
    if Duration::try_from_secs_f64(secs).is_err() || secs > MAX_DELAY_SECS {
        return Err(format!("{} must be between 0 and {} seconds", name, MAX_DELAY_SECS));
    }
    Ok(())
}

/// Doll timing configuration. All durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct DollConfig {
    /// Lag between starting the backward turn and the facing flag flipping to backward
    pub backward_settle: f64,
    /// Lag between starting the forward turn and the facing flag flipping to forward
    pub forward_settle: f64,
    pub backward_hold_min: f64,
    pub backward_hold_max: f64,
    pub forward_hold_min: f64,
    pub forward_hold_max: f64,
    /// Length of the visual head turn
    pub turn_duration: f64,
    /// Doll yaw (radians) when facing away from the player
    pub backward_rotation: f64,
}

impl Default for DollConfig {
    fn default() -> Self {
        Self {
            backward_settle: 0.15,
            forward_settle: 0.45,
            backward_hold_min: 1.0,
            backward_hold_max: 2.0,
            forward_hold_min: 0.75,
            forward_hold_max: 1.5,
            turn_duration: 0.45,
            backward_rotation: -3.15,
        }
    }
}

impl DollConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("backward_settle", self.backward_settle),
            ("forward_settle", self.forward_settle),
            ("turn_duration", self.turn_duration),
            ("backward_hold_min", self.backward_hold_min),
            ("backward_hold_max", self.backward_hold_max),
            ("forward_hold_min", self.forward_hold_min),
            ("forward_hold_max", self.forward_hold_max),
        ] {
            check_delay(name, value)?;
        }
        if !self.backward_hold_min.is_finite() || self.backward_hold_min <= 0.0 {
            return Err("backward_hold_min must be finite and > 0".to_string());
        }
        if !self.backward_hold_max.is_finite() || self.backward_hold_max <= self.backward_hold_min {
            return Err("backward_hold_max must be finite and > backward_hold_min".to_string());
        }
        if !self.forward_hold_min.is_finite() || self.forward_hold_min <= 0.0 {
            return Err("forward_hold_min must be finite and > 0".to_string());
        }
        if !self.forward_hold_max.is_finite() || self.forward_hold_max <= self.forward_hold_min {
            return Err("forward_hold_max must be finite and > forward_hold_min".to_string());
        }
        // The flag has to settle before the next turn can start.
        if self.backward_settle >= self.backward_hold_min {
            return Err("backward_settle must be < backward_hold_min".to_string());
        }
        if self.forward_settle >= self.forward_hold_min {
            return Err("forward_settle must be < forward_hold_min".to_string());
        }
        if !self.backward_rotation.is_finite() {
            return Err("backward_rotation must be finite".to_string());
        }
        Ok(())
    }
}

/// Game rules shared by the server simulation and the browser renderer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../static/generated/")]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Track start on the x axis; the finish line sits at `-start_position`
    pub start_position: f64,
    /// Tolerance before the finish line that already counts as a win
    pub win_margin: f64,
    /// Distance covered per frame while running
    pub run_velocity: f64,
    /// Time for velocity to decay to zero after releasing the key (seconds)
    pub stop_duration: f64,
    /// Round length (seconds)
    pub time_limit: f64,
    /// Delay between countdown messages (seconds)
    pub countdown_step: f64,
    pub doll: DollConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_position: 4.0,
            win_margin: 0.4,
            run_velocity: 0.03,
            stop_duration: 0.1,
            time_limit: 15.0,
            countdown_step: 0.5,
            doll: DollConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn end_position(&self) -> f64 {
        -self.start_position
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.start_position.is_finite() || self.start_position <= 0.0 {
            return Err("start_position must be finite and > 0".to_string());
        }
        if !self.win_margin.is_finite() || self.win_margin <= 0.0 {
            return Err("win_margin must be finite and > 0".to_string());
        }
        if self.win_margin >= 2.0 * self.start_position {
            return Err("win_margin must be shorter than the track".to_string());
        }
        if !self.run_velocity.is_finite() || self.run_velocity <= 0.0 {
            return Err("run_velocity must be finite and > 0".to_string());
        }
        if !self.stop_duration.is_finite() || self.stop_duration < 0.0 {
            return Err("stop_duration must be finite and >= 0".to_string());
        }
        if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            return Err("time_limit must be finite and > 0".to_string());
        }
        if !self.countdown_step.is_finite() || self.countdown_step < 0.0 {
            return Err("countdown_step must be finite and >= 0".to_string());
        }
        check_delay("time_limit", self.time_limit)?;
        check_delay("stop_duration", self.stop_duration)?;
        check_delay("countdown_step", self.countdown_step)?;
        self.doll.validate()
    }
}
