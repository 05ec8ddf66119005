use redlight_shared::config::GameConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory with the browser client (index.html, models, music)
    pub static_dir: String,
    pub tick_rate_hz: u32,
    pub snapshot_rate_hz: u32,
    /// Concurrent game sessions (one per WebSocket)
    pub max_sessions: usize,
    pub rng_seed: u64,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            static_dir: "./static".to_string(),
            tick_rate_hz: 60,
            snapshot_rate_hz: 30,
            max_sessions: 64,
            rng_seed: 42,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `REDLIGHT_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(addr) = lookup("REDLIGHT_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(dir) = lookup("REDLIGHT_STATIC_DIR") {
            config.static_dir = dir;
        }
        if let Some(seed) = lookup("REDLIGHT_SEED") {
            config.rng_seed = seed
                .parse()
                .map_err(|e| format!("REDLIGHT_SEED must be an unsigned integer: {}", e))?;
        }
        if let Some(limit) = lookup("REDLIGHT_TIME_LIMIT") {
            config.game.time_limit = limit
                .parse()
                .map_err(|e| format!("REDLIGHT_TIME_LIMIT must be a number of seconds: {}", e))?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.snapshot_rate_hz == 0 {
            return Err("snapshot_rate_hz must be > 0".to_string());
        }
        if self.snapshot_rate_hz > self.tick_rate_hz {
            return Err("snapshot_rate_hz must be <= tick_rate_hz".to_string());
        }
        if self.max_sessions == 0 {
            return Err("max_sessions must be > 0".to_string());
        }
        self.game.validate()
    }
}
