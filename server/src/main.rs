use std::path::Path;

use redlight_server::app::router;
use redlight_server::config::ServerConfig;
use redlight_server::ws::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid environment: {}", e);
            std::process::exit(1);
        }
    };

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        tracing::error!("Invalid server configuration: {}", e);
        std::process::exit(1);
    }

    if !Path::new(&config.static_dir).is_dir() {
        tracing::warn!(
            "Static directory {} not found, only /ws will be served",
            config.static_dir
        );
    }

    let listen_addr = config.listen_addr.clone();
    tracing::info!(
        "Loaded config: time limit {}s, track {} to {}, seed {}",
        config.game.time_limit,
        config.game.start_position,
        config.game.end_position(),
        config.rng_seed
    );

    let app = router(AppState::new(config));

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", listen_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server is starting on {}", listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
