use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::ws::{ws_handler, AppState};

/// `/ws` for game sessions, everything else from the static client directory.
pub fn router(app_state: AppState) -> Router {
    let static_files = ServeDir::new(&app_state.config.static_dir);
    Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
