use crate::app::AppState;
use crate::routes::{agent_routes, chat_routes, health_routes, model_routes};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use parley_core::config::ServerConfig;
use parley_core::error::{ParleyError, Result};
use std::net::SocketAddr;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Base64 images travel inside JSON bodies.
const MAX_BODY_SIZE_20MB: usize = 20 * 1024 * 1024;

/// Builds the full router. `static_dir`, when set, is served for every path
/// no route claims.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .merge(chat_routes())
        .merge(agent_routes())
        .merge(model_routes())
        .with_state(state)
        .merge(health_routes());

    if let Some(dir) = static_dir {
        tracing::info!("[Server] Serving static assets from: {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_SIZE_20MB))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until the process stops.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = build_router(state, config.static_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ParleyError::config(format!("Invalid address: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Server] Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
