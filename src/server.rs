use axum::{Json, Router, http::StatusCode, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    api::{overlays, routes},
    config::ServerConfig,
    error::ServerError,
    state::AppState,
    store::ConfigStore,
    websocket::handler,
};

pub struct Server {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl Server {
    pub fn new(config: ServerConfig, store: ConfigStore) -> Self {
        let state = AppState::new(store, config.control_token, config.overlays_dir);

        Self {
            state: Arc::new(state),
            addr: SocketAddr::new(config.bind, config.port),
        }
    }

    pub async fn run(self) -> Result<(), ServerError> {
        let app = build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        tracing::info!(addr = %self.addr, "overlay server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("overlay server stopped");
        Ok(())
    }
}

/// Full application router: overlay socket, command API, overlay pages.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(handler::ws_handler))
        .route("/overlay/{name}", get(overlays::overlay_page))
        .nest("/api", routes::configure_api_routes(state.clone()))
        .nest_service("/overlays-static", ServeDir::new(&state.overlays_dir))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "NOT_FOUND" })),
            )
        })
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
