use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use super::{handlers, middleware::control_auth};
use crate::{state::AppState, websocket::events::events_handler};

/// Command surface under `/api`. Everything but the health check sits
/// behind `control_auth`.
pub fn configure_api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let guarded = Router::new()
        .route("/trigger", post(handlers::trigger))
        .route("/refresh", post(handlers::refresh))
        .route("/status", get(handlers::status))
        .route("/state/{module}", get(handlers::module_state))
        .route("/stats", get(handlers::stats))
        .route("/config", get(handlers::get_config))
        .route("/config/overlays/{section}", patch(handlers::patch_section))
        .route("/config/scenes/{scene_id}", patch(handlers::patch_scene))
        .route("/reaction/sources", post(handlers::add_reaction_source))
        .route(
            "/reaction/sources/{id}",
            patch(handlers::update_reaction_source).delete(handlers::remove_reaction_source),
        )
        .route("/schedules", post(handlers::start_schedule))
        .route("/schedules/{module}", delete(handlers::cancel_schedule))
        .route("/events", get(events_handler))
        .route_layer(middleware::from_fn_with_state(state, control_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(guarded)
}
