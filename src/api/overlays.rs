use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::state::AppState;

/// Pages the streaming software may load as browser sources.
pub const OVERLAY_PAGES: &[&str] = &[
    "lower-third",
    "now-playing",
    "social-widget",
    "scene-starting",
    "scene-brb",
    "scene-ending",
    "scene-technical",
    "reaction",
];

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "NOT_FOUND" })),
    )
        .into_response()
}

pub async fn overlay_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    // Only whitelisted names ever reach the filesystem.
    if !OVERLAY_PAGES.contains(&name.as_str()) {
        return not_found();
    }

    let path = state.overlays_dir.join(format!("{name}.html"));
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "overlay page unavailable");
            not_found()
        }
    }
}
