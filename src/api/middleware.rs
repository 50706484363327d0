use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use crate::state::AppState;

/// Guards the command surface. Without a configured token every request
/// passes; the server binds to loopback by default.
pub async fn control_auth(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let Some(token) = state.control_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    if req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        == Some(token)
    {
        Ok(next.run(req).await)
    } else {
        tracing::warn!(uri = %req.uri(), "rejected control request without valid token");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "UNAUTHORIZED" })),
        ))
    }
}
