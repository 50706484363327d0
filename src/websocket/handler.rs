use axum::{
    extract::{ConnectInfo, State, ws::WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use std::{net::SocketAddr, sync::Arc};

use crate::{state::AppState, websocket::connection::proceed_with_socket};

/// Upgrade endpoint for overlay pages. Pages are loaded by the streaming
/// software from a local URL, so no credentials are asked for.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    proceed_with_socket(ws, addr, headers, state)
}
