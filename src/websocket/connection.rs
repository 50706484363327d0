use axum::{
    body::Bytes,
    extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::time::{Instant, interval_at};

use crate::{
    broadcast::ClientConnection,
    models::{client::ClientData, event::ClientEvent},
    state::AppState,
    utils::id_generator::mini_id,
};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(80);

pub fn proceed_with_socket(
    ws: WebSocketUpgrade,
    addr: SocketAddr,
    headers: HeaderMap,
    state: Arc<AppState>,
) -> Response {
    let user_agent = headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let id = mini_id(8);

    ws.on_upgrade(move |socket| handle_socket(socket, state, addr, user_agent, id))
}

pub async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    ip: SocketAddr,
    user_agent: Option<String>,
    id: Arc<str>,
) {
    let ClientConnection { id, mut frames } = state.registry.register(ClientData {
        id,
        ip,
        user_agent,
        connected_at: Utc::now(),
    });
    state.overlay.on_connect(&id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let send_id = id.clone();
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);

        loop {
            let frame = tokio::select! {
                // Queued frames go first so a due ping never delays them.
                biased;
                queued = frames.recv() => match queued {
                    Some(frame) => WsMessage::Text(frame.to_string().into()),
                    None => {
                        tracing::debug!(connection_id = %send_id, "outbound queue closed");
                        break;
                    }
                },
                _ = heartbeat.tick() => WsMessage::Ping(Bytes::new()),
            };

            if ws_sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let recv_id = id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => {
                    match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(ClientEvent::RequestState(module)) => {
                            recv_state.overlay.request_state(&recv_id, module).await;
                        }
                        Err(e) => {
                            tracing::debug!(connection_id = %recv_id, error = %e, "ignoring client frame");
                        }
                    }
                }
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(connection_id = %recv_id, error = %e, "overlay socket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(&id);
    state.overlay.on_disconnect(&id);
}
