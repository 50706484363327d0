use futures_util::SinkExt;
use serde_json::json;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::helpers::{
    TEST_TOKEN, assert_silent, connect, create_test_state, next_event, spawn_server,
    wait_for_clients,
};
use overlaycast::models::command::{Action, Command, KnownModule};

fn request_state(module: &str) -> Message {
    Message::text(json!({ "event": "request-state", "data": module }).to_string())
}

#[tokio::test]
async fn test_late_joiner_gets_replay_only_for_itself() {
    let (state, _dir) = create_test_state(None);
    let addr = spawn_server(state.clone()).await;

    let mut early = connect(addr).await;
    wait_for_clients(&state, 1).await;

    state
        .overlay
        .broadcast(Command::new(KnownModule::LowerThird, Action::Show, json!({ "name": "Alex" })))
        .await;
    let event = next_event(&mut early).await;
    assert_eq!(event["event"], "overlay-event");
    assert_eq!(event["data"]["payload"]["name"], "Alex");

    let mut late = connect(addr).await;
    wait_for_clients(&state, 2).await;
    late.send(request_state("LOWER_THIRD")).await.unwrap();

    let replay = next_event(&mut late).await;
    assert_eq!(
        replay,
        json!({
            "event": "overlay-event",
            "data": { "module": "LOWER_THIRD", "action": "SHOW", "payload": { "name": "Alex" } },
        })
    );
    assert_silent(&mut early).await;
}

#[tokio::test]
async fn test_request_state_for_unknown_module_is_silent() {
    let (state, _dir) = create_test_state(None);
    let addr = spawn_server(state.clone()).await;

    let mut client = connect(addr).await;
    wait_for_clients(&state, 1).await;
    client.send(request_state("TICKER")).await.unwrap();
    client.send(Message::text("not json")).await.unwrap();

    assert_silent(&mut client).await;
    assert_eq!(state.overlay.connected_client_count(), 1);
}

#[tokio::test]
async fn test_broadcast_reaches_every_client_in_order() {
    let (state, _dir) = create_test_state(None);
    let addr = spawn_server(state.clone()).await;

    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for_clients(&state, 2).await;

    for action in [Action::Show, Action::Update, Action::Hide] {
        state
            .overlay
            .broadcast(Command::new(KnownModule::NowPlaying, action, json!({})))
            .await;
    }

    for client in [&mut a, &mut b] {
        for expected in ["SHOW", "UPDATE", "HIDE"] {
            assert_eq!(next_event(client).await["data"]["action"], expected);
        }
    }
}

#[tokio::test]
async fn test_refresh_and_disconnect() {
    let (state, _dir) = create_test_state(None);
    let addr = spawn_server(state.clone()).await;

    let mut a = connect(addr).await;
    let b = connect(addr).await;
    wait_for_clients(&state, 2).await;

    assert_eq!(state.overlay.force_refresh_all(), 2);
    assert_eq!(next_event(&mut a).await, json!({ "event": "refresh-overlay" }));

    drop(b);
    wait_for_clients(&state, 1).await;
    assert_eq!(state.registry.clients().len(), 1);
}

#[tokio::test]
async fn test_status_stream_reports_broadcasts() {
    let (state, _dir) = create_test_state(None);
    let addr = spawn_server(state.clone()).await;

    let (mut events, _) = connect_async(format!("ws://{addr}/api/events")).await.unwrap();

    // The stream subscribes after the handshake; retry until it is listening.
    let mut received = None;
    for _ in 0..50 {
        state
            .overlay
            .broadcast(Command::new(KnownModule::LowerThird, Action::Show, json!({})))
            .await;
        if let Ok(event) = tokio::time::timeout(Duration::from_millis(100), next_event(&mut events)).await {
            received = Some(event);
            break;
        }
    }

    assert_eq!(
        received.expect("status stream never reported a broadcast"),
        json!({ "kind": "commandBroadcast", "module": "LOWER_THIRD", "action": "SHOW", "recipients": 0 })
    );
}

#[tokio::test]
async fn test_status_stream_requires_token_when_configured() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let addr = spawn_server(state).await;

    assert!(connect_async(format!("ws://{addr}/api/events")).await.is_err());
}
