use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use crate::helpers::{
    TEST_TOKEN, body_json, create_test_state, get_request, json_request, send,
};
use overlaycast::build_router;

#[tokio::test]
async fn test_control_routes_require_token() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/status")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "UNAUTHORIZED" }));

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/trigger")
            .header("authorization", "wrong")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"module":"LOWER_THIRD","action":"SHOW"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get_request("/api/status")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_open() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_no_token_configured_allows_everything() {
    let (state, _dir) = create_test_state(None);
    let app = build_router(state);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/stats")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true, "data": [] }));
}

#[tokio::test]
async fn test_trigger_updates_status_and_state() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/trigger",
            json!({ "module": "NOW_PLAYING", "action": "SHOW", "payload": { "title": "Outer Wilds" } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["module"], "NOW_PLAYING");

    let body = body_json(send(&app, get_request("/api/status")).await).await;
    assert_eq!(body["data"]["connectedClients"], 0);
    assert_eq!(
        body["data"]["modules"],
        json!([{ "module": "NOW_PLAYING", "action": "SHOW" }])
    );

    let body = body_json(send(&app, get_request("/api/state/NOW_PLAYING")).await).await;
    assert_eq!(
        body["data"],
        json!({ "action": "SHOW", "payload": { "title": "Outer Wilds" } })
    );
}

#[tokio::test]
async fn test_hidden_module_has_no_state() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    for action in ["SHOW", "HIDE"] {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/trigger",
                json!({ "module": "TICKER", "action": action, "payload": { "text": "hi" } }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, get_request("/api/state/TICKER")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "NOT_FOUND" })
    );
}

#[tokio::test]
async fn test_hidden_lower_third_falls_back_to_remembered_values() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state.clone());

    send(
        &app,
        json_request(
            "POST",
            "/api/trigger",
            json!({ "module": "LOWER_THIRD", "action": "SHOW", "payload": { "name": "Alex", "title": "Host" } }),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/trigger",
            json!({ "module": "LOWER_THIRD", "action": "HIDE" }),
        ),
    )
    .await;

    let body = body_json(send(&app, get_request("/api/state/LOWER_THIRD")).await).await;
    assert_eq!(body["data"]["action"], "UPDATE");
    assert_eq!(body["data"]["payload"]["name"], "Alex");
    assert_eq!(body["data"]["payload"]["title"], "Host");

    let config = state.store.get();
    assert_eq!(config.overlays.lower_third.last_used_name, "Alex");
}

#[tokio::test]
async fn test_malformed_trigger_is_rejected() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state.clone());

    let response = send(
        &app,
        json_request("POST", "/api/trigger", json!({ "action": "SHOW" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/trigger",
            json!({ "module": "LOWER_THIRD", "action": "BLINK" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/trigger")
            .header("authorization", TEST_TOKEN)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(state.overlay.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_refresh_reports_client_count() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(&app, json_request("POST", "/api/refresh", json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "data": { "clients": 0 } })
    );
}

#[tokio::test]
async fn test_config_patch_and_read_back() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(
        &app,
        json_request(
            "PATCH",
            "/api/config/overlays/nowPlaying",
            json!({ "displayDuration": 42 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request(
            "PATCH",
            "/api/config/scenes/brb",
            json!({ "title": "Back in five" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&app, get_request("/api/config")).await).await;
    let overlays = &body["data"]["overlays"];
    assert_eq!(overlays["nowPlaying"]["displayDuration"], 42);
    assert_eq!(
        overlays["streamScenes"]["scenes"]["brb"]["title"],
        "Back in five"
    );

    let response = send(
        &app,
        json_request("PATCH", "/api/config/overlays/weather", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_unknown_schedule_is_not_found() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/schedules/LOWER_THIRD")
            .header("authorization", TEST_TOKEN)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_start_and_cancel() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/schedules",
            json!({
                "module": "STREAM_SCENE",
                "payload": { "sceneId": "starting" },
                "schedule": { "kind": "countdown", "seconds": 300 },
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&app, get_request("/api/status")).await).await;
    assert_eq!(body["data"]["schedules"], json!(["STREAM_SCENE"]));

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/schedules/STREAM_SCENE")
            .header("authorization", TEST_TOKEN)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.scheduler.active().is_empty());
}

#[tokio::test]
async fn test_overlay_pages_are_whitelisted() {
    let (state, dir) = create_test_state(None);
    std::fs::write(dir.path().join("lower-third.html"), "<html>lt</html>").unwrap();
    std::fs::write(dir.path().join("secret.html"), "<html>no</html>").unwrap();
    let app = build_router(state);

    let response = send(&app, get_request("/overlay/lower-third")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<html>lt</html>");

    let response = send(&app, get_request("/overlay/secret")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Whitelisted but missing on disk.
    let response = send(&app, get_request("/overlay/now-playing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_falls_back_to_not_found() {
    let (state, _dir) = create_test_state(None);
    let app = build_router(state);

    let response = send(&app, get_request("/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "NOT_FOUND" }));
}

#[tokio::test]
async fn test_reaction_source_routes() {
    let (state, _dir) = create_test_state(Some(TEST_TOKEN));
    let app = build_router(state.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/reaction/sources",
            json!({
                "id": "r1",
                "name": "Trailer",
                "channelName": "Some Channel",
                "platform": "youtube",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request(
            "PATCH",
            "/api/reaction/sources/r1",
            json!({ "videoTitle": "Launch trailer" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&app, get_request("/api/config")).await).await;
    let sources = &body["data"]["overlays"]["reaction"]["sources"];
    assert_eq!(sources[0]["id"], "r1");
    assert_eq!(sources[0]["videoTitle"], "Launch trailer");

    let response = send(
        &app,
        json_request("PATCH", "/api/reaction/sources/missing", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/reaction/sources/r1")
            .header("authorization", TEST_TOKEN)
            .body(Body::empty())
            .unwrap()
    };
    assert_eq!(send(&app, delete()).await.status(), StatusCode::OK);
    assert_eq!(send(&app, delete()).await.status(), StatusCode::NOT_FOUND);
    assert!(state.store.get().overlays.reaction.sources.is_empty());
}
