use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::types::{ApiResult, IntoApiResult, done, fail, ok};
use crate::{
    models::{
        client::ClientStats,
        command::{Action, Command, ModuleId, ModuleState},
        config::{AppConfig, ReactionSource},
    },
    scheduler::Schedule,
    state::AppState,
};

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: Utc::now(),
    })
}

/// Broadcasts a SHOW/HIDE/UPDATE command and remembers its text for later
/// sessions.
pub async fn trigger(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Command> {
    let Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected overlay command body");
            return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST");
        }
    };

    let command = match state.overlay.dispatch(raw).await {
        Ok(command) => command,
        Err(e) => return Err::<Command, _>(e).into_api_result(),
    };

    if let Err(e) = state.store.remember(&command) {
        // The overlay already went out; only persistence failed.
        tracing::error!(error = %e, module = %command.module, "failed to remember overlay values");
    }
    ok(command)
}

#[derive(Serialize)]
pub struct Refreshed {
    clients: usize,
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Refreshed> {
    let clients = state.overlay.force_refresh_all();
    ok(Refreshed { clients })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStatus {
    module: ModuleId,
    action: Action,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStatus {
    connected_clients: usize,
    modules: Vec<ModuleStatus>,
    schedules: Vec<ModuleId>,
}

pub async fn status(State(state): State<Arc<AppState>>) -> ApiResult<OverlayStatus> {
    let modules = state
        .overlay
        .snapshot()
        .await
        .into_iter()
        .map(|(module, s)| ModuleStatus {
            module,
            action: s.action,
        })
        .collect();

    ok(OverlayStatus {
        connected_clients: state.overlay.connected_client_count(),
        modules,
        schedules: state.scheduler.active(),
    })
}

pub async fn module_state(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
) -> ApiResult<ModuleState> {
    let module = match ModuleId::new(&module) {
        Ok(module) => module,
        Err(e) => return Err::<ModuleState, _>(e).into_api_result(),
    };
    state.overlay.query_state(&module).await.into_api_result()
}

pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ClientStats>> {
    let clients = state
        .registry
        .clients()
        .iter()
        .map(ClientStats::from)
        .collect();
    ok(clients)
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<AppConfig> {
    ok(state.store.get())
}

pub async fn patch_section(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
    Json(patch): Json<Value>,
) -> ApiResult<()> {
    state
        .store
        .merge_section(&section, patch)
        .into_api_result()
}

pub async fn patch_scene(
    State(state): State<Arc<AppState>>,
    Path(scene_id): Path<String>,
    Json(patch): Json<Value>,
) -> ApiResult<()> {
    state.store.merge_scene(&scene_id, patch).into_api_result()
}

pub async fn add_reaction_source(
    State(state): State<Arc<AppState>>,
    Json(source): Json<ReactionSource>,
) -> ApiResult<()> {
    state.store.add_reaction_source(source).into_api_result()
}

pub async fn update_reaction_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> ApiResult<()> {
    state
        .store
        .update_reaction_source(&id, patch)
        .into_api_result()
}

pub async fn remove_reaction_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.store.remove_reaction_source(&id).into_api_result()
}

#[derive(Deserialize)]
pub struct ScheduleRequest {
    module: String,
    #[serde(default)]
    payload: Option<Value>,
    schedule: Schedule,
}

pub async fn start_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> ApiResult<()> {
    let module = match ModuleId::new(&request.module) {
        Ok(module) => module,
        Err(e) => return Err::<(), _>(e).into_api_result(),
    };
    state
        .scheduler
        .start(
            module,
            request.payload.unwrap_or_else(|| Value::Object(Default::default())),
            request.schedule,
        );
    done()
}

pub async fn cancel_schedule(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
) -> ApiResult<()> {
    let module = match ModuleId::new(&module) {
        Ok(module) => module,
        Err(e) => return Err::<(), _>(e).into_api_result(),
    };
    if state.scheduler.cancel(&module) {
        done()
    } else {
        fail(StatusCode::NOT_FOUND, "NOT_FOUND")
    }
}
