//! Timer-driven commands: auto-show repeats and scene countdowns.
//!
//! Schedules sit beside the broadcast core and only ever call
//! [`BroadcastServer::broadcast`]; the core itself has no timers.

use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;

use crate::{
    broadcast::{BroadcastServer, ConfigSource, Transport},
    events::AppEvent,
    models::command::{Action, Command, ModuleId},
};

const MIN_REPEAT_INTERVAL: Duration = Duration::from_secs(1);
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Schedule {
    /// SHOW now and then every `interval_secs`, `count` times in total
    /// (forever when absent or zero).
    #[serde(rename_all = "camelCase")]
    Repeat {
        interval_secs: u64,
        #[serde(default)]
        count: Option<u32>,
    },
    /// SHOW with `remainingSeconds`, then UPDATE once a second down to zero.
    #[serde(rename_all = "camelCase")]
    Countdown { seconds: u32 },
}

pub struct Scheduler<T, C> {
    server: Arc<BroadcastServer<T, C>>,
    tasks: Mutex<HashMap<ModuleId, JoinHandle<()>>>,
}

impl<T: Transport, C: ConfigSource> Scheduler<T, C> {
    pub fn new(server: Arc<BroadcastServer<T, C>>) -> Self {
        Self {
            server,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Starts `schedule` for `module`, replacing whatever ran for it before.
    pub fn start(&self, module: ModuleId, payload: Value, schedule: Schedule) {
        let server = self.server.clone();
        let task_module = module.clone();
        let handle = match schedule {
            Schedule::Repeat {
                interval_secs,
                count,
            } => {
                let interval = Duration::from_secs(interval_secs).max(MIN_REPEAT_INTERVAL);
                let count = count.filter(|c| *c > 0);
                tokio::spawn(run_repeat(server, task_module, payload, interval, count))
            }
            Schedule::Countdown { seconds } => {
                tokio::spawn(run_countdown(server, task_module, payload, seconds))
            }
        };

        if let Some(previous) = self.tasks().insert(module.clone(), handle) {
            previous.abort();
        }
        tracing::info!(%module, "schedule started");
        self.server
            .events()
            .publish(AppEvent::ScheduleStarted { module });
    }

    /// Stops the module's schedule. The overlay is left as it is; no HIDE is sent.
    pub fn cancel(&self, module: &ModuleId) -> bool {
        let Some(handle) = self.tasks().remove(module) else {
            return false;
        };
        let was_running = !handle.is_finished();
        handle.abort();
        if was_running {
            tracing::info!(%module, "schedule cancelled");
            self.server.events().publish(AppEvent::ScheduleStopped {
                module: module.clone(),
            });
        }
        was_running
    }

    /// Modules with a schedule still running.
    pub fn active(&self) -> Vec<ModuleId> {
        let mut tasks = self.tasks();
        tasks.retain(|_, handle| !handle.is_finished());
        let mut modules: Vec<_> = tasks.keys().cloned().collect();
        modules.sort();
        modules
    }

    fn tasks(&self) -> std::sync::MutexGuard<'_, HashMap<ModuleId, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, C> Drop for Scheduler<T, C> {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}

async fn run_repeat<T: Transport, C: ConfigSource>(
    server: Arc<BroadcastServer<T, C>>,
    module: ModuleId,
    payload: Value,
    interval: Duration,
    count: Option<u32>,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut shown = 0u32;
    loop {
        ticker.tick().await;
        server
            .broadcast(Command::new(module.clone(), Action::Show, payload.clone()))
            .await;
        shown += 1;
        if count.is_some_and(|limit| shown >= limit) {
            break;
        }
    }
    tracing::debug!(%module, shown, "repeat schedule finished");
    server
        .events()
        .publish(AppEvent::ScheduleStopped { module });
}

async fn run_countdown<T: Transport, C: ConfigSource>(
    server: Arc<BroadcastServer<T, C>>,
    module: ModuleId,
    payload: Value,
    seconds: u32,
) {
    let mut remaining = seconds;
    let mut ticker = tokio::time::interval(COUNTDOWN_TICK);
    ticker.tick().await;
    server
        .broadcast(Command::new(
            module.clone(),
            Action::Show,
            with_remaining(&payload, remaining),
        ))
        .await;

    while remaining > 0 {
        ticker.tick().await;
        remaining -= 1;
        server
            .broadcast(Command::new(
                module.clone(),
                Action::Update,
                with_remaining(&payload, remaining),
            ))
            .await;
    }
    tracing::debug!(%module, "countdown finished");
    server
        .events()
        .publish(AppEvent::ScheduleStopped { module });
}

fn with_remaining(payload: &Value, remaining: u32) -> Value {
    let mut payload = match payload {
        Value::Object(_) => payload.clone(),
        _ => json!({}),
    };
    payload["remainingSeconds"] = json!(remaining);
    payload
}
