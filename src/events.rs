//! Operator-facing status events.
//!
//! Everything the control UI may want to hear about (connections coming and
//! going, commands going out, schedules starting) flows through this one
//! channel, so the UI does not need to know which part of the server raised it.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::models::command::{Action, ModuleId};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AppEvent {
    ClientConnected { id: Arc<str>, clients: usize },
    ClientDisconnected { id: Arc<str>, clients: usize },
    CommandBroadcast { module: ModuleId, action: Action, recipients: usize },
    OverlaysRefreshed { clients: usize },
    ScheduleStarted { module: ModuleId },
    ScheduleStopped { module: ModuleId },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
