use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{table::ModuleTable, transport::Transport};
use crate::{
    error::CommandError,
    events::{AppEvent, EventBus},
    models::{
        command::{Command, ModuleId, ModuleState},
        event::ServerEvent,
    },
};

/// Remembered values used when a module has no live state.
pub trait ConfigSource: Send + Sync + 'static {
    fn last_used(&self, module: &ModuleId) -> Option<ModuleState>;
}

/// Relays control commands to overlay clients and answers state requests
/// from clients that joined late.
pub struct BroadcastServer<T, C> {
    table: RwLock<ModuleTable>,
    transport: Arc<T>,
    config: Arc<C>,
    events: EventBus,
}

impl<T: Transport, C: ConfigSource> BroadcastServer<T, C> {
    pub fn new(transport: Arc<T>, config: Arc<C>, events: EventBus) -> Self {
        Self {
            table: RwLock::new(ModuleTable::new()),
            transport,
            config,
            events,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Stores the command as the module's state (or clears it on HIDE) and
    /// sends it to every connected client.
    pub async fn broadcast(&self, command: Command) {
        let module = command.module.clone();
        let action = command.action;

        // Hold the table across the fan-out so commands for a module leave
        // in the order they were applied.
        let mut table = self.table.write().await;
        table.apply(&command);
        let recipients = self.transport.emit_all(&ServerEvent::OverlayEvent(command));
        drop(table);

        tracing::info!(%module, action = action.as_str(), recipients, "overlay command broadcast");
        self.events.publish(AppEvent::CommandBroadcast {
            module,
            action,
            recipients,
        });
    }

    /// Parses and broadcasts a raw command, handing back what was sent.
    /// Malformed input is logged and dropped without touching any state.
    pub async fn dispatch(&self, raw: Value) -> Result<Command, CommandError> {
        let command = Command::from_value(raw).inspect_err(|e| {
            tracing::warn!(error = %e, "ignoring malformed overlay command");
        })?;
        self.broadcast(command.clone()).await;
        Ok(command)
    }

    /// Current state of a module, falling back to remembered config values.
    /// Never creates a table entry.
    pub async fn query_state(&self, module: &ModuleId) -> Option<ModuleState> {
        if let Some(state) = self.table.read().await.get(module) {
            return Some(state.clone());
        }
        self.config.last_used(module)
    }

    /// Answers a client's `request-state` by replying to that client alone.
    pub async fn request_state(&self, connection_id: &str, module: ModuleId) -> bool {
        // Queue the reply under the read lock: a HIDE applied after the read
        // is then queued behind it for this client.
        let table = self.table.read().await;
        let state = match table.get(&module) {
            Some(state) => Some(state.clone()),
            None => self.config.last_used(&module),
        };
        let Some(state) = state else {
            tracing::debug!(connection_id, %module, "no state to replay");
            return false;
        };
        let event = ServerEvent::OverlayEvent(state.into_command(module.clone()));
        let delivered = self.transport.emit_to(connection_id, &event);
        drop(table);

        tracing::debug!(connection_id, %module, delivered, "replayed module state");
        delivered
    }

    pub fn on_connect(&self, connection_id: &Arc<str>) {
        let clients = self.transport.connection_count();
        tracing::info!(connection_id = %connection_id, clients, "overlay client connected");
        self.events.publish(AppEvent::ClientConnected {
            id: connection_id.clone(),
            clients,
        });
    }

    pub fn on_disconnect(&self, connection_id: &Arc<str>) {
        let clients = self.transport.connection_count();
        tracing::info!(connection_id = %connection_id, clients, "overlay client disconnected");
        self.events.publish(AppEvent::ClientDisconnected {
            id: connection_id.clone(),
            clients,
        });
    }

    pub fn connected_client_count(&self) -> usize {
        self.transport.connection_count()
    }

    /// Tells every connected overlay page to reload itself.
    pub fn force_refresh_all(&self) -> usize {
        let clients = self.transport.connection_count();
        tracing::info!(clients, "refreshing all overlays");
        self.transport.emit_all(&ServerEvent::RefreshOverlay);
        self.events.publish(AppEvent::OverlaysRefreshed { clients });
        clients
    }

    /// Copy of every stored module state.
    pub async fn snapshot(&self) -> Vec<(ModuleId, ModuleState)> {
        self.table
            .read()
            .await
            .iter()
            .map(|(module, state)| (module.clone(), state.clone()))
            .collect()
    }
}
