use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tokio::sync::mpsc;

use crate::models::{client::ClientData, event::ServerEvent};

/// Delivery side of the overlay channel.
///
/// Sends are fire-and-forget: implementations queue the frame and return
/// without waiting on the client. Frames queued for one client leave in the
/// order they were queued, whether they came from `emit_all` or `emit_to`.
pub trait Transport: Send + Sync + 'static {
    /// Sends to every connected client and returns how many were reached.
    fn emit_all(&self, event: &ServerEvent) -> usize;

    /// Sends to one client. Returns `false` if it is not connected.
    fn emit_to(&self, connection_id: &str, event: &ServerEvent) -> bool;

    /// Live number of connected clients.
    fn connection_count(&self) -> usize;
}

/// Receiving half handed to a connection's send loop.
pub struct ClientConnection {
    pub id: Arc<str>,
    pub frames: mpsc::UnboundedReceiver<Arc<str>>,
}

struct ClientEntry {
    data: ClientData,
    tx: mpsc::UnboundedSender<Arc<str>>,
}

/// WebSocket-backed transport. Every connection owns one outbound queue;
/// fan-out and targeted replies share it, so a reply can never overtake a
/// later broadcast.
pub struct ClientRegistry {
    clients: RwLock<HashMap<Arc<str>, ClientEntry>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, data: ClientData) -> ClientConnection {
        let (tx, frames) = mpsc::unbounded_channel();
        let id = data.id.clone();
        self.write().insert(id.clone(), ClientEntry { data, tx });
        ClientConnection { id, frames }
    }

    pub fn unregister(&self, connection_id: &str) -> bool {
        self.write().remove(connection_id).is_some()
    }

    pub fn clients(&self) -> Vec<ClientData> {
        self.read().values().map(|entry| entry.data.clone()).collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Arc<str>, ClientEntry>> {
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Arc<str>, ClientEntry>> {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn encode(event: &ServerEvent) -> Option<Arc<str>> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize overlay frame");
            None
        }
    }
}

impl Transport for ClientRegistry {
    fn emit_all(&self, event: &ServerEvent) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        self.read()
            .values()
            .filter(|entry| entry.tx.send(frame.clone()).is_ok())
            .count()
    }

    fn emit_to(&self, connection_id: &str, event: &ServerEvent) -> bool {
        let clients = self.read();
        let Some(entry) = clients.get(connection_id) else {
            return false;
        };
        let Some(frame) = encode(event) else {
            return false;
        };
        entry.tx.send(frame).is_ok()
    }

    fn connection_count(&self) -> usize {
        self.read().len()
    }
}
