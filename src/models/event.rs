use serde::{Deserialize, Serialize};

use super::command::{Command, ModuleId};

/// Frames sent from the server to overlay pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    OverlayEvent(Command),
    RefreshOverlay,
}

/// Frames overlay pages send to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    RequestState(ModuleId),
}
