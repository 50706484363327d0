use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};

/// One overlay page connected over the WebSocket endpoint.
#[derive(Clone, Debug)]
pub struct ClientData {
    pub id: Arc<str>,
    pub ip: SocketAddr,
    pub user_agent: Option<String>,
    pub connected_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub id: Arc<str>,
    pub ip: String,
    pub user_agent: Option<String>,
    pub connected_at: DateTime<Utc>,
}

impl From<&ClientData> for ClientStats {
    fn from(client: &ClientData) -> Self {
        Self {
            id: client.id.clone(),
            ip: client.ip.to_string(),
            user_agent: client.user_agent.clone(),
            connected_at: client.connected_at,
        }
    }
}
