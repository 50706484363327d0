use std::{path::PathBuf, sync::Arc};

use crate::{
    broadcast::{BroadcastServer, ClientRegistry},
    events::EventBus,
    scheduler::Scheduler,
    store::ConfigStore,
};

pub type OverlayServer = BroadcastServer<ClientRegistry, ConfigStore>;
pub type OverlayScheduler = Scheduler<ClientRegistry, ConfigStore>;

pub struct AppState {
    pub overlay: Arc<OverlayServer>,
    pub registry: Arc<ClientRegistry>,
    pub store: Arc<ConfigStore>,
    pub scheduler: OverlayScheduler,
    pub control_token: Option<String>,
    pub overlays_dir: PathBuf,
}

impl AppState {
    pub fn new(store: ConfigStore, control_token: Option<String>, overlays_dir: PathBuf) -> Self {
        let registry = Arc::new(ClientRegistry::new());
        let store = Arc::new(store);
        let overlay = Arc::new(BroadcastServer::new(
            registry.clone(),
            store.clone(),
            EventBus::new(),
        ));

        Self {
            scheduler: Scheduler::new(overlay.clone()),
            overlay,
            registry,
            store,
            control_token,
            overlays_dir,
        }
    }
}
