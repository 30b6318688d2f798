use std::sync::Arc;

use crate::broadcast::{Broadcaster, NoopBroadcaster};
use crate::config::EngineConfig;
use crate::store::{MemoryRoomStore, RoomStore};

/// Shared engine resources, injected into the game-flow service.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RoomStore>,
        broadcaster: Arc<dyn Broadcaster>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            broadcaster,
            config,
        }
    }

    /// In-memory store with the given broadcaster.
    pub fn in_memory(broadcaster: Arc<dyn Broadcaster>, config: EngineConfig) -> Self {
        Self::new(Arc::new(MemoryRoomStore::new()), broadcaster, config)
    }

    /// In-memory store, no-op broadcaster, default config.
    pub fn for_tests() -> Self {
        Self::in_memory(Arc::new(NoopBroadcaster), EngineConfig::default())
    }
}
