#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod broadcast;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;

// Re-exports for public API
pub use broadcast::{Broadcaster, ChannelBroadcaster, GameEvent, NoopBroadcaster};
pub use config::EngineConfig;
pub use error::EngineError;
pub use errors::domain::{DomainError, GameFinished};
pub use services::game_flow::{ActionReply, GameFlowService, RoomSpec};
pub use state::app_state::AppState;
pub use store::{MemoryRoomStore, RoomStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
