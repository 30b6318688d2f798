//! Broadcast boundary: fire-and-forget room-state notifications.
//!
//! The broadcaster is an injected dependency with an explicit lifecycle,
//! never an ambient singleton, so the core runs under a no-op substitute in
//! tests. Publishing must never block or fail a locked mutation: events are
//! buffered in an [`Outbox`] while the room lease is held and flushed only
//! after the commit succeeds.

mod channel;

pub use channel::ChannelBroadcaster;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{GameStatus, GroupType, PhaseId};
use crate::domain::participant::RoomId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The instruction ending the current phase changed.
    Instruction { phase: PhaseId, text: String },
    /// A public history line was appended.
    History { line: String },
    StatusChanged { status: GameStatus },
    SeatsChanged,
    CardsDealt,
    AudioCue { cue: String },
    GameFinished { winner: GroupType },
}

pub trait Broadcaster: Send + Sync {
    /// Fire-and-forget. Implementations must not block the caller; a
    /// delivery failure never fails the state mutation that produced it.
    fn publish(&self, room_id: RoomId, event: GameEvent);
}

/// Discards every event. Used in tests.
#[derive(Debug, Default)]
pub struct NoopBroadcaster;

impl Broadcaster for NoopBroadcaster {
    fn publish(&self, _room_id: RoomId, _event: GameEvent) {}
}

/// Events produced during a locked mutation, flushed after commit.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<GameEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn flush(self, broadcaster: &dyn Broadcaster, room_id: RoomId) {
        for event in self.events {
            broadcaster.publish(room_id, event);
        }
    }
}
