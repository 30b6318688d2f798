//! In-process broadcast fan-out over per-room channels.

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use super::{Broadcaster, GameEvent};
use crate::domain::participant::RoomId;

const ROOM_CHANNEL_CAPACITY: usize = 256;

/// Fans events out on one `tokio::sync::broadcast` channel per room.
///
/// Carries an explicit connect/shutdown lifecycle tied to process startup
/// and shutdown. Publishing into a disconnected broadcaster or a room with
/// no subscribers drops the event, by contract.
pub struct ChannelBroadcaster {
    channels: DashMap<RoomId, broadcast::Sender<GameEvent>>,
    connected: RwLock<bool>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            connected: RwLock::new(false),
        }
    }

    pub fn connect(&self) {
        *self.connected.write() = true;
    }

    /// Drop every room channel; subscribers observe a closed stream.
    pub fn shutdown(&self) {
        *self.connected.write() = false;
        self.channels.clear();
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.read()
    }

    /// Subscribe to one room's event stream.
    pub fn subscribe(&self, room_id: RoomId) -> broadcast::Receiver<GameEvent> {
        self.channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, room_id: RoomId, event: GameEvent) {
        if !self.is_connected() {
            debug!(room_id, "broadcast dropped, broadcaster not connected");
            return;
        }
        if let Some(tx) = self.channels.get(&room_id) {
            // A send error only means nobody is listening right now.
            let _ = tx.send(event);
        }
    }
}
