//! Storage boundary: load a room exclusively, mutate a copy, commit
//! atomically, release.
//!
//! The engine never mutates shared state in place. `lock` hands out a
//! [`RoomLease`] holding a deep copy of the record plus the exclusive hold;
//! `commit` writes the copy back all-or-nothing. Dropping a lease without
//! committing rolls the mutation back, so a failed handler can never leave
//! a partially-applied ballot or phase-list splice behind.

mod memory;

pub use memory::MemoryRoomStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::participant::{RoomId, UserId};
use crate::domain::room::Room;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Write-back half of an exclusive lease. Implementations release the
/// exclusive hold when dropped.
pub trait WritebackSlot: Send {
    fn write(self: Box<Self>, room: Room) -> Result<(), StoreError>;
}

/// Exclusive hold on one room record plus a mutable copy of it.
pub struct RoomLease {
    pub room: Room,
    slot: Box<dyn WritebackSlot>,
}

impl RoomLease {
    pub fn new(room: Room, slot: Box<dyn WritebackSlot>) -> Self {
        Self { room, slot }
    }

    /// Write the mutated copy back and release the hold.
    pub fn commit(self) -> Result<(), StoreError> {
        self.slot.write(self.room)
    }
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a new room, assigning its id.
    async fn create(&self, room: Room) -> Result<RoomId, StoreError>;

    /// Exclusive load; blocks until every other lease on the room is gone.
    async fn lock(&self, room_id: RoomId) -> Result<RoomLease, StoreError>;

    /// Read-only snapshot. Not safe for decision logic.
    async fn snapshot(&self, room_id: RoomId) -> Result<Room, StoreError>;

    /// The room a user is currently seated in, if any.
    async fn room_of(&self, user_id: UserId) -> Option<RoomId>;

    async fn bind_user(&self, user_id: UserId, room_id: RoomId);

    async fn unbind_user(&self, user_id: UserId);
}
