//! In-memory room store: one async mutex per room, copy-on-lock semantics.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{RoomLease, RoomStore, StoreError, WritebackSlot};
use crate::domain::participant::{RoomId, UserId};
use crate::domain::room::Room;

pub struct MemoryRoomStore {
    rooms: DashMap<RoomId, Arc<Mutex<Room>>>,
    seated: DashMap<UserId, RoomId>,
    next_id: AtomicI64,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            seated: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

struct MemorySlot {
    guard: OwnedMutexGuard<Room>,
}

impl WritebackSlot for MemorySlot {
    fn write(self: Box<Self>, room: Room) -> Result<(), StoreError> {
        let mut guard = self.guard;
        *guard = room;
        Ok(())
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn create(&self, mut room: Room) -> Result<RoomId, StoreError> {
        let room_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        room.room_id = room_id;
        for p in &mut room.participants {
            p.room_id = room_id;
        }
        self.rooms.insert(room_id, Arc::new(Mutex::new(room)));
        Ok(room_id)
    }

    async fn lock(&self, room_id: RoomId) -> Result<RoomLease, StoreError> {
        let cell = self
            .rooms
            .get(&room_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::RoomNotFound(room_id))?;
        let guard = cell.lock_owned().await;
        let room = guard.clone();
        Ok(RoomLease::new(room, Box::new(MemorySlot { guard })))
    }

    async fn snapshot(&self, room_id: RoomId) -> Result<Room, StoreError> {
        let cell = self
            .rooms
            .get(&room_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::RoomNotFound(room_id))?;
        let guard = cell.lock().await;
        Ok(guard.clone())
    }

    async fn room_of(&self, user_id: UserId) -> Option<RoomId> {
        self.seated.get(&user_id).map(|entry| *entry.value())
    }

    async fn bind_user(&self, user_id: UserId, room_id: RoomId) {
        self.seated.insert(user_id, room_id);
    }

    async fn unbind_user(&self, user_id: UserId) {
        self.seated.remove(&user_id);
    }
}
