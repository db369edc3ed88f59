//! In-memory room store for development and testing.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::rooms::{RoomProvider, RoomReading};
use crate::core::types::RoomId;

/// Simple in-memory room store keyed by room id.
#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    rooms: RwLock<HashMap<RoomId, RoomReading>>,
}

impl InMemoryRoomStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a room with the given baseline, starting at baseline
    /// temperature.
    pub fn insert_room(&self, room_id: RoomId, baseline_temp: f64) {
        self.insert_room_at(room_id, baseline_temp, baseline_temp);
    }

    /// Add or replace a room with an explicit current temperature.
    pub fn insert_room_at(&self, room_id: RoomId, baseline_temp: f64, current_temp: f64) {
        self.rooms.write().insert(
            room_id,
            RoomReading {
                baseline_temp,
                current_temp,
            },
        );
    }

    /// Remove a room. No-op when absent.
    pub fn remove_room(&self, room_id: RoomId) {
        self.rooms.write().remove(&room_id);
    }
}

impl RoomProvider for InMemoryRoomStore {
    fn get_room(&self, room_id: RoomId) -> Option<RoomReading> {
        self.rooms.read().get(&room_id).copied()
    }

    fn set_current_temp(&self, room_id: RoomId, value: f64) {
        if let Some(room) = self.rooms.write().get_mut(&room_id) {
            room.current_temp = value;
        }
    }
}
