//! Room provider contract.
//!
//! Rooms live in an external system (check-in, persistence); the scheduler
//! only reads a room's baseline and current temperature and writes back the
//! simulated current temperature.

use crate::core::types::RoomId;

/// Temperature view of a room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomReading {
    /// Ambient temperature the room drifts back to when unserved.
    pub baseline_temp: f64,
    /// Current temperature.
    pub current_temp: f64,
}

/// Abstraction over the external room store.
pub trait RoomProvider: Send + Sync {
    /// Temperature reading for a room, or `None` for an unknown room.
    fn get_room(&self, room_id: RoomId) -> Option<RoomReading>;

    /// Persist a new current temperature for a room. Unknown rooms are
    /// ignored.
    fn set_current_temp(&self, room_id: RoomId, value: f64);
}
