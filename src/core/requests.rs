//! Active service requests, at most one per room.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{FanSpeed, Mode, Priority, RoomId, UnitId};

/// A room's request for climate-control service.
///
/// Created on admission, deactivated on cancellation or target-reached
/// release. `assigned_unit` is set while the room is in the service set and
/// cleared on eviction or release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Requesting room.
    pub room_id: RoomId,
    /// Requested operating mode.
    pub mode: Mode,
    /// Requested fan speed; fixes the scheduling priority.
    pub fan_speed: FanSpeed,
    /// Target temperature, always within the mode's valid range.
    pub target_temp: f64,
    /// Priority derived from fan speed.
    pub priority: Priority,
    /// Simulated minute at which the request was created.
    pub request_time_min: u64,
    /// Unit currently serving the room, if any.
    pub assigned_unit: Option<UnitId>,
    /// Whether this request is still live.
    pub active: bool,
}

/// Partial update applied to an active request. `None` fields are untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustSettings {
    /// New operating mode.
    pub mode: Option<Mode>,
    /// New fan speed.
    pub fan_speed: Option<FanSpeed>,
    /// New target temperature; clamped to the (possibly updated) mode range.
    pub target_temp: Option<f64>,
}

impl AdjustSettings {
    /// Whether the update carries any field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mode.is_none() && self.fan_speed.is_none() && self.target_temp.is_none()
    }
}

/// Store of service requests keyed by room, enforcing the one-active-request
/// invariant per room.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: HashMap<RoomId, ServiceRequest>,
}

impl RequestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deactivate any prior active request for the room and create a new
    /// active one. Out-of-range targets are clamped to the nearest bound of
    /// the mode's valid range.
    pub fn create_or_replace(
        &mut self,
        room_id: RoomId,
        mode: Mode,
        fan_speed: FanSpeed,
        target_temp: f64,
        now_min: u64,
    ) -> &ServiceRequest {
        let clamped = mode.clamp_target(target_temp);
        if (clamped - target_temp).abs() > f64::EPSILON {
            tracing::warn!(
                room = room_id,
                requested = target_temp,
                clamped,
                "target temperature out of range, clamped"
            );
        }
        let request = ServiceRequest {
            room_id,
            mode,
            fan_speed,
            target_temp: clamped,
            priority: fan_speed.priority(),
            request_time_min: now_min,
            assigned_unit: None,
            active: true,
        };
        self.requests.insert(room_id, request);
        &self.requests[&room_id]
    }

    /// The active request for a room, if any.
    #[must_use]
    pub fn get_active(&self, room_id: RoomId) -> Option<&ServiceRequest> {
        self.requests.get(&room_id).filter(|r| r.active)
    }

    /// Mutable access to the active request for a room.
    pub fn get_active_mut(&mut self, room_id: RoomId) -> Option<&mut ServiceRequest> {
        self.requests.get_mut(&room_id).filter(|r| r.active)
    }

    /// Deactivate the room's request. Idempotent; a room with no active
    /// request is a no-op.
    pub fn deactivate(&mut self, room_id: RoomId) {
        if let Some(request) = self.requests.get_mut(&room_id) {
            request.active = false;
            request.assigned_unit = None;
        }
    }

    /// Apply a partial settings update to the room's active request.
    ///
    /// Recomputes priority when the fan speed changes. A mode change without
    /// an explicit target resets the target to the new mode's default; an
    /// explicit target is clamped to the mode's range. Returns whether any
    /// field actually changed; `false` when no active request exists or no
    /// field was supplied.
    pub fn adjust(&mut self, room_id: RoomId, settings: AdjustSettings) -> bool {
        if settings.is_empty() {
            return false;
        }
        let Some(request) = self.requests.get_mut(&room_id).filter(|r| r.active) else {
            return false;
        };

        let mut changed = false;

        if let Some(mode) = settings.mode {
            if mode != request.mode {
                request.mode = mode;
                if settings.target_temp.is_none() {
                    request.target_temp = mode.default_target();
                }
                changed = true;
            }
        }

        if let Some(fan_speed) = settings.fan_speed {
            if fan_speed != request.fan_speed {
                request.fan_speed = fan_speed;
                request.priority = fan_speed.priority();
                changed = true;
            }
        }

        if let Some(target) = settings.target_temp {
            let clamped = request.mode.clamp_target(target);
            if (clamped - request.target_temp).abs() > f64::EPSILON {
                request.target_temp = clamped;
                changed = true;
            }
        }

        changed
    }

    /// All active requests, in ascending room-id order.
    #[must_use]
    pub fn active_requests(&self) -> Vec<&ServiceRequest> {
        let mut active: Vec<_> = self.requests.values().filter(|r| r.active).collect();
        active.sort_by_key(|r| r.room_id);
        active
    }
}
