//! Discrete per-tick temperature simulation.
//!
//! Two step functions: a served room moves toward its target at the fan
//! speed's rate, and an unserved off-baseline room drifts back toward its
//! ambient baseline. Recovery is a centrally tracked membership set driven
//! by the shared tick, not a per-room task.

use std::collections::BTreeSet;

use crate::core::types::{FanSpeed, Mode, RoomId};

/// Two temperatures within this distance are considered equal, both for
/// target-reached detection and for baseline arrival.
pub const TEMP_EPSILON: f64 = 0.1;

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Temperature after the step.
    pub new_temp: f64,
    /// Whether the step arrived at the target (or baseline).
    pub reached: bool,
}

/// Advance a served room's temperature one tick toward the target.
///
/// Cooling only moves while the room is above target, heating only while
/// below; the step clamps at the target and never overshoots.
#[must_use]
pub fn step_served(mode: Mode, fan_speed: FanSpeed, current: f64, target: f64) -> StepOutcome {
    let delta = fan_speed.degrees_per_tick();
    let new_temp = match mode {
        Mode::Cooling if current > target => (current - delta).max(target),
        Mode::Heating if current < target => (current + delta).min(target),
        Mode::Cooling | Mode::Heating => current,
    };
    StepOutcome {
        new_temp,
        reached: (new_temp - target).abs() < TEMP_EPSILON,
    }
}

/// Advance an unserved room's temperature one tick toward its baseline.
#[must_use]
pub fn step_recovery(current: f64, baseline: f64, rate: f64) -> StepOutcome {
    let new_temp = if current < baseline {
        (current + rate).min(baseline)
    } else {
        (current - rate).max(baseline)
    };
    StepOutcome {
        new_temp,
        reached: (new_temp - baseline).abs() < TEMP_EPSILON,
    }
}

/// Membership set of rooms currently drifting back toward baseline.
///
/// Start and cancel are idempotent control signals; the engine steps every
/// member once per tick and drops rooms that arrive at baseline.
#[derive(Debug, Default)]
pub struct RecoveryTracker {
    rooms: BTreeSet<RoomId>,
}

impl RecoveryTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a room as recovering. Idempotent.
    pub fn start(&mut self, room_id: RoomId) {
        self.rooms.insert(room_id);
    }

    /// Stop tracking a room. Idempotent.
    pub fn cancel(&mut self, room_id: RoomId) {
        self.rooms.remove(&room_id);
    }

    /// Whether a room is recovering.
    #[must_use]
    pub fn contains(&self, room_id: RoomId) -> bool {
        self.rooms.contains(&room_id)
    }

    /// Recovering rooms, ascending.
    #[must_use]
    pub fn rooms(&self) -> Vec<RoomId> {
        self.rooms.iter().copied().collect()
    }
}
