//! Domain identifiers, operating modes, and fan speeds.

use serde::{Deserialize, Serialize};

/// Room identifier, assigned by the external room system.
pub type RoomId = u32;

/// Unit identifier, `1..=K` within the pool.
pub type UnitId = u32;

/// Scheduling priority derived from fan speed. Higher wins.
pub type Priority = u8;

/// Operating mode of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Move the room temperature down toward the target.
    Cooling,
    /// Move the room temperature up toward the target.
    Heating,
}

impl Mode {
    /// Target temperature applied when a request omits one.
    #[must_use]
    pub const fn default_target(self) -> f64 {
        match self {
            Self::Cooling => 25.0,
            Self::Heating => 22.0,
        }
    }

    /// Valid target range `(low, high)` for the mode, inclusive.
    #[must_use]
    pub const fn target_range(self) -> (f64, f64) {
        match self {
            Self::Cooling => (18.0, 28.0),
            Self::Heating => (18.0, 25.0),
        }
    }

    /// Clamp a requested target to the nearest bound of the mode's range.
    #[must_use]
    pub fn clamp_target(self, target: f64) -> f64 {
        let (low, high) = self.target_range();
        target.clamp(low, high)
    }
}

/// Fan speed of a service request. Determines both scheduling priority and
/// how fast the room temperature moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanSpeed {
    /// One degree per minute, priority 3.
    High,
    /// One degree per two minutes, priority 2.
    Medium,
    /// One degree per three minutes, priority 1.
    Low,
}

impl FanSpeed {
    /// Scheduling priority. Higher outranks lower.
    #[must_use]
    pub const fn priority(self) -> Priority {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Simulated minutes to move the room temperature one degree.
    #[must_use]
    pub const fn minutes_per_degree(self) -> u32 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Degrees the room temperature moves in one tick.
    #[must_use]
    pub fn degrees_per_tick(self) -> f64 {
        1.0 / f64::from(self.minutes_per_degree())
    }
}
