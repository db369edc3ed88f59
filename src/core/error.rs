//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// `OutOfRange` and `CapacityExceeded` are recovered internally (clamping and
/// queueing respectively) and never surface to callers; they exist so the
/// internal transitions can name them.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Referenced room, unit, or request does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Operation is invalid for the current state of the room or unit.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Target temperature outside the mode's valid range.
    #[error("target temperature out of range")]
    OutOfRange,
    /// Service set is full. Resolved by queueing, never returned to callers.
    #[error("capacity exceeded")]
    CapacityExceeded,
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
