//! Build a scheduler engine from configuration and injected collaborators.

use crate::config::EngineConfig;
use crate::core::billing::BillingSink;
use crate::core::engine::SchedulerEngine;
use crate::core::error::SchedulerError;
use crate::core::rooms::RoomProvider;

/// Validate the configuration and construct an engine around the provided
/// room provider and billing sink.
///
/// # Errors
///
/// `Backend` when the configuration fails validation.
pub fn build_engine<R, B>(
    cfg: EngineConfig,
    rooms: R,
    billing: B,
) -> Result<SchedulerEngine<R, B>, SchedulerError>
where
    R: RoomProvider,
    B: BillingSink,
{
    cfg.validate()
        .map_err(|e| SchedulerError::Backend(format!("config invalid: {e}")))?;
    Ok(SchedulerEngine::new(cfg, rooms, billing))
}
