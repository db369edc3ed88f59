//! API-facing request/response models and thin handlers over the engine.

use serde::{Deserialize, Serialize};

use crate::core::{
    AdjustSettings, AdmitOutcome, BillingSink, FanSpeed, Mode, RoomId, RoomProvider, RoomState,
    SchedulerEngine, SchedulerError, UnitId,
};

/// Service request submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSubmission {
    /// Room requesting service.
    pub room_id: RoomId,
    /// Requested mode.
    pub mode: Mode,
    /// Requested fan speed.
    pub fan_speed: FanSpeed,
    /// Requested target temperature. Defaults per mode when omitted.
    pub target_temp: Option<f64>,
}

/// Outcome of a service submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Room the response refers to.
    pub room_id: RoomId,
    /// Unit assigned immediately, if any.
    pub assigned_unit: Option<UnitId>,
    /// Whether the request was parked in the waiting queue.
    pub queued: bool,
}

/// Current placement of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStatusResponse {
    /// Room the response refers to.
    pub room_id: RoomId,
    /// Placement state.
    pub state: RoomState,
    /// Current temperature, when the room is known.
    pub current_temp: Option<f64>,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Current scheduler time, in simulated minutes.
    pub now_min: u64,
}

/// Submit a service request on behalf of a room.
pub fn submit_request<R, B>(
    engine: &SchedulerEngine<R, B>,
    req: &ServiceSubmission,
) -> Result<SubmissionResponse, SchedulerError>
where
    R: RoomProvider,
    B: BillingSink,
{
    let target = req
        .target_temp
        .unwrap_or_else(|| req.mode.default_target());
    let outcome = engine.admit(req.room_id, req.mode, req.fan_speed, target)?;
    Ok(match outcome {
        AdmitOutcome::Assigned(unit_id) => SubmissionResponse {
            room_id: req.room_id,
            assigned_unit: Some(unit_id),
            queued: false,
        },
        AdmitOutcome::Queued => SubmissionResponse {
            room_id: req.room_id,
            assigned_unit: None,
            queued: true,
        },
    })
}

/// Adjust the settings of a room's active request. Returns whether any
/// field actually changed.
pub fn adjust_request<R, B>(
    engine: &SchedulerEngine<R, B>,
    room_id: RoomId,
    settings: AdjustSettings,
) -> bool
where
    R: RoomProvider,
    B: BillingSink,
{
    engine.adjust(room_id, settings)
}

/// Cancel a room's active request, if any.
pub fn cancel_request<R, B>(engine: &SchedulerEngine<R, B>, room_id: RoomId) -> bool
where
    R: RoomProvider,
    B: BillingSink,
{
    engine.cancel(room_id)
}

/// Report a room's placement and temperature.
pub fn room_status<R, B>(engine: &SchedulerEngine<R, B>, room_id: RoomId) -> RoomStatusResponse
where
    R: RoomProvider,
    B: BillingSink,
{
    RoomStatusResponse {
        room_id,
        state: engine.room_state(room_id),
        current_temp: engine.rooms().get_room(room_id).map(|r| r.current_temp),
    }
}

/// Report scheduler health.
pub fn health<R, B>(engine: &SchedulerEngine<R, B>) -> Health
where
    R: RoomProvider,
    B: BillingSink,
{
    Health {
        ok: true,
        now_min: engine.now_min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::build_engine;
    use crate::config::EngineConfig;
    use crate::core::InMemoryBillingSink;
    use crate::infra::rooms::InMemoryRoomStore;

    fn engine() -> SchedulerEngine<InMemoryRoomStore, InMemoryBillingSink> {
        let rooms = InMemoryRoomStore::new();
        rooms.insert_room(101, 30.0);
        build_engine(EngineConfig::default(), rooms, InMemoryBillingSink::new())
            .unwrap()
    }

    #[test]
    fn submit_assigns_when_capacity_free() {
        let eng = engine();
        let resp = submit_request(
            &eng,
            &ServiceSubmission {
                room_id: 101,
                mode: Mode::Cooling,
                fan_speed: FanSpeed::High,
                target_temp: None,
            },
        )
        .unwrap();
        assert!(!resp.queued);
        assert!(resp.assigned_unit.is_some());
        assert!(matches!(room_status(&eng, 101).state, RoomState::Serving(_)));
    }

    #[test]
    fn submit_unknown_room_is_not_found() {
        let eng = engine();
        let err = submit_request(
            &eng,
            &ServiceSubmission {
                room_id: 999,
                mode: Mode::Cooling,
                fan_speed: FanSpeed::Low,
                target_temp: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::NotFound(_)));
    }
}
