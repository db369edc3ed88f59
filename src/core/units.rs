//! Fixed pool of interchangeable climate-control units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::SchedulerError;
use crate::core::types::{FanSpeed, Mode, RoomId, UnitId};

/// One climate-control unit. Serves at most one room at a time;
/// `serving_room` is `Some` exactly while the unit is busy.
///
/// Mode, fan speed, and temperature fields survive `release` so billing can
/// read them back before the next binding overwrites them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Unit identifier, `1..=K`.
    pub unit_id: UnitId,
    /// Room currently served, if any.
    pub serving_room: Option<RoomId>,
    /// Mode of the current or most recent service.
    pub mode: Option<Mode>,
    /// Fan speed of the current or most recent service.
    pub fan_speed: Option<FanSpeed>,
    /// Target temperature of the current or most recent service.
    pub target_temp: f64,
    /// Room temperature as last stepped by the simulator.
    pub current_temp: f64,
    /// Simulated minute of the serviced request's creation.
    pub request_time_min: u64,
    /// Simulated minute the current or most recent service started.
    pub service_start_min: u64,
    /// Simulated minute the most recent service ended, if released.
    pub service_end_min: Option<u64>,
}

/// Parameters for binding a unit to a room.
#[derive(Debug, Clone, Copy)]
pub struct BindParams {
    /// Room to serve.
    pub room_id: RoomId,
    /// Operating mode from the room's request.
    pub mode: Mode,
    /// Fan speed from the room's request.
    pub fan_speed: FanSpeed,
    /// Target temperature from the room's request.
    pub target_temp: f64,
    /// Room temperature at binding time.
    pub current_temp: f64,
    /// Simulated minute of the request's creation.
    pub request_time_min: u64,
    /// Simulated minute the service starts (now).
    pub now_min: u64,
}

/// Pool of K units keyed by id.
#[derive(Debug)]
pub struct UnitPool {
    units: BTreeMap<UnitId, Unit>,
}

impl UnitPool {
    /// Create a pool of `count` free units numbered `1..=count`.
    #[must_use]
    pub fn new(count: u32) -> Self {
        let units = (1..=count)
            .map(|unit_id| {
                (
                    unit_id,
                    Unit {
                        unit_id,
                        serving_room: None,
                        mode: None,
                        fan_speed: None,
                        target_temp: 0.0,
                        current_temp: 0.0,
                        request_time_min: 0,
                        service_start_min: 0,
                        service_end_min: None,
                    },
                )
            })
            .collect();
        Self { units }
    }

    /// Ids of units not bound to any room, ascending.
    #[must_use]
    pub fn list_free(&self) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|u| u.serving_room.is_none())
            .map(|u| u.unit_id)
            .collect()
    }

    /// Bind a free unit to a room and stamp the service start.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown unit, `InvalidState` when the unit is busy
    /// or the room is already served by another unit.
    pub fn bind(&mut self, unit_id: UnitId, params: BindParams) -> Result<(), SchedulerError> {
        if self.get_by_room(params.room_id).is_some() {
            return Err(SchedulerError::InvalidState(format!(
                "room {} already has a bound unit",
                params.room_id
            )));
        }
        let unit = self
            .units
            .get_mut(&unit_id)
            .ok_or_else(|| SchedulerError::NotFound(format!("unit {unit_id}")))?;
        if unit.serving_room.is_some() {
            return Err(SchedulerError::InvalidState(format!(
                "unit {unit_id} is busy"
            )));
        }
        unit.serving_room = Some(params.room_id);
        unit.mode = Some(params.mode);
        unit.fan_speed = Some(params.fan_speed);
        unit.target_temp = params.target_temp;
        unit.current_temp = params.current_temp;
        unit.request_time_min = params.request_time_min;
        unit.service_start_min = params.now_min;
        unit.service_end_min = None;
        Ok(())
    }

    /// Release a unit from its room, stamping the service end. All other
    /// fields are left in place for billing read-back.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown unit.
    pub fn release(&mut self, unit_id: UnitId, now_min: u64) -> Result<(), SchedulerError> {
        let unit = self
            .units
            .get_mut(&unit_id)
            .ok_or_else(|| SchedulerError::NotFound(format!("unit {unit_id}")))?;
        unit.serving_room = None;
        unit.service_end_min = Some(now_min);
        Ok(())
    }

    /// The unit with the given id, if it exists.
    #[must_use]
    pub fn get(&self, unit_id: UnitId) -> Option<&Unit> {
        self.units.get(&unit_id)
    }

    /// The unit currently serving a room, if any.
    #[must_use]
    pub fn get_by_room(&self, room_id: RoomId) -> Option<&Unit> {
        self.units
            .values()
            .find(|u| u.serving_room == Some(room_id))
    }

    /// Push updated request settings onto a bound unit.
    pub fn update_settings(
        &mut self,
        unit_id: UnitId,
        mode: Mode,
        fan_speed: FanSpeed,
        target_temp: f64,
    ) {
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.mode = Some(mode);
            unit.fan_speed = Some(fan_speed);
            unit.target_temp = target_temp;
        }
    }

    /// Record the latest simulated room temperature on a bound unit.
    pub fn set_current_temp(&mut self, unit_id: UnitId, value: f64) {
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.current_temp = value;
        }
    }

    /// Snapshot of every unit, ascending by id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Unit> {
        self.units.values().cloned().collect()
    }
}
