//! Scheduler engine: admission, preemption, time-slice fairness, and the
//! periodic simulation tick.
//!
//! All mutable scheduling state (request store, unit pool, queues, recovery
//! membership, simulated clock) lives in one owned struct behind a single
//! `parking_lot::Mutex`. Every transition acquires the lock for its whole
//! read-decide-write sequence, so external calls and the tick can never
//! observe a room in two states at once. External cancellations therefore
//! always win over in-flight tick decisions: each queued transition rechecks
//! the room's active request immediately before applying itself.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::billing::{BillingSink, UsageRecord};
use crate::core::error::SchedulerError;
use crate::core::queues::QueueManager;
use crate::core::requests::{AdjustSettings, RequestStore, ServiceRequest};
use crate::core::rooms::RoomProvider;
use crate::core::simulator::{self, RecoveryTracker, TEMP_EPSILON};
use crate::core::types::{FanSpeed, Mode, Priority, RoomId, UnitId};
use crate::core::units::{BindParams, Unit, UnitPool};

/// Result of an admission call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// A unit was bound immediately (direct or preemptive admission).
    Assigned(UnitId),
    /// The room entered the waiting set.
    Queued,
}

/// Scheduling state of a room. The three states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    /// No active request.
    Idle,
    /// Active request, waiting for a unit.
    Waiting,
    /// Being served by the given unit.
    Serving(UnitId),
}

/// Mutable scheduler state, guarded as a single unit.
struct EngineState {
    requests: RequestStore,
    units: UnitPool,
    queues: QueueManager,
    recovery: RecoveryTracker,
    /// Simulated clock in minutes; one tick advances it by one.
    now_min: u64,
}

/// The scheduler engine. Owns all scheduling state; collaborators (room
/// provider, billing sink) are injected at construction.
pub struct SchedulerEngine<R, B> {
    cfg: EngineConfig,
    rooms: R,
    billing: Mutex<B>,
    state: Mutex<EngineState>,
}

impl<R, B> SchedulerEngine<R, B>
where
    R: RoomProvider,
    B: BillingSink,
{
    /// Create an engine with an empty schedule and a pool of
    /// `cfg.unit_count` free units.
    pub fn new(cfg: EngineConfig, rooms: R, billing: B) -> Self {
        let units = UnitPool::new(cfg.unit_count);
        Self {
            cfg,
            rooms,
            billing: Mutex::new(billing),
            state: Mutex::new(EngineState {
                requests: RequestStore::new(),
                units,
                queues: QueueManager::new(),
                recovery: RecoveryTracker::new(),
                now_min: 0,
            }),
        }
    }

    /// Access the injected room provider.
    pub const fn rooms(&self) -> &R {
        &self.rooms
    }

    /// Access the engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Current simulated minute.
    pub fn now_min(&self) -> u64 {
        self.state.lock().now_min
    }

    /// Admit a new (or replacement) service request for a room.
    ///
    /// A replacement request for a room already waiting or serving first
    /// detaches the old placement (cutting a usage record if it was being
    /// served), then runs normal admission. When the service set is full,
    /// a strictly higher priority than the most evictable served room
    /// preempts it; otherwise the room queues.
    ///
    /// # Errors
    ///
    /// `NotFound` when the room does not exist; no state is created.
    pub fn admit(
        &self,
        room_id: RoomId,
        mode: Mode,
        fan_speed: FanSpeed,
        target_temp: f64,
    ) -> Result<AdmitOutcome, SchedulerError> {
        if self.rooms.get_room(room_id).is_none() {
            tracing::warn!(room = room_id, "admit rejected: unknown room");
            return Err(SchedulerError::NotFound(format!("room {room_id}")));
        }
        let mut st = self.state.lock();
        let now_min = st.now_min;

        // Replacement: drop the room's existing placement before re-admitting.
        if st.queues.in_service(room_id) {
            if let Some(unit_id) = st.units.get_by_room(room_id).map(|u| u.unit_id) {
                self.cut_usage_record(&mut st, room_id, unit_id);
                if let Err(e) = st.units.release(unit_id, now_min) {
                    tracing::error!(room = room_id, unit = unit_id, error = %e, "release failed");
                }
            }
            st.queues.remove_service(room_id);
        } else {
            st.queues.remove_waiting(room_id);
        }

        let request = st
            .requests
            .create_or_replace(room_id, mode, fan_speed, target_temp, now_min)
            .clone();
        tracing::info!(
            room = room_id,
            ?mode,
            ?fan_speed,
            target = request.target_temp,
            priority = request.priority,
            "service requested"
        );

        if st.queues.service_len() < self.cfg.unit_count as usize {
            return Ok(match self.assign_to_service(&mut st, room_id) {
                Some(unit_id) => AdmitOutcome::Assigned(unit_id),
                None => AdmitOutcome::Queued,
            });
        }

        // Pool saturated: preempt only on strictly greater priority. Equal
        // priority queues and is resolved later by the time-slice rule.
        match st.queues.peek_most_evictable_service() {
            Some(head) if request.priority > head.priority => {
                self.evict_to_waiting(&mut st, head.room_id);
                Ok(match self.assign_to_service(&mut st, room_id) {
                    Some(unit_id) => AdmitOutcome::Assigned(unit_id),
                    None => AdmitOutcome::Queued,
                })
            }
            _ => {
                self.park_waiting(&mut st, room_id, request.priority);
                Ok(AdmitOutcome::Queued)
            }
        }
    }

    /// Cancel a room's service or waiting request.
    ///
    /// Returns `false` (and changes nothing) when the room has neither an
    /// active request nor a bound unit. A released unit is immediately
    /// offered to the waiting set.
    pub fn cancel(&self, room_id: RoomId) -> bool {
        let mut st = self.state.lock();
        let now_min = st.now_min;
        let serving_unit = st.units.get_by_room(room_id).map(|u| u.unit_id);
        let has_request = st.requests.get_active(room_id).is_some();
        if serving_unit.is_none() && !has_request {
            tracing::warn!(room = room_id, "cancel rejected: nothing to cancel");
            return false;
        }

        if let Some(unit_id) = serving_unit {
            self.cut_usage_record(&mut st, room_id, unit_id);
            if let Err(e) = st.units.release(unit_id, now_min) {
                tracing::error!(room = room_id, unit = unit_id, error = %e, "release failed");
            }
            st.queues.remove_service(room_id);
            tracing::info!(room = room_id, unit = unit_id, "service cancelled");
        } else {
            st.queues.remove_waiting(room_id);
            tracing::info!(room = room_id, "waiting request cancelled");
        }
        st.requests.deactivate(room_id);
        self.start_recovery(&mut st, room_id);
        self.fill_waiting(&mut st);
        true
    }

    /// Apply a partial settings update to a room's active request.
    ///
    /// A fan-speed change re-keys the room's queue entry and runs the
    /// immediate preemption checks: an upgraded waiter may preempt the most
    /// evictable served room at once, and a downgraded served room may be
    /// evicted by a higher-priority or time-slice-eligible waiter at once.
    /// Returns `false` when no active request exists, no field was supplied,
    /// or nothing changed.
    pub fn adjust(&self, room_id: RoomId, settings: AdjustSettings) -> bool {
        let mut st = self.state.lock();
        let Some(old_priority) = st.requests.get_active(room_id).map(|r| r.priority) else {
            tracing::warn!(room = room_id, "adjust rejected: no active request");
            return false;
        };
        if !st.requests.adjust(room_id, settings) {
            return false;
        }
        let Some(request) = st.requests.get_active(room_id).cloned() else {
            return false;
        };
        tracing::info!(
            room = room_id,
            ?settings,
            priority = request.priority,
            "settings adjusted"
        );

        if let Some(unit_id) = st.units.get_by_room(room_id).map(|u| u.unit_id) {
            st.units
                .update_settings(unit_id, request.mode, request.fan_speed, request.target_temp);
        }

        if request.priority != old_priority {
            st.queues.update_priority(room_id, request.priority);
            if request.priority > old_priority {
                self.priority_increase_check(&mut st, room_id, request.priority);
            } else if st.queues.in_service(room_id) {
                self.priority_decrease_check(&mut st, room_id, request.priority);
            }
        }
        true
    }

    /// Advance the simulation by one minute.
    ///
    /// Phases run in a fixed order under one lock: elapsed-time counters,
    /// the time-slice fairness check (at most one swap), waiting-queue fill,
    /// served-room temperature steps (a target-reached release backfills its
    /// unit synchronously), then recovery drift for unserved rooms. A
    /// failure stepping one room is logged and isolated to that room.
    pub fn tick(&self) {
        let mut st = self.state.lock();
        st.now_min += 1;
        st.queues.tick_elapsed();

        self.time_slice_check(&mut st);
        self.fill_waiting(&mut st);

        for room_id in st.queues.service_rooms() {
            if let Err(e) = self.step_served_room(&mut st, room_id) {
                tracing::error!(room = room_id, error = %e, "temperature step failed");
            }
        }
        for room_id in st.recovery.rooms() {
            self.step_recovery_room(&mut st, room_id);
        }
    }

    /// Rebuild the waiting and service sets from active requests and current
    /// unit bindings, then fill free units from the waiting set. Used to
    /// recover queue membership after a restart.
    pub fn resync(&self) {
        let mut st = self.state.lock();
        st.queues.clear();
        let active: Vec<ServiceRequest> =
            st.requests.active_requests().into_iter().cloned().collect();
        for request in active {
            let bound = request
                .assigned_unit
                .and_then(|unit_id| st.units.get(unit_id))
                .is_some_and(|unit| unit.serving_room == Some(request.room_id));
            if bound {
                st.queues.enqueue_service(request.room_id, request.priority);
            } else {
                if let Some(stale) = st.requests.get_active_mut(request.room_id) {
                    stale.assigned_unit = None;
                }
                self.park_waiting(&mut st, request.room_id, request.priority);
            }
        }
        let (waiting, serving) = (st.queues.waiting_len(), st.queues.service_len());
        tracing::info!(waiting, serving, "queues resynced from active requests");
        self.fill_waiting(&mut st);
    }

    /// Waiting room ids, ascending.
    pub fn list_waiting(&self) -> Vec<RoomId> {
        self.state.lock().queues.waiting_rooms()
    }

    /// Served room ids, ascending.
    pub fn list_serving(&self) -> Vec<RoomId> {
        self.state.lock().queues.service_rooms()
    }

    /// Scheduling state of a room.
    pub fn room_state(&self, room_id: RoomId) -> RoomState {
        let st = self.state.lock();
        if let Some(unit) = st.units.get_by_room(room_id) {
            return RoomState::Serving(unit.unit_id);
        }
        if st.queues.in_waiting(room_id) {
            return RoomState::Waiting;
        }
        RoomState::Idle
    }

    /// Minutes the room has spent in the waiting set, if waiting.
    pub fn waiting_minutes(&self, room_id: RoomId) -> Option<u64> {
        self.state
            .lock()
            .queues
            .waiting_entry(room_id)
            .map(|e| e.elapsed_min)
    }

    /// Minutes the room has spent in the service set, if serving.
    pub fn service_minutes(&self, room_id: RoomId) -> Option<u64> {
        self.state
            .lock()
            .queues
            .service_entry(room_id)
            .map(|e| e.elapsed_min)
    }

    /// Snapshot of every unit, ascending by id.
    pub fn unit_snapshot(&self) -> Vec<Unit> {
        self.state.lock().units.snapshot()
    }

    /// The room's active request, if any.
    pub fn active_request(&self, room_id: RoomId) -> Option<ServiceRequest> {
        self.state.lock().requests.get_active(room_id).cloned()
    }

    // ------------------------------------------------------------------
    // Transitions. All take the state lock's guard; callers hold it for
    // the whole transition.
    // ------------------------------------------------------------------

    /// Bind a free unit to the room and move it into the service set.
    /// Falls back to the waiting set when no unit can be bound.
    fn assign_to_service(&self, st: &mut EngineState, room_id: RoomId) -> Option<UnitId> {
        let request = st.requests.get_active(room_id)?.clone();

        let Some(unit_id) = st.units.list_free().first().copied() else {
            // No unit to bind. An existing waiting entry is left untouched so
            // the room's accrued wait time survives.
            if !st.queues.in_waiting(room_id) {
                self.park_waiting(st, room_id, request.priority);
            }
            return None;
        };
        st.queues.remove_waiting(room_id);
        let Some(reading) = self.rooms.get_room(room_id) else {
            tracing::warn!(room = room_id, "room vanished, dropping request");
            st.requests.deactivate(room_id);
            return None;
        };
        let params = BindParams {
            room_id,
            mode: request.mode,
            fan_speed: request.fan_speed,
            target_temp: request.target_temp,
            current_temp: reading.current_temp,
            request_time_min: request.request_time_min,
            now_min: st.now_min,
        };
        match st.units.bind(unit_id, params) {
            Ok(()) => {
                if let Some(r) = st.requests.get_active_mut(room_id) {
                    r.assigned_unit = Some(unit_id);
                }
                st.queues.enqueue_service(room_id, request.priority);
                st.recovery.cancel(room_id);
                tracing::info!(room = room_id, unit = unit_id, "service started");
                Some(unit_id)
            }
            Err(e) => {
                tracing::error!(room = room_id, unit = unit_id, error = %e, "bind failed");
                self.park_waiting(st, room_id, request.priority);
                None
            }
        }
    }

    /// Demote a served room to the waiting set, releasing its unit. The
    /// request stays active; no usage record is cut on preemption.
    fn evict_to_waiting(&self, st: &mut EngineState, room_id: RoomId) {
        let priority = st
            .queues
            .service_entry(room_id)
            .map(|e| e.priority)
            .or_else(|| st.requests.get_active(room_id).map(|r| r.priority));
        st.queues.remove_service(room_id);
        if let Some(unit_id) = st.units.get_by_room(room_id).map(|u| u.unit_id) {
            if let Err(e) = st.units.release(unit_id, st.now_min) {
                tracing::error!(room = room_id, unit = unit_id, error = %e, "release failed");
            }
        }
        if let Some(request) = st.requests.get_active_mut(room_id) {
            request.assigned_unit = None;
        }
        if let Some(priority) = priority {
            self.park_waiting(st, room_id, priority);
            tracing::info!(room = room_id, "preempted, moved to waiting");
        }
    }

    /// Insert a room into the waiting set and start recovery drift.
    fn park_waiting(&self, st: &mut EngineState, room_id: RoomId, priority: Priority) {
        st.queues.enqueue_waiting(room_id, priority);
        self.start_recovery(st, room_id);
        tracing::debug!(room = room_id, priority, "queued");
    }

    /// Release a served room with a usage record, deactivate its request,
    /// and backfill the freed unit from the waiting set synchronously.
    fn release_served(&self, st: &mut EngineState, room_id: RoomId) {
        if let Some(unit_id) = st.units.get_by_room(room_id).map(|u| u.unit_id) {
            self.cut_usage_record(st, room_id, unit_id);
            if let Err(e) = st.units.release(unit_id, st.now_min) {
                tracing::error!(room = room_id, unit = unit_id, error = %e, "release failed");
            }
        }
        st.queues.remove_service(room_id);
        st.requests.deactivate(room_id);
        self.start_recovery(st, room_id);
        self.fill_waiting(st);
    }

    /// Pop the highest-ordered waiting rooms into free units until either
    /// runs out.
    fn fill_waiting(&self, st: &mut EngineState) {
        loop {
            if st.units.list_free().is_empty() {
                break;
            }
            let Some(head) = st.queues.peek_most_eligible_waiting() else {
                break;
            };
            // Recheck before committing: the entry may be stale relative to
            // a cancellation or an already-bound request.
            let eligible = st
                .requests
                .get_active(head.room_id)
                .is_some_and(|r| r.assigned_unit.is_none());
            if !eligible {
                st.queues.remove_waiting(head.room_id);
                continue;
            }
            if self.assign_to_service(st, head.room_id).is_none() {
                break;
            }
        }
    }

    /// Time-slice fairness: the longest-waiting room that has waited at
    /// least the configured slice may swap with the longest-serving room of
    /// the same priority. At most one swap per tick.
    fn time_slice_check(&self, st: &mut EngineState) {
        let eligible: Vec<_> = st
            .queues
            .waiting_by_elapsed()
            .into_iter()
            .filter(|e| e.elapsed_min >= self.cfg.time_slice_ticks)
            .collect();
        for waiter in eligible {
            if st.requests.get_active(waiter.room_id).is_none() {
                st.queues.remove_waiting(waiter.room_id);
                continue;
            }
            let victim = st
                .queues
                .service_by_evictability()
                .into_iter()
                .find(|s| s.priority == waiter.priority);
            if let Some(victim) = victim {
                tracing::info!(
                    incoming = waiter.room_id,
                    outgoing = victim.room_id,
                    priority = waiter.priority,
                    waited = waiter.elapsed_min,
                    "time-slice swap"
                );
                self.evict_to_waiting(st, victim.room_id);
                self.assign_to_service(st, waiter.room_id);
                return;
            }
        }
    }

    /// Upgraded waiter: preempt the most evictable served room immediately
    /// when the new priority is strictly greater.
    fn priority_increase_check(&self, st: &mut EngineState, room_id: RoomId, new_priority: Priority) {
        if !st.queues.in_waiting(room_id) {
            return;
        }
        if let Some(head) = st.queues.peek_most_evictable_service() {
            if new_priority > head.priority {
                tracing::info!(
                    incoming = room_id,
                    outgoing = head.room_id,
                    "priority increase preemption"
                );
                self.evict_to_waiting(st, head.room_id);
                self.assign_to_service(st, room_id);
            }
        }
    }

    /// Downgraded served room. Two rules, in strict precedence: a waiter
    /// that now strictly outranks it evicts it at once, with the freed unit
    /// going to the waiting-order head; failing that, an equal-priority
    /// waiter with time-slice eligibility swaps in, longest wait first.
    fn priority_decrease_check(&self, st: &mut EngineState, room_id: RoomId, new_priority: Priority) {
        let outranked = st
            .queues
            .waiting_by_elapsed()
            .into_iter()
            .any(|w| w.priority > new_priority && st.requests.get_active(w.room_id).is_some());
        if outranked {
            tracing::info!(outgoing = room_id, "priority decrease preemption");
            self.evict_to_waiting(st, room_id);
            self.fill_waiting(st);
            return;
        }
        for waiter in st.queues.waiting_by_elapsed() {
            if st.requests.get_active(waiter.room_id).is_none() {
                continue;
            }
            if waiter.priority == new_priority && waiter.elapsed_min >= self.cfg.time_slice_ticks {
                tracing::info!(
                    incoming = waiter.room_id,
                    outgoing = room_id,
                    "priority decrease preemption"
                );
                self.evict_to_waiting(st, room_id);
                self.assign_to_service(st, waiter.room_id);
                return;
            }
        }
    }

    /// Step one served room's temperature, persisting the result and firing
    /// the target-reached release when it lands on target.
    fn step_served_room(
        &self,
        st: &mut EngineState,
        room_id: RoomId,
    ) -> Result<(), SchedulerError> {
        if !st.queues.in_service(room_id) {
            return Ok(());
        }
        let Some(request) = st.requests.get_active(room_id) else {
            return Err(SchedulerError::InvalidState(format!(
                "room {room_id} served without an active request"
            )));
        };
        let (mode, fan_speed, target) =
            (request.mode, request.fan_speed, request.target_temp);
        let unit_id = request.assigned_unit.ok_or_else(|| {
            SchedulerError::InvalidState(format!("room {room_id} served without a unit"))
        })?;
        let reading = self
            .rooms
            .get_room(room_id)
            .ok_or_else(|| SchedulerError::NotFound(format!("room {room_id}")))?;

        let out = simulator::step_served(mode, fan_speed, reading.current_temp, target);
        self.rooms.set_current_temp(room_id, out.new_temp);
        st.units.set_current_temp(unit_id, out.new_temp);
        tracing::debug!(room = room_id, temp = out.new_temp, "served step");

        if out.reached {
            tracing::info!(room = room_id, temp = out.new_temp, "target reached, releasing");
            self.release_served(st, room_id);
        }
        Ok(())
    }

    /// Step one recovering room's drift toward baseline, dropping it from
    /// the recovery set when it arrives or no longer qualifies.
    fn step_recovery_room(&self, st: &mut EngineState, room_id: RoomId) {
        if st.units.get_by_room(room_id).is_some() {
            st.recovery.cancel(room_id);
            return;
        }
        let Some(reading) = self.rooms.get_room(room_id) else {
            st.recovery.cancel(room_id);
            return;
        };
        if (reading.current_temp - reading.baseline_temp).abs() < TEMP_EPSILON {
            st.recovery.cancel(room_id);
            return;
        }
        let out = simulator::step_recovery(
            reading.current_temp,
            reading.baseline_temp,
            self.cfg.recovery_rate,
        );
        self.rooms.set_current_temp(room_id, out.new_temp);
        tracing::debug!(room = room_id, temp = out.new_temp, "recovery step");
        if out.reached {
            st.recovery.cancel(room_id);
        }
    }

    /// Start recovery drift for an unserved, off-baseline room. Idempotent;
    /// served or at-baseline rooms are never scheduled.
    fn start_recovery(&self, st: &mut EngineState, room_id: RoomId) {
        if st.units.get_by_room(room_id).is_some() {
            return;
        }
        let Some(reading) = self.rooms.get_room(room_id) else {
            return;
        };
        if (reading.current_temp - reading.baseline_temp).abs() < TEMP_EPSILON {
            return;
        }
        st.recovery.start(room_id);
    }

    /// Build, price, and emit a usage record for the room's current service
    /// span. Called before the unit is released.
    fn cut_usage_record(&self, st: &mut EngineState, room_id: RoomId, unit_id: UnitId) {
        let Some(unit) = st.units.get(unit_id) else {
            return;
        };
        let (Some(mode), Some(fan_speed)) = (unit.mode, unit.fan_speed) else {
            return;
        };
        let mut record = UsageRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            room_id,
            unit_id,
            request_time_min: unit.request_time_min,
            service_start_min: unit.service_start_min,
            service_end_min: st.now_min,
            duration_min: st.now_min.saturating_sub(unit.service_start_min),
            fan_speed,
            mode,
            target_temp: unit.target_temp,
            temp_delta: (unit.target_temp - unit.current_temp).abs(),
            energy: 0.0,
            cost: 0.0,
            rate: self.cfg.energy_rate,
            recorded_at_ms: crate::util::clock::now_ms(),
        };
        record.price();
        tracing::info!(
            room = room_id,
            unit = unit_id,
            minutes = record.duration_min,
            cost = record.cost,
            "usage recorded"
        );
        self.billing.lock().record_usage(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::billing::NullBillingSink;
    use crate::infra::rooms::memory::InMemoryRoomStore;

    #[test]
    fn assignment_without_free_units_keeps_accrued_wait() {
        let rooms = InMemoryRoomStore::new();
        rooms.insert_room(1, 30.0);
        rooms.insert_room(2, 30.0);
        let cfg = EngineConfig {
            unit_count: 1,
            ..EngineConfig::default()
        };
        let engine = SchedulerEngine::new(cfg, rooms, NullBillingSink);
        engine.admit(1, Mode::Cooling, FanSpeed::High, 18.0).unwrap();
        engine.admit(2, Mode::Cooling, FanSpeed::Medium, 18.0).unwrap();
        engine.tick();
        engine.tick();
        assert_eq!(engine.waiting_minutes(2), Some(2));

        // Binding with a saturated pool must not reset the waiter's clock.
        let mut st = engine.state.lock();
        assert!(engine.assign_to_service(&mut st, 2).is_none());
        assert_eq!(st.queues.waiting_entry(2).unwrap().elapsed_min, 2);
    }
}
