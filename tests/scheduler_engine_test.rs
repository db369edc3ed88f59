//! Integration tests for the scheduler engine.
//!
//! These tests validate:
//! 1. Direct admission fills the unit pool in ascending unit order
//! 2. Preemption triggers only on strictly greater priority
//! 3. The most-evictable served room is chosen deterministically
//! 4. Time-slice fairness swaps equal-priority rooms after the slice
//! 5. Cancellation releases units, backfills, and is a safe no-op twice
//! 6. Temperature simulation reaches targets and cuts usage records
//! 7. Settings adjustment runs the immediate preemption checks
//! 8. Resync rebuilds the queues from active requests

use hvac_scheduler::builders::build_engine;
use hvac_scheduler::config::EngineConfig;
use hvac_scheduler::core::{
    AdjustSettings, AdmitOutcome, FanSpeed, InMemoryBillingSink, Mode, RoomProvider, RoomState,
    SchedulerEngine, SchedulerError,
};
use hvac_scheduler::infra::rooms::InMemoryRoomStore;

// ============================================================================
// Helpers
// ============================================================================

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

struct Harness {
    engine: SchedulerEngine<InMemoryRoomStore, InMemoryBillingSink>,
    billing: InMemoryBillingSink,
}

impl Harness {
    /// Engine over `room_count` rooms (ids 1..=room_count) all at 30.0
    /// degrees baseline, with the default three units.
    fn new(room_count: u32) -> Self {
        Self::with_config(room_count, EngineConfig::default())
    }

    fn with_config(room_count: u32, cfg: EngineConfig) -> Self {
        hvac_scheduler::util::telemetry::init_tracing();
        let rooms = InMemoryRoomStore::new();
        for room in 1..=room_count {
            rooms.insert_room(room, 30.0);
        }
        let billing = InMemoryBillingSink::new();
        let engine = build_engine(cfg, rooms, billing.clone()).unwrap();
        Self { engine, billing }
    }

    fn temp(&self, room: u32) -> f64 {
        self.engine.rooms().get_room(room).unwrap().current_temp
    }
}

// ============================================================================
// Admission
// ============================================================================

#[test]
fn test_direct_admission_fills_pool_in_unit_order() {
    let h = Harness::new(3);

    for (room, expected_unit) in [(1, 1), (2, 2), (3, 3)] {
        let outcome = h
            .engine
            .admit(room, Mode::Cooling, FanSpeed::Low, 20.0)
            .unwrap();
        assert_eq!(outcome, AdmitOutcome::Assigned(expected_unit));
        assert_eq!(h.engine.room_state(room), RoomState::Serving(expected_unit));
    }
    assert_eq!(h.engine.list_serving(), vec![1, 2, 3]);
    assert!(h.engine.list_waiting().is_empty());
}

#[test]
fn test_admit_unknown_room_is_not_found() {
    let h = Harness::new(1);
    let err = h
        .engine
        .admit(999, Mode::Cooling, FanSpeed::High, 25.0)
        .unwrap_err();
    assert!(matches!(err, SchedulerError::NotFound(_)));
    // Nothing was created for the unknown room.
    assert!(h.engine.active_request(999).is_none());
    assert_eq!(h.engine.room_state(999), RoomState::Idle);
}

#[test]
fn test_higher_priority_preempts_lowest_serving() {
    let h = Harness::new(4);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Low, 20.0)
            .unwrap();
    }

    // MEDIUM outranks the three LOW rooms; the most evictable (lowest
    // priority, tied elapsed broken by smallest room id) is room 1.
    let outcome = h
        .engine
        .admit(4, Mode::Cooling, FanSpeed::Medium, 20.0)
        .unwrap();
    assert_eq!(outcome, AdmitOutcome::Assigned(1));
    assert_eq!(h.engine.room_state(4), RoomState::Serving(1));
    assert_eq!(h.engine.room_state(1), RoomState::Waiting);
    assert_eq!(h.engine.list_waiting(), vec![1]);
    assert_eq!(h.engine.list_serving(), vec![2, 3, 4]);

    // Preemption cuts no usage record; the evicted request stays active.
    assert!(h.billing.records().is_empty());
    assert!(h.engine.active_request(1).is_some());
}

#[test]
fn test_equal_priority_queues_instead_of_preempting() {
    let h = Harness::new(4);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 20.0)
            .unwrap();
    }

    let outcome = h
        .engine
        .admit(4, Mode::Cooling, FanSpeed::Medium, 20.0)
        .unwrap();
    assert_eq!(outcome, AdmitOutcome::Queued);
    assert_eq!(h.engine.room_state(4), RoomState::Waiting);
    assert_eq!(h.engine.list_serving(), vec![1, 2, 3]);
}

#[test]
fn test_lower_priority_queues() {
    let h = Harness::new(4);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::High, 20.0)
            .unwrap();
    }

    let outcome = h
        .engine
        .admit(4, Mode::Cooling, FanSpeed::Low, 20.0)
        .unwrap();
    assert_eq!(outcome, AdmitOutcome::Queued);
    assert_eq!(h.engine.list_waiting(), vec![4]);
}

#[test]
fn test_eviction_order_is_deterministic() {
    let h = Harness::new(5);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 20.0).unwrap();
    h.engine.admit(2, Mode::Cooling, FanSpeed::Medium, 20.0).unwrap();
    h.engine.admit(3, Mode::Cooling, FanSpeed::Low, 20.0).unwrap();

    // MEDIUM arrival into a [3,2,1] pool evicts exactly the LOW room.
    let outcome = h
        .engine
        .admit(4, Mode::Cooling, FanSpeed::Medium, 20.0)
        .unwrap();
    assert!(matches!(outcome, AdmitOutcome::Assigned(_)));
    assert_eq!(h.engine.room_state(3), RoomState::Waiting);
    assert_eq!(h.engine.room_state(2), RoomState::Serving(2));

    // The pool is now [3,2,2]; a further MEDIUM arrival only ties and queues.
    let outcome = h
        .engine
        .admit(5, Mode::Cooling, FanSpeed::Medium, 20.0)
        .unwrap();
    assert_eq!(outcome, AdmitOutcome::Queued);
    assert_eq!(h.engine.list_waiting(), vec![3, 5]);
}

#[test]
fn test_replacement_request_rebinds_and_bills_prior_service() {
    let h = Harness::new(1);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 25.0).unwrap();
    h.engine.tick();
    h.engine.tick();
    assert!(approx(h.temp(1), 28.0));

    // Re-admitting the same room replaces the active request. The prior
    // service span is billed before the new one starts.
    let outcome = h
        .engine
        .admit(1, Mode::Heating, FanSpeed::Medium, 22.0)
        .unwrap();
    assert!(matches!(outcome, AdmitOutcome::Assigned(_)));

    let records = h.billing.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].room_id, 1);
    assert_eq!(records[0].service_start_min, 0);
    assert_eq!(records[0].service_end_min, 2);
    assert_eq!(records[0].duration_min, 2);
    // Two HIGH cooling ticks left the room at 28.0 against a 25.0 target.
    assert!(approx(records[0].temp_delta, 3.0));
    assert!(approx(records[0].energy, 3.0));
    assert!(approx(records[0].cost, 3.0));

    let request = h.engine.active_request(1).unwrap();
    assert_eq!(request.mode, Mode::Heating);
    assert_eq!(request.fan_speed, FanSpeed::Medium);
    assert_eq!(request.request_time_min, 2);
}

#[test]
fn test_target_temperature_clamps_to_mode_range() {
    let h = Harness::new(2);

    h.engine.admit(1, Mode::Cooling, FanSpeed::Low, 35.0).unwrap();
    assert!(approx(h.engine.active_request(1).unwrap().target_temp, 28.0));

    h.engine.admit(2, Mode::Heating, FanSpeed::Low, 10.0).unwrap();
    assert!(approx(h.engine.active_request(2).unwrap().target_temp, 18.0));
}

// ============================================================================
// Time-slice fairness
// ============================================================================

#[test]
fn test_time_slice_swaps_equal_priority_after_two_ticks() {
    let h = Harness::new(4);
    for room in 1..=4 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    assert_eq!(h.engine.list_waiting(), vec![4]);

    // One tick of waiting is below the slice; no swap yet.
    h.engine.tick();
    assert_eq!(h.engine.waiting_minutes(4), Some(1));
    assert_eq!(h.engine.service_minutes(1), Some(1));
    assert_eq!(h.engine.list_serving(), vec![1, 2, 3]);

    // Second tick reaches the slice. The longest-serving equal-priority
    // room (tie broken by smallest id) is evicted.
    h.engine.tick();
    assert_eq!(h.engine.list_serving(), vec![2, 3, 4]);
    assert_eq!(h.engine.list_waiting(), vec![1]);
    assert_eq!(h.engine.room_state(1), RoomState::Waiting);
}

#[test]
fn test_time_slice_swaps_at_most_once_per_tick() {
    let h = Harness::new(5);
    for room in 1..=5 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    assert_eq!(h.engine.list_waiting(), vec![4, 5]);

    h.engine.tick();
    h.engine.tick();

    // Both waiters are slice-eligible but only one swap happens: room 4
    // (smaller id among equal waits) replaces room 1.
    assert_eq!(h.engine.list_serving(), vec![2, 3, 4]);
    assert_eq!(h.engine.list_waiting(), vec![1, 5]);
}

#[test]
fn test_time_slice_ignores_different_priorities() {
    let h = Harness::new(4);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::High, 18.0)
            .unwrap();
    }
    h.engine.admit(4, Mode::Cooling, FanSpeed::Low, 18.0).unwrap();

    for _ in 0..5 {
        h.engine.tick();
    }
    // A LOW waiter never displaces HIGH service, no matter how long it waits.
    assert_eq!(h.engine.list_serving(), vec![1, 2, 3]);
    assert_eq!(h.engine.list_waiting(), vec![4]);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_cancel_releases_unit_and_backfills_from_waiting() {
    let h = Harness::new(4);
    for room in 1..=4 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    assert_eq!(h.engine.list_waiting(), vec![4]);

    assert!(h.engine.cancel(1));
    // The freed unit is immediately offered to the waiting head.
    assert_eq!(h.engine.list_serving(), vec![2, 3, 4]);
    assert!(h.engine.list_waiting().is_empty());
    assert_eq!(h.engine.room_state(1), RoomState::Idle);
    assert!(h.engine.active_request(1).is_none());
    assert_eq!(h.billing.records().len(), 1);
}

#[test]
fn test_cancel_is_idempotent() {
    let h = Harness::new(1);
    h.engine.admit(1, Mode::Cooling, FanSpeed::Low, 20.0).unwrap();

    assert!(h.engine.cancel(1));
    assert!(!h.engine.cancel(1));
    assert!(!h.engine.cancel(999));
    // The double cancel billed exactly once.
    assert_eq!(h.billing.records().len(), 1);
}

#[test]
fn test_cancel_while_waiting_involves_no_unit() {
    let h = Harness::new(4);
    for room in 1..=4 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }

    assert!(h.engine.cancel(4));
    assert_eq!(h.engine.room_state(4), RoomState::Idle);
    assert_eq!(h.engine.list_serving(), vec![1, 2, 3]);
    // No unit was held, so nothing is billed.
    assert!(h.billing.records().is_empty());
}

// ============================================================================
// Temperature simulation
// ============================================================================

#[test]
fn test_cooling_reaches_target_and_releases() {
    let h = Harness::new(1);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 25.0).unwrap();

    // HIGH cools one degree per tick from the 30.0 baseline.
    h.engine.tick();
    assert!(approx(h.temp(1), 29.0));
    for _ in 0..3 {
        h.engine.tick();
    }
    assert!(approx(h.temp(1), 26.0));
    assert!(matches!(h.engine.room_state(1), RoomState::Serving(_)));

    // Fifth tick lands on target: the unit releases and recovery drift
    // begins in the same tick.
    h.engine.tick();
    assert_eq!(h.engine.room_state(1), RoomState::Idle);
    assert!(h.engine.active_request(1).is_none());
    assert!(approx(h.temp(1), 25.5));

    let records = h.billing.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].duration_min, 5);
    assert_eq!(records[0].service_end_min, 5);
    assert_eq!(records[0].fan_speed, FanSpeed::High);
    // The room was exactly on target at release.
    assert!(approx(records[0].temp_delta, 0.0));
    assert!(approx(records[0].cost, 0.0));

    // The freed unit is available again.
    let units = h.engine.unit_snapshot();
    assert!(units.iter().all(|u| u.serving_room.is_none()));
}

#[test]
fn test_fan_speed_sets_cooling_rate() {
    let h = Harness::new(2);
    h.engine.admit(1, Mode::Cooling, FanSpeed::Medium, 18.0).unwrap();
    h.engine.admit(2, Mode::Cooling, FanSpeed::Low, 18.0).unwrap();

    for _ in 0..6 {
        h.engine.tick();
    }
    // MEDIUM moves half a degree per tick, LOW a third.
    assert!(approx(h.temp(1), 27.0));
    assert!(approx(h.temp(2), 28.0));
}

#[test]
fn test_heating_moves_up_towards_target() {
    let h = Harness::new(1);
    let rooms = h.engine.rooms();
    rooms.insert_room_at(1, 18.0, 18.0);

    h.engine.admit(1, Mode::Heating, FanSpeed::Medium, 22.0).unwrap();
    h.engine.tick();
    h.engine.tick();
    assert!(approx(h.temp(1), 19.0));
    assert!(matches!(h.engine.room_state(1), RoomState::Serving(_)));

    for _ in 0..6 {
        h.engine.tick();
    }
    // Eighth tick lands on 22.0 and releases; drift pulls back toward the
    // 18.0 baseline in the same tick.
    assert_eq!(h.engine.room_state(1), RoomState::Idle);
    assert!(approx(h.temp(1), 21.5));
}

#[test]
fn test_recovery_drifts_back_to_baseline_and_stops() {
    let h = Harness::new(1);
    h.engine.rooms().insert_room_at(1, 25.0, 25.0);

    // Serve briefly, then cancel with the room off baseline.
    h.engine.admit(1, Mode::Cooling, FanSpeed::Low, 18.0).unwrap();
    h.engine.tick();
    h.engine.tick();
    assert!(h.engine.cancel(1));
    let start = h.temp(1);
    assert!(start < 25.0);

    // Drift returns half a degree per tick until baseline.
    h.engine.tick();
    assert!(approx(h.temp(1), (start + 0.5).min(25.0)));
    for _ in 0..10 {
        h.engine.tick();
    }
    assert!(approx(h.temp(1), 25.0));

    // At baseline the drift stops; further ticks change nothing.
    h.engine.tick();
    assert!(approx(h.temp(1), 25.0));
}

#[test]
fn test_waiting_room_drifts_while_queued() {
    let h = Harness::new(4);
    h.engine.rooms().insert_room_at(4, 26.0, 30.0);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::High, 18.0)
            .unwrap();
    }
    h.engine.admit(4, Mode::Cooling, FanSpeed::Low, 18.0).unwrap();
    assert_eq!(h.engine.room_state(4), RoomState::Waiting);

    h.engine.tick();
    h.engine.tick();
    // Queued rooms consume no service and drift toward their baseline.
    assert!(approx(h.temp(4), 29.0));
}

// ============================================================================
// Settings adjustment
// ============================================================================

#[test]
fn test_adjust_priority_increase_preempts_immediately() {
    let h = Harness::new(4);
    for room in 1..=3 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    h.engine.admit(4, Mode::Cooling, FanSpeed::Low, 18.0).unwrap();
    assert_eq!(h.engine.room_state(4), RoomState::Waiting);

    // Upgrading the waiter to HIGH outranks the MEDIUM service set; the
    // swap happens without waiting for a tick.
    let changed = h.engine.adjust(
        4,
        AdjustSettings {
            fan_speed: Some(FanSpeed::High),
            ..AdjustSettings::default()
        },
    );
    assert!(changed);
    assert!(matches!(h.engine.room_state(4), RoomState::Serving(_)));
    assert_eq!(h.engine.room_state(1), RoomState::Waiting);
}

#[test]
fn test_adjust_priority_decrease_yields_to_waiter() {
    let h = Harness::new(4);
    for room in 1..=4 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    assert_eq!(h.engine.room_state(4), RoomState::Waiting);

    // Downgrading a served room below a waiter's priority evicts it at once.
    let changed = h.engine.adjust(
        1,
        AdjustSettings {
            fan_speed: Some(FanSpeed::Low),
            ..AdjustSettings::default()
        },
    );
    assert!(changed);
    assert_eq!(h.engine.room_state(1), RoomState::Waiting);
    assert!(matches!(h.engine.room_state(4), RoomState::Serving(_)));
}

#[test]
fn test_adjust_priority_decrease_prefers_highest_priority_waiter() {
    let cfg = EngineConfig {
        unit_count: 1,
        ..EngineConfig::default()
    };
    let h = Harness::with_config(3, cfg);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 18.0).unwrap();
    h.engine.admit(2, Mode::Cooling, FanSpeed::Medium, 18.0).unwrap();
    for _ in 0..3 {
        h.engine.tick();
    }
    h.engine.admit(3, Mode::Cooling, FanSpeed::High, 18.0).unwrap();
    assert_eq!(h.engine.list_waiting(), vec![2, 3]);

    // Downgrading the served room hands the unit to the HIGH waiter, not to
    // the MEDIUM one that has merely waited longer.
    let changed = h.engine.adjust(
        1,
        AdjustSettings {
            fan_speed: Some(FanSpeed::Medium),
            ..AdjustSettings::default()
        },
    );
    assert!(changed);
    assert!(matches!(h.engine.room_state(3), RoomState::Serving(_)));
    assert_eq!(h.engine.list_waiting(), vec![1, 2]);

    // The HIGH room keeps the unit over later ticks; the two MEDIUM rooms
    // cannot rotate it away.
    for _ in 0..5 {
        h.engine.tick();
    }
    assert_eq!(h.engine.list_serving(), vec![3]);
}

#[test]
fn test_adjust_priority_decrease_equal_waiter_needs_slice() {
    let cfg = EngineConfig {
        unit_count: 1,
        ..EngineConfig::default()
    };
    let h = Harness::with_config(2, cfg);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 18.0).unwrap();
    h.engine.admit(2, Mode::Cooling, FanSpeed::Medium, 18.0).unwrap();

    // The waiter has not reached the slice yet; an equal-priority downgrade
    // keeps the unit where it is.
    h.engine.adjust(
        1,
        AdjustSettings {
            fan_speed: Some(FanSpeed::Medium),
            ..AdjustSettings::default()
        },
    );
    assert!(matches!(h.engine.room_state(1), RoomState::Serving(_)));
    assert_eq!(h.engine.room_state(2), RoomState::Waiting);
}

#[test]
fn test_adjust_priority_decrease_equal_slice_eligible_waiter_swaps() {
    let cfg = EngineConfig {
        unit_count: 1,
        ..EngineConfig::default()
    };
    let h = Harness::with_config(2, cfg);
    h.engine.admit(1, Mode::Cooling, FanSpeed::High, 18.0).unwrap();
    h.engine.admit(2, Mode::Cooling, FanSpeed::Medium, 18.0).unwrap();
    h.engine.tick();
    h.engine.tick();
    // Priorities differ, so the slice alone rotates nothing.
    assert_eq!(h.engine.list_serving(), vec![1]);

    h.engine.adjust(
        1,
        AdjustSettings {
            fan_speed: Some(FanSpeed::Medium),
            ..AdjustSettings::default()
        },
    );
    assert!(matches!(h.engine.room_state(2), RoomState::Serving(_)));
    assert_eq!(h.engine.list_waiting(), vec![1]);
}

#[test]
fn test_adjust_mode_change_resets_target_to_new_default() {
    let h = Harness::new(1);
    h.engine.admit(1, Mode::Cooling, FanSpeed::Medium, 25.0).unwrap();

    let changed = h.engine.adjust(
        1,
        AdjustSettings {
            mode: Some(Mode::Heating),
            ..AdjustSettings::default()
        },
    );
    assert!(changed);
    let request = h.engine.active_request(1).unwrap();
    assert_eq!(request.mode, Mode::Heating);
    assert!(approx(request.target_temp, 22.0));
}

#[test]
fn test_adjust_rejects_empty_or_missing() {
    let h = Harness::new(1);
    assert!(!h.engine.adjust(1, AdjustSettings::default()));

    h.engine.admit(1, Mode::Cooling, FanSpeed::Low, 20.0).unwrap();
    assert!(!h.engine.adjust(1, AdjustSettings::default()));
    assert!(!h.engine.adjust(999, AdjustSettings::default()));

    // An adjustment that changes nothing reports false.
    let changed = h.engine.adjust(
        1,
        AdjustSettings {
            fan_speed: Some(FanSpeed::Low),
            ..AdjustSettings::default()
        },
    );
    assert!(!changed);
}

#[test]
fn test_adjust_target_clamps_to_mode_range() {
    let h = Harness::new(1);
    h.engine.admit(1, Mode::Cooling, FanSpeed::Low, 25.0).unwrap();

    let changed = h.engine.adjust(
        1,
        AdjustSettings {
            target_temp: Some(40.0),
            ..AdjustSettings::default()
        },
    );
    assert!(changed);
    assert!(approx(h.engine.active_request(1).unwrap().target_temp, 28.0));
}

// ============================================================================
// Resync and invariants
// ============================================================================

#[test]
fn test_resync_preserves_placements() {
    let h = Harness::new(5);
    for room in 1..=5 {
        h.engine
            .admit(room, Mode::Cooling, FanSpeed::Medium, 18.0)
            .unwrap();
    }
    let serving_before = h.engine.list_serving();
    let waiting_before = h.engine.list_waiting();
    assert_eq!(serving_before.len(), 3);
    assert_eq!(waiting_before.len(), 2);

    h.engine.resync();
    assert_eq!(h.engine.list_serving(), serving_before);
    assert_eq!(h.engine.list_waiting(), waiting_before);
}

#[test]
fn test_churn_preserves_invariants() {
    let cfg = EngineConfig {
        unit_count: 2,
        ..EngineConfig::default()
    };
    let h = Harness::with_config(6, cfg);
    let fans = [FanSpeed::High, FanSpeed::Medium, FanSpeed::Low];

    for step in 0u32..60 {
        let room = step % 6 + 1;
        match step % 4 {
            0 | 1 => {
                let fan = fans[(step as usize / 4) % 3];
                h.engine.admit(room, Mode::Cooling, fan, 18.0).unwrap();
            }
            2 => {
                h.engine.cancel(room);
            }
            _ => h.engine.tick(),
        }

        // Placements stay disjoint and within capacity, and a served room
        // always holds exactly the unit that claims to serve it.
        let serving = h.engine.list_serving();
        let waiting = h.engine.list_waiting();
        assert!(serving.len() <= 2);
        assert!(serving.iter().all(|r| !waiting.contains(r)));
        let units = h.engine.unit_snapshot();
        for &room in &serving {
            let held: Vec<_> = units
                .iter()
                .filter(|u| u.serving_room == Some(room))
                .collect();
            assert_eq!(held.len(), 1);
            assert_eq!(h.engine.room_state(room), RoomState::Serving(held[0].unit_id));
        }
        for &room in &waiting {
            assert!(units.iter().all(|u| u.serving_room != Some(room)));
            assert!(h.engine.active_request(room).is_some());
        }
    }
}
