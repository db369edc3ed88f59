//! Billing sink implementations.
//!
//! Usage records are cut when a served room releases its unit (cancellation
//! or target reached) and handed to a fire-and-forget sink; the scheduler
//! never reads them back.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::types::{FanSpeed, Mode, RoomId, UnitId};

/// One billable span of unit service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Record identifier.
    pub record_id: String,
    /// Billed room.
    pub room_id: RoomId,
    /// Unit that served the room.
    pub unit_id: UnitId,
    /// Simulated minute the request was created.
    pub request_time_min: u64,
    /// Simulated minute service started.
    pub service_start_min: u64,
    /// Simulated minute service ended.
    pub service_end_min: u64,
    /// Service duration in simulated minutes.
    pub duration_min: u64,
    /// Fan speed during the service.
    pub fan_speed: FanSpeed,
    /// Operating mode during the service.
    pub mode: Mode,
    /// Target temperature of the service.
    pub target_temp: f64,
    /// Remaining distance from room temperature to target at release.
    pub temp_delta: f64,
    /// Energy charged for the span.
    pub energy: f64,
    /// Cost charged for the span.
    pub cost: f64,
    /// Rate used to derive cost from energy.
    pub rate: f64,
    /// Wall-clock milliseconds when the record was cut.
    pub recorded_at_ms: u128,
}

impl UsageRecord {
    /// Derive energy and cost from the target-temperature delta and the fan
    /// speed's minutes-per-degree rate, then fill both fields.
    pub fn price(&mut self) {
        self.energy = self.temp_delta / f64::from(self.fan_speed.minutes_per_degree());
        self.cost = self.energy * self.rate;
    }
}

/// Billing sink abstraction. Fire-and-forget from the scheduler's side.
pub trait BillingSink: Send {
    /// Record one billable usage span.
    fn record_usage(&mut self, record: UsageRecord);
}

/// In-memory billing sink for testing and dev. Clones share one record
/// store, so a caller may keep a handle after handing the sink to the
/// scheduler.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBillingSink {
    records: Arc<Mutex<Vec<UsageRecord>>>,
}

impl InMemoryBillingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded usage.
    #[must_use]
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().clone()
    }
}

impl BillingSink for InMemoryBillingSink {
    fn record_usage(&mut self, record: UsageRecord) {
        self.records.lock().push(record);
    }
}

/// Billing sink that drops every record. Useful when billing is handled by
/// an external collaborator listening elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBillingSink;

impl BillingSink for NullBillingSink {
    fn record_usage(&mut self, _record: UsageRecord) {}
}
