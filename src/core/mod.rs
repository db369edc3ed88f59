//! Core scheduling types: requests, units, queues, simulation, and the engine.

pub mod billing;
pub mod engine;
pub mod error;
pub mod queues;
pub mod requests;
pub mod rooms;
pub mod simulator;
pub mod types;
pub mod units;

pub use billing::{BillingSink, InMemoryBillingSink, NullBillingSink, UsageRecord};
pub use engine::{AdmitOutcome, RoomState, SchedulerEngine};
pub use error::{AppResult, SchedulerError};
pub use queues::{QueueEntry, QueueManager};
pub use requests::{AdjustSettings, RequestStore, ServiceRequest};
pub use rooms::{RoomProvider, RoomReading};
pub use simulator::{step_recovery, step_served, RecoveryTracker, StepOutcome, TEMP_EPSILON};
pub use types::{FanSpeed, Mode, Priority, RoomId, UnitId};
pub use units::{BindParams, Unit, UnitPool};
