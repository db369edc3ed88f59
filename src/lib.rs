//! # HVAC Scheduler
//!
//! A priority scheduler for a small pool of shared climate-control units
//! serving hotel rooms, with a discrete-time temperature simulation.
//!
//! Each room may hold one active service request at a time. Requests carry a
//! fan speed that doubles as scheduling priority; when every unit is busy,
//! lower-priority rooms wait in a queue and can be preempted by strictly
//! higher-priority arrivals. Rooms of equal priority share units through a
//! round-robin time slice.
//!
//! ## Core behavior
//!
//! - **Priority scheduling**: fan speed HIGH/MEDIUM/LOW maps to priority
//!   3/2/1. A saturated pool is preempted only by a strictly greater
//!   priority; equal or lower priorities queue.
//! - **Time slicing**: a room that has waited at least the configured slice
//!   swaps places with the longest-serving room of equal priority, one swap
//!   per tick.
//! - **Temperature simulation**: each tick moves a served room towards its
//!   target at a rate set by its fan speed, and drifts idle rooms back
//!   towards their baseline. Reaching the target releases the unit.
//! - **Billing**: releasing a served room cuts a usage record pricing the
//!   energy spent, delivered to a pluggable [`core::BillingSink`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use hvac_scheduler::builders::build_engine;
//! use hvac_scheduler::config::EngineConfig;
//! use hvac_scheduler::core::{FanSpeed, InMemoryBillingSink, Mode};
//! use hvac_scheduler::infra::rooms::InMemoryRoomStore;
//!
//! let rooms = InMemoryRoomStore::new();
//! rooms.insert_room(101, 30.0);
//! let engine = build_engine(EngineConfig::default(), rooms, InMemoryBillingSink::new())?;
//! engine.admit(101, Mode::Cooling, FanSpeed::High, 25.0)?;
//! engine.tick();
//! ```
//!
//! For complete examples, see:
//! - `tests/scheduler_engine_test.rs` - Full integration tests
//! - `README.md` - Comprehensive documentation

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling types: requests, units, queues, simulation, and the engine.
pub mod core;
/// Configuration models for the engine and tick driver.
pub mod config;
/// Builders to construct the engine from configuration.
pub mod builders;
/// Infrastructure adapters for room state storage.
pub mod infra;
/// Runtime adapters: API surface and the periodic tick driver.
pub mod runtime;
/// Shared utilities.
pub mod util;
