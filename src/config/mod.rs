//! Configuration models for the scheduler engine.

pub mod engine;

pub use engine::EngineConfig;
