//! Builders to construct scheduler components from configuration.

pub mod engine_builder;

pub use engine_builder::build_engine;
