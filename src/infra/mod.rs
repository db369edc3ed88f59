//! Infrastructure adapters for room storage backends.

pub mod rooms;

pub use rooms::InMemoryRoomStore;
