//! Room storage backends.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRoomStore;
pub use postgres::PostgresRoomStore;
