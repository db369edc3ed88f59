//! Runtime adapters: API surface and the periodic tick driver.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod ticker;

pub use api::{
    adjust_request, cancel_request, health, room_status, submit_request, Health,
    RoomStatusResponse, ServiceSubmission, SubmissionResponse,
};
#[cfg(feature = "tokio-runtime")]
pub use ticker::{spawn_ticker, TickerHandle};
