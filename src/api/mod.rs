//! HTTP API module for the seat allocation engine.
//!
//! Exposes the synchronous per-branch allocation, the scheduled run over
//! all companies, and a health probe.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AllocationRequest, ScheduledRunRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
