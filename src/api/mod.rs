//! HTTP API module for the Attendance Reconciliation Engine.
//!
//! This module wires the engine's external interfaces onto a thin REST
//! surface: punch delivery, aggregate lookup, and the manual-review
//! entrypoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DismissRequest, ProcessRequest, ResolveRequest};
pub use response::{ApiError, ProcessResponse};
pub use state::AppState;
