//! Application state for the Attendance Reconciliation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::ShiftDirectory;
use crate::pipeline::{AttendanceEngine, OnDutyLedger};

/// The engine type served by the API.
pub type Engine = AttendanceEngine<ShiftDirectory, OnDutyLedger>;

/// Shared application state.
///
/// The engine sits behind an async `RwLock`: processing and review
/// transitions take the write lock, so writes for a key are serialized and
/// the per-(employee, date) upsert stays atomic.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Engine>>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    /// Returns the shared engine handle.
    pub fn engine(&self) -> &Arc<RwLock<Engine>> {
        &self.engine
    }
}
