//! Application state for the allocation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::allocation::AllocationOrchestrator;

/// Shared application state.
///
/// Holds the orchestrator, and through it the store and the loaded
/// engine configuration.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<AllocationOrchestrator>,
}

impl AppState {
    /// Creates a new application state around an orchestrator.
    pub fn new(orchestrator: AllocationOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Returns a shared handle to the orchestrator.
    pub fn orchestrator(&self) -> Arc<AllocationOrchestrator> {
        Arc::clone(&self.orchestrator)
    }
}
