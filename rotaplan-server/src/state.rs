//! Server state management
//!
//! Shared state for the one-shot generation handoff: the attempt counter a
//! client may poll while a generation runs.

use std::sync::atomic::{AtomicBool, AtomicUsize};

use rotaplan_core::ProgressCounter;

/// Server-wide shared state
pub struct ServerState {
    /// Attempt counter of the running (or last finished) generation
    pub progress: ProgressCounter,
    /// Whether a generation is currently running
    pub running: AtomicBool,
    /// Attempt budget of the current run, for progress percentages
    pub budget: AtomicUsize,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            progress: ProgressCounter::default(),
            running: AtomicBool::new(false),
            budget: AtomicUsize::new(0),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
