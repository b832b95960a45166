//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use pdfgen_core::Pipeline;

/// Read-only state shared by all handlers. No per-request data lives here.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Upper bound on one generate request
    pub timeout: Duration,
}

impl AppState {
    pub fn new(pipeline: Pipeline, timeout: Duration) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            timeout,
        }
    }
}
