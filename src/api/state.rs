//! Application state for the Payroll Engine API.

use std::sync::Arc;

use crate::orchestrator::PayrollOrchestrator;

/// Shared application state.
///
/// Holds the orchestrator every request handler calculates with.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<PayrollOrchestrator>,
}

impl AppState {
    /// Creates a new application state around the given orchestrator.
    pub fn new(orchestrator: PayrollOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Returns a reference to the orchestrator.
    pub fn orchestrator(&self) -> &PayrollOrchestrator {
        &self.orchestrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
