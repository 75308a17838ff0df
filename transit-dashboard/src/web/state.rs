//! Application state for the web layer.

use std::sync::Arc;

use crate::dashboard::Dashboard;

/// Shared application state.
pub struct AppState<P> {
    /// Dashboard service over the configured provider
    pub dashboard: Arc<Dashboard<P>>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(dashboard: Dashboard<P>) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

// Manual impl: the provider itself need not be `Clone`.
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            dashboard: self.dashboard.clone(),
        }
    }
}
