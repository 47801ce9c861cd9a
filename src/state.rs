//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed to HTTP
//! handlers and the optional background refresh task.

use std::sync::Arc;

use ptree_exporter::Reconciler;

use crate::config::Config;
use crate::stats::RefreshStats;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests and background tasks.
pub struct AppState {
    /// Owns the published forest and the refresh lifecycle.
    pub reconciler: Reconciler,
    pub config: Arc<Config>,
    pub stats: Arc<RefreshStats>,
}
