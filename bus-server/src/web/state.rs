//! Application state for the web layer.

use std::sync::Arc;

use crate::index::TransitIndex;
use crate::planner::PlanConfig;

/// Shared application state.
///
/// The index is immutable, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// The transit index built at startup
    pub index: Arc<TransitIndex>,

    /// Planner configuration
    pub config: Arc<PlanConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(index: TransitIndex, config: PlanConfig) -> Self {
        Self {
            index: Arc::new(index),
            config: Arc::new(config),
        }
    }
}
