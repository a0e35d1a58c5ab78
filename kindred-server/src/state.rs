//! Application state management

use kindred::core::FamilyManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Kindred family manager
    pub family_manager: FamilyManager,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(family_manager: FamilyManager, config: ServerConfig) -> Self {
        Self {
            family_manager,
            config,
        }
    }
}
