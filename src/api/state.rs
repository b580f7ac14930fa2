//! Application state for the timesheet engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, OrganizationSettings};

/// Shared application state.
///
/// Holds the organization's payroll settings, loaded once at startup and
/// read by every export request.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<OrganizationSettings>,
}

impl AppState {
    /// Creates a new application state from loaded settings.
    pub fn new(settings: OrganizationSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Creates a new application state from a configuration loader.
    pub fn from_loader(loader: ConfigLoader) -> Self {
        Self::new(loader.into_settings())
    }

    /// Returns a reference to the organization settings.
    pub fn settings(&self) -> &OrganizationSettings {
        &self.settings
    }
}
