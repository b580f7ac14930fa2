//! Configuration loading for the timesheet engine.
//!
//! Organization payroll settings (break rules and mode, per-location
//! overrides, pay periods) are loaded from YAML files and validated at this
//! boundary, before any calculation runs.
//!
//! # Example
//!
//! ```no_run
//! use timesheet_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded settings for {}", config.settings().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    LocationConfig, LocationsFile, OrganizationFile, OrganizationSettings, PayPeriodsFile,
};
