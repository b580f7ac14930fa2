//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading organization
//! payroll settings from YAML files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::{LocationsFile, OrganizationFile, OrganizationSettings, PayPeriodsFile};

/// Loads and provides access to an organization's payroll settings.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── organization.yaml   # Name, currency, break rules and mode (required)
/// ├── locations.yaml      # Per-location break rule overrides (optional)
/// └── pay_periods.yaml    # Pay periods in lookup order (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use timesheet_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Loaded settings for {}", loader.settings().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: OrganizationSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `organization.yaml` is missing (`ConfigNotFound`)
    /// - Any present file contains invalid YAML (`ConfigParseError`)
    /// - A pay period ends before it starts (`InvalidPayPeriod`)
    ///
    /// Malformed break rule lists are not errors; they load as empty sets.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organization = Self::load_yaml::<OrganizationFile>(&path.join("organization.yaml"))?;
        let locations = Self::load_optional_yaml::<LocationsFile>(&path.join("locations.yaml"))?;
        let pay_periods =
            Self::load_optional_yaml::<PayPeriodsFile>(&path.join("pay_periods.yaml"))?;

        for period in &pay_periods.pay_periods {
            period.validate()?;
        }

        let settings = OrganizationSettings::from_files(organization, locations, pay_periods);
        info!(
            organization = %settings.name,
            mode = ?settings.break_settings.mode,
            rules = settings.break_settings.rules.rules().len(),
            location_overrides = settings.break_settings.location_overrides.len(),
            pay_periods = settings.pay_periods.len(),
            "Loaded organization settings"
        );

        Ok(Self { settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file that may be absent, defaulting when it is.
    fn load_optional_yaml<T: DeserializeOwned + Default>(path: &Path) -> EngineResult<T> {
        if !path.exists() {
            debug!(path = %path.display(), "Optional configuration file absent");
            return Ok(T::default());
        }
        Self::load_yaml(path)
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &OrganizationSettings {
        &self.settings
    }

    /// Consumes the loader, returning the settings.
    pub fn into_settings(self) -> OrganizationSettings {
        self.settings
    }
}
