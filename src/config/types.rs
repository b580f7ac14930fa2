//! Configuration types for organization payroll settings.
//!
//! The file structures mirror the YAML on disk. Break rule lists are kept
//! as raw YAML values at this layer so that a malformed list can degrade to
//! an empty rule set instead of failing the whole load.

use serde::Deserialize;
use tracing::warn;

use crate::models::{BreakCalculationMode, BreakRuleSet, BreakSettings, PayPeriod};

fn default_currency_symbol() -> String {
    "£".to_string()
}

/// Structure of `organization.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationFile {
    /// The organization's display name.
    pub name: String,
    /// Prefix for money values in text exports.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// The organization-wide break rule list.
    #[serde(default)]
    pub break_rules: serde_yaml::Value,
    /// How break rules are applied.
    #[serde(default)]
    pub break_calculation_mode: BreakCalculationMode,
}

/// One location entry of `locations.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// The location id time entries refer to.
    pub id: String,
    /// The location's display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Break rules replacing the organization's at this location.
    #[serde(default)]
    pub break_rules: serde_yaml::Value,
}

/// Structure of `locations.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsFile {
    /// Configured locations.
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

/// Structure of `pay_periods.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayPeriodsFile {
    /// Pay periods, in first-match lookup order.
    #[serde(default)]
    pub pay_periods: Vec<PayPeriod>,
}

/// The payroll settings of one organization, as the engine consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationSettings {
    /// The organization's display name.
    pub name: String,
    /// Prefix for money values in text exports.
    pub currency_symbol: String,
    /// Break rules for both scopes plus the calculation mode.
    pub break_settings: BreakSettings,
    /// Pay periods, in first-match lookup order.
    pub pay_periods: Vec<PayPeriod>,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            currency_symbol: default_currency_symbol(),
            break_settings: BreakSettings::default(),
            pay_periods: Vec::new(),
        }
    }
}

impl OrganizationSettings {
    /// Assembles settings from the parsed files.
    ///
    /// Locations whose rule list is empty or malformed get no override and
    /// fall back to the organization's rules.
    pub fn from_files(
        organization: OrganizationFile,
        locations: LocationsFile,
        pay_periods: PayPeriodsFile,
    ) -> Self {
        let location_overrides = locations
            .locations
            .into_iter()
            .filter_map(|location| {
                let rules = stored_rules(&location.break_rules);
                if rules.is_empty() {
                    None
                } else {
                    Some((location.id, rules))
                }
            })
            .collect();

        Self {
            name: organization.name,
            currency_symbol: organization.currency_symbol,
            break_settings: BreakSettings {
                rules: stored_rules(&organization.break_rules),
                mode: organization.break_calculation_mode,
                location_overrides,
            },
            pay_periods: pay_periods.pay_periods,
        }
    }
}

/// Converts a YAML rule list through the lenient stored-rules parser.
fn stored_rules(value: &serde_yaml::Value) -> BreakRuleSet {
    match serde_json::to_value(value) {
        Ok(json) => BreakRuleSet::from_stored_value(json),
        Err(err) => {
            warn!(error = %err, "Break rules are not representable as JSON, treating as empty");
            BreakRuleSet::empty()
        }
    }
}
