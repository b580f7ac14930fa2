//! Break resolution.
//!
//! Resolves the effective break rules for a site from the two-level scope
//! chain (organization default, location override) and applies them to a
//! day's shift durations in the organization's calculation mode.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BreakCalculationMode, BreakRuleSet, BreakSettings};

/// Which scope supplied the effective rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// The organization's default rules.
    Organization,
    /// A location override.
    Location,
}

/// The rule set and mode that apply to one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveBreakRules<'a> {
    /// The rules to look thresholds up in.
    pub rules: &'a BreakRuleSet,
    /// Always the organization's mode.
    pub mode: BreakCalculationMode,
    /// Where `rules` came from.
    pub scope: RuleScope,
}

/// Breaks computed for one employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakAllocation {
    /// One break per shift, aligned with the input durations.
    PerShift(Vec<u32>),
    /// A single deduction for the day's summed duration.
    PerDay(u32),
}

impl BreakAllocation {
    /// Total break minutes across the allocation.
    pub fn total_minutes(&self) -> u32 {
        match self {
            BreakAllocation::PerShift(minutes) => minutes.iter().sum(),
            BreakAllocation::PerDay(minutes) => *minutes,
        }
    }
}

/// Picks the effective rule set from the scope chain.
///
/// A non-empty location rule set fully replaces the organization's set.
/// An absent or empty location set falls back to the organization. The mode
/// always comes from the organization.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::{resolve_break_rules, RuleScope};
/// use timesheet_engine::models::{BreakCalculationMode, BreakRule, BreakRuleSet};
/// use rust_decimal::Decimal;
///
/// let org = BreakRuleSet::new(vec![BreakRule { min_hours: Decimal::new(6, 0), break_minutes: 30 }]);
/// let site = BreakRuleSet::new(vec![BreakRule { min_hours: Decimal::new(5, 0), break_minutes: 20 }]);
///
/// let effective = resolve_break_rules(&org, BreakCalculationMode::PerShift, Some(&site));
/// assert_eq!(effective.scope, RuleScope::Location);
///
/// let empty = BreakRuleSet::empty();
/// let effective = resolve_break_rules(&org, BreakCalculationMode::PerShift, Some(&empty));
/// assert_eq!(effective.scope, RuleScope::Organization);
/// ```
pub fn resolve_break_rules<'a>(
    org_rules: &'a BreakRuleSet,
    org_mode: BreakCalculationMode,
    location_rules: Option<&'a BreakRuleSet>,
) -> EffectiveBreakRules<'a> {
    match location_rules {
        Some(rules) if !rules.is_empty() => EffectiveBreakRules {
            rules,
            mode: org_mode,
            scope: RuleScope::Location,
        },
        _ => EffectiveBreakRules {
            rules: org_rules,
            mode: org_mode,
            scope: RuleScope::Organization,
        },
    }
}

/// Convenience over [`resolve_break_rules`] for an organization's settings
/// and an optional location id.
pub fn effective_rules_for_location<'a>(
    settings: &'a BreakSettings,
    location_id: Option<&str>,
) -> EffectiveBreakRules<'a> {
    resolve_break_rules(
        &settings.rules,
        settings.mode,
        settings.location_rules(location_id),
    )
}

/// Computes break minutes for one employee's shifts on one calendar day.
///
/// In per-shift mode each duration is looked up on its own. In per-day mode
/// the durations are summed and looked up once; the result is a single
/// deduction for the day, not attributed to any shift.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::{resolve_break_rules, resolve_breaks, BreakAllocation};
/// use timesheet_engine::models::{BreakCalculationMode, BreakRule, BreakRuleSet};
/// use rust_decimal::Decimal;
///
/// let rules = BreakRuleSet::new(vec![BreakRule { min_hours: Decimal::new(6, 0), break_minutes: 30 }]);
/// let shifts = [Decimal::new(3, 0), Decimal::new(4, 0)];
///
/// let per_day = resolve_break_rules(&rules, BreakCalculationMode::PerDay, None);
/// assert_eq!(resolve_breaks(&per_day, &shifts), BreakAllocation::PerDay(30));
///
/// let per_shift = resolve_break_rules(&rules, BreakCalculationMode::PerShift, None);
/// assert_eq!(resolve_breaks(&per_shift, &shifts), BreakAllocation::PerShift(vec![0, 0]));
/// ```
pub fn resolve_breaks(effective: &EffectiveBreakRules<'_>, shift_hours: &[Decimal]) -> BreakAllocation {
    match effective.mode {
        BreakCalculationMode::PerShift => BreakAllocation::PerShift(
            shift_hours
                .iter()
                .map(|hours| effective.rules.break_minutes_for(*hours))
                .collect(),
        ),
        BreakCalculationMode::PerDay => {
            let day_hours: Decimal = shift_hours.iter().sum();
            BreakAllocation::PerDay(effective.rules.break_minutes_for(day_hours))
        }
    }
}
