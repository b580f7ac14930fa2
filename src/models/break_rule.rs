//! Break rule models.
//!
//! A [`BreakRuleSet`] is a threshold table mapping a minimum worked duration
//! to an unpaid break deduction. Rule sets exist at two scopes, the
//! organization default and an optional per-location override, and are
//! applied in one of the [`BreakCalculationMode`]s.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A single break threshold.
///
/// A shift (or day, in [`BreakCalculationMode::PerDay`]) lasting at least
/// `min_hours` attracts `break_minutes` of unpaid break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRule {
    /// Minimum duration in hours for this rule to apply.
    #[serde(alias = "minHours")]
    pub min_hours: Decimal,
    /// Unpaid break deducted once the threshold is reached.
    #[serde(alias = "breakMinutes")]
    pub break_minutes: u32,
}

/// Reasons a rule list fails boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakRuleError {
    /// A rule carried a negative `min_hours`.
    #[error("break rule threshold must be >= 0, got {0}")]
    NegativeThreshold(Decimal),
}

/// An ordered set of break rules with at most one rule per threshold.
///
/// Rules are kept sorted by ascending `min_hours`. When the input contains
/// duplicate thresholds the last one wins.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{BreakRule, BreakRuleSet};
/// use rust_decimal::Decimal;
///
/// let rules = BreakRuleSet::new(vec![
///     BreakRule { min_hours: Decimal::new(6, 0), break_minutes: 30 },
///     BreakRule { min_hours: Decimal::new(4, 0), break_minutes: 15 },
/// ]);
///
/// assert_eq!(rules.break_minutes_for(Decimal::new(3, 0)), 0);
/// assert_eq!(rules.break_minutes_for(Decimal::new(5, 0)), 15);
/// assert_eq!(rules.break_minutes_for(Decimal::new(8, 0)), 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BreakRule>", into = "Vec<BreakRule>")]
pub struct BreakRuleSet {
    rules: Vec<BreakRule>,
}

impl BreakRuleSet {
    /// Builds a rule set, deduplicating thresholds (last write wins).
    pub fn new(rules: Vec<BreakRule>) -> Self {
        let by_threshold: BTreeMap<Decimal, u32> = rules
            .into_iter()
            .map(|rule| (rule.min_hours, rule.break_minutes))
            .collect();

        Self {
            rules: by_threshold
                .into_iter()
                .map(|(min_hours, break_minutes)| BreakRule {
                    min_hours,
                    break_minutes,
                })
                .collect(),
        }
    }

    /// An empty rule set. Every duration maps to a zero break.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a persisted rule list such as
    /// `[{"minHours": 6, "breakMinutes": 30}]`.
    ///
    /// Stored rule lists are validated here, at the boundary. Anything that
    /// does not parse or validate degrades to an empty set so that an export
    /// is never blocked by bad settings.
    ///
    /// ```
    /// use timesheet_engine::models::BreakRuleSet;
    /// use rust_decimal::Decimal;
    ///
    /// let rules = BreakRuleSet::from_stored_json(r#"[{"minHours": 6, "breakMinutes": 30}]"#);
    /// assert_eq!(rules.break_minutes_for(Decimal::new(7, 0)), 30);
    ///
    /// let broken = BreakRuleSet::from_stored_json("not json");
    /// assert!(broken.is_empty());
    /// ```
    pub fn from_stored_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::empty();
        }
        match serde_json::from_str::<BreakRuleSet>(raw) {
            Ok(rules) => rules.checked(),
            Err(err) => {
                warn!(error = %err, "Malformed stored break rules, treating as empty");
                Self::empty()
            }
        }
    }

    /// Parses break rules from an already-decoded JSON value.
    ///
    /// Accepts a rule array, a string holding a serialized rule array, or
    /// null. Any other shape degrades to an empty set.
    pub fn from_stored_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::empty(),
            serde_json::Value::String(raw) => Self::from_stored_json(&raw),
            other => match serde_json::from_value::<BreakRuleSet>(other) {
                Ok(rules) => rules.checked(),
                Err(err) => {
                    warn!(error = %err, "Malformed stored break rules, treating as empty");
                    Self::empty()
                }
            },
        }
    }

    fn checked(self) -> Self {
        if !self.is_monotonic() {
            warn!(
                rules = ?self.rules,
                "Break rules decrease as thresholds rise; longer shifts may get shorter breaks"
            );
        }
        self
    }

    /// Returns the break for a duration: the rule with the largest
    /// `min_hours <= hours`, or zero when no rule qualifies.
    pub fn break_minutes_for(&self, hours: Decimal) -> u32 {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.min_hours <= hours)
            .map(|rule| rule.break_minutes)
            .unwrap_or(0)
    }

    /// True when the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules, sorted by ascending threshold.
    pub fn rules(&self) -> &[BreakRule] {
        &self.rules
    }

    /// True when break minutes never decrease as thresholds increase.
    pub fn is_monotonic(&self) -> bool {
        self.rules
            .windows(2)
            .all(|pair| pair[0].break_minutes <= pair[1].break_minutes)
    }
}

impl TryFrom<Vec<BreakRule>> for BreakRuleSet {
    type Error = BreakRuleError;

    fn try_from(rules: Vec<BreakRule>) -> Result<Self, Self::Error> {
        if let Some(rule) = rules.iter().find(|r| r.min_hours < Decimal::ZERO) {
            return Err(BreakRuleError::NegativeThreshold(rule.min_hours));
        }
        Ok(Self::new(rules))
    }
}

impl From<BreakRuleSet> for Vec<BreakRule> {
    fn from(set: BreakRuleSet) -> Self {
        set.rules
    }
}

/// How break rules are applied to an employee's shifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakCalculationMode {
    /// Each shift's break is computed from its own duration.
    #[default]
    #[serde(alias = "per_shift")]
    PerShift,
    /// Shifts on the same calendar day are summed and one break applies to
    /// the day's total.
    #[serde(alias = "per_day")]
    PerDay,
}

/// The break configuration of one organization.
///
/// Holds both scopes of the rule chain: the organization default (always
/// present) and per-location overrides keyed by location id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakSettings {
    /// Organization-wide rule set.
    #[serde(default)]
    pub rules: BreakRuleSet,
    /// Organization-wide calculation mode. Locations cannot override it.
    #[serde(default)]
    pub mode: BreakCalculationMode,
    /// Per-location rule sets, keyed by location id.
    #[serde(default)]
    pub location_overrides: HashMap<String, BreakRuleSet>,
}

impl BreakSettings {
    /// Returns the override registered for a location, if any.
    pub fn location_rules(&self, location_id: Option<&str>) -> Option<&BreakRuleSet> {
        location_id.and_then(|id| self.location_overrides.get(id))
    }
}
