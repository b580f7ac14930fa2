//! Calculated entry models.
//!
//! These are the derived, per-request values produced by the calculation
//! stage. Nothing here is persisted; values are kept unrounded and only
//! rounded when an export is rendered.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A time entry with its hours, rate and pay resolved.
///
/// Invariants: `net_hours = max(0, gross_hours - break_minutes / 60)` and
/// `total_pay = net_hours * effective_rate`.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::CalculatedEntry;
/// use chrono::{DateTime, NaiveDate};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let entry = CalculatedEntry {
///     entry_id: "te_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     employee_name: "Alex".to_string(),
///     employee_email: "alex@example.com".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     clock_in: DateTime::parse_from_rfc3339("2024-01-15T08:00:00+00:00").unwrap(),
///     clock_out: DateTime::parse_from_rfc3339("2024-01-15T12:00:00+00:00").unwrap(),
///     location_name: None,
///     category_id: Some("cat_bar".to_string()),
///     category_name: "Bar".to_string(),
///     break_minutes: 15,
///     gross_hours: Decimal::from_str("4").unwrap(),
///     net_hours: Decimal::from_str("3.75").unwrap(),
///     effective_rate: Decimal::from_str("12.00").unwrap(),
///     total_pay: Decimal::from_str("45.00").unwrap(),
///     pay_period: "January 2024".to_string(),
/// };
/// assert!(!entry.is_uncategorized());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedEntry {
    /// The source time entry id.
    pub entry_id: String,
    /// The employee who worked the entry.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The employee's email address.
    pub employee_email: String,
    /// The work date (clock-in's local date).
    pub date: NaiveDate,
    /// Clock-in timestamp.
    pub clock_in: DateTime<FixedOffset>,
    /// Clock-out timestamp.
    pub clock_out: DateTime<FixedOffset>,
    /// The site's display name, if any.
    pub location_name: Option<String>,
    /// The pay category id, `None` when uncategorized.
    pub category_id: Option<String>,
    /// The category display name ("Uncategorized" when absent).
    pub category_name: String,
    /// Break minutes deducted from this entry.
    pub break_minutes: u32,
    /// Elapsed hours between clock-in and clock-out.
    pub gross_hours: Decimal,
    /// Gross hours less this entry's break, floored at zero.
    pub net_hours: Decimal,
    /// The resolved hourly rate.
    pub effective_rate: Decimal,
    /// `net_hours * effective_rate`, unrounded.
    pub total_pay: Decimal,
    /// The pay period label for `date`.
    pub pay_period: String,
}

impl CalculatedEntry {
    /// True when the entry had no pay category and was zero-rated.
    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none()
    }
}

/// A per-day break deduction that belongs to no single entry.
///
/// Produced in per-day break mode when the day's rule-derived break exceeds
/// the breaks already recorded on that day's entries. It reduces the day's
/// totals only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakAdjustment {
    /// The employee the deduction applies to.
    pub employee_id: String,
    /// The work date the deduction applies to.
    pub date: NaiveDate,
    /// Minutes deducted beyond the entries' recorded breaks.
    pub minutes: u32,
    /// Hours deducted, capped so the day's net hours stay non-negative.
    pub hours: Decimal,
    /// Pay removed: `hours` at the day's blended rate.
    pub pay: Decimal,
}

/// The output of the calculation stage for one export request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatedTimesheet {
    /// Calculated entries, in input order.
    pub entries: Vec<CalculatedEntry>,
    /// Per-day break deductions, ordered by employee then date.
    pub adjustments: Vec<DailyBreakAdjustment>,
}

impl CalculatedTimesheet {
    /// Net hours across all entries after day-level deductions.
    pub fn total_net_hours(&self) -> Decimal {
        let entries: Decimal = self.entries.iter().map(|e| e.net_hours).sum();
        let adjustments: Decimal = self.adjustments.iter().map(|a| a.hours).sum();
        entries - adjustments
    }

    /// Pay across all entries after day-level deductions.
    pub fn total_pay(&self) -> Decimal {
        let entries: Decimal = self.entries.iter().map(|e| e.total_pay).sum();
        let adjustments: Decimal = self.adjustments.iter().map(|a| a.pay).sum();
        entries - adjustments
    }
}
