//! Raw time entry model.
//!
//! A [`TimeEntry`] is one clock-in/clock-out record as loaded by the
//! persistence layer, denormalized with the employee, category and location
//! fields the exports display.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display name used for entries with no pay category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Decimal places hours are carried at (about 3.6ns of resolution).
///
/// Hour values are fixed-scale so that sums over them are exact and
/// independent of summation order.
pub const HOURS_SCALE: u32 = 12;

/// Highest hourly rate an export accepts, from either a category or an
/// override. Keeps `hours * rate` and its sums inside `Decimal` range.
pub const MAX_HOURLY_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Converts elapsed milliseconds into hours at [`HOURS_SCALE`].
pub fn hours_from_millis(millis: i64) -> Decimal {
    (Decimal::new(millis, 0) / Decimal::from(3_600_000)).round_dp(HOURS_SCALE)
}

/// Converts minutes into hours at [`HOURS_SCALE`].
pub fn hours_from_minutes(minutes: u32) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(HOURS_SCALE)
}

/// A single clock session for an employee.
///
/// Timestamps carry their UTC offset so that the elapsed time between
/// clock-in and clock-out is computed in one reference frame, while the
/// work date is taken from the clock-in's own local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who worked the entry.
    pub employee_id: String,
    /// The employee's display name.
    #[serde(default)]
    pub employee_name: String,
    /// The employee's email address.
    #[serde(default)]
    pub employee_email: String,
    /// When the employee clocked in.
    pub clock_in: DateTime<FixedOffset>,
    /// When the employee clocked out. `None` while the entry is still open.
    #[serde(default)]
    pub clock_out: Option<DateTime<FixedOffset>>,
    /// Break minutes recorded against the entry.
    #[serde(default)]
    pub total_break_minutes: u32,
    /// Pay category id, if the entry was categorized.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Pay category display name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// The category's default hourly rate.
    #[serde(default)]
    pub category_rate: Option<Decimal>,
    /// The site the entry was worked at.
    #[serde(default)]
    pub location_id: Option<String>,
    /// The site's display name.
    #[serde(default)]
    pub location_name: Option<String>,
}

impl TimeEntry {
    /// The calendar day the entry belongs to: the clock-in's local date.
    ///
    /// An overnight entry belongs to the day it started.
    ///
    /// ```
    /// use timesheet_engine::models::TimeEntry;
    /// use chrono::{DateTime, NaiveDate};
    ///
    /// let entry = TimeEntry {
    ///     id: "te_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     employee_name: "Alex".to_string(),
    ///     employee_email: "alex@example.com".to_string(),
    ///     clock_in: DateTime::parse_from_rfc3339("2024-01-15T22:00:00+00:00").unwrap(),
    ///     clock_out: Some(DateTime::parse_from_rfc3339("2024-01-16T06:00:00+00:00").unwrap()),
    ///     total_break_minutes: 0,
    ///     category_id: None,
    ///     category_name: None,
    ///     category_rate: None,
    ///     location_id: None,
    ///     location_name: None,
    /// };
    /// assert_eq!(entry.work_date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    /// ```
    pub fn work_date(&self) -> NaiveDate {
        self.clock_in.date_naive()
    }

    /// Elapsed hours between clock-in and clock-out, to the millisecond.
    ///
    /// Returns `None` for open entries and for entries whose clock-out
    /// precedes clock-in; neither has gross hours.
    pub fn gross_hours(&self) -> Option<Decimal> {
        let clock_out = self.clock_out?;
        let millis = (clock_out - self.clock_in).num_milliseconds();
        if millis < 0 {
            return None;
        }
        Some(hours_from_millis(millis))
    }

    /// The category name shown in exports.
    pub fn category_label(&self) -> &str {
        match (&self.category_id, &self.category_name) {
            (Some(_), Some(name)) if !name.trim().is_empty() => name,
            (Some(id), _) => id,
            (None, _) => UNCATEGORIZED,
        }
    }

    /// The employee name shown in exports, falling back to email then id.
    pub fn display_name(&self) -> &str {
        if !self.employee_name.trim().is_empty() {
            &self.employee_name
        } else if !self.employee_email.trim().is_empty() {
            &self.employee_email
        } else {
            &self.employee_id
        }
    }
}

/// An employee-specific hourly rate for one pay category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverride {
    /// The employee the override applies to.
    pub employee_id: String,
    /// The category the override applies to.
    pub category_id: String,
    /// The overriding hourly rate.
    pub hourly_rate: Decimal,
}
