//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type: an organization-defined,
//! inclusive date range used to bucket hours for payroll cut-offs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a named pay period.
///
/// Periods of one organization may overlap or leave gaps; the engine does
/// not enforce a partition. Lookups take the first containing period in
/// the order the periods were supplied.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     name: "January Week 3".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
///     pay_date: None,
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 22).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The label printed on payroll rows.
    pub name: String,
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
    /// The date the period is paid, if scheduled.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period, inclusive of
    /// both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks the `end_date >= start_date` invariant.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidPayPeriod {
                name: self.name.clone(),
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        Ok(())
    }
}
