//! Time entry calculation.
//!
//! Turns one completed clock session plus its resolved rate and break into
//! gross hours, net hours and pay.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::models::{CalculatedEntry, TimeEntry, hours_from_millis, hours_from_minutes};

/// Net hours for a gross duration and a break, floored at zero.
///
/// ```
/// use timesheet_engine::calculation::net_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(net_hours(Decimal::new(4, 0), 15), Decimal::new(375, 2));
/// assert_eq!(net_hours(Decimal::new(1, 0), 120), Decimal::ZERO);
/// ```
pub fn net_hours(gross_hours: Decimal, break_minutes: u32) -> Decimal {
    (gross_hours - hours_from_minutes(break_minutes)).max(Decimal::ZERO)
}

/// Calculates hours and pay for one completed entry.
///
/// `clock_out` is the entry's clock-out; open entries are filtered out
/// before this point. Gross hours are the elapsed time between the two
/// offset-aware timestamps, so an entry spanning a UTC offset change is
/// measured correctly.
///
/// # Arguments
///
/// * `entry` - The raw entry
/// * `clock_out` - The entry's clock-out timestamp
/// * `effective_rate` - The rate from [`RateResolver`](super::RateResolver)
/// * `break_minutes` - The break deducted from this entry
/// * `pay_period` - The resolved pay period label
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::calculate_entry;
/// use timesheet_engine::models::TimeEntry;
/// use chrono::DateTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let clock_out = DateTime::parse_from_rfc3339("2024-01-15T12:00:00+00:00").unwrap();
/// let entry = TimeEntry {
///     id: "te_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     employee_name: "Alex".to_string(),
///     employee_email: "alex@example.com".to_string(),
///     clock_in: DateTime::parse_from_rfc3339("2024-01-15T08:00:00+00:00").unwrap(),
///     clock_out: Some(clock_out),
///     total_break_minutes: 15,
///     category_id: Some("cat_bar".to_string()),
///     category_name: Some("Bar".to_string()),
///     category_rate: Some(Decimal::from_str("12.00").unwrap()),
///     location_id: None,
///     location_name: None,
/// };
///
/// let calculated = calculate_entry(
///     &entry,
///     clock_out,
///     Decimal::from_str("12.00").unwrap(),
///     15,
///     "January 2024".to_string(),
/// );
/// assert_eq!(calculated.gross_hours, Decimal::from_str("4").unwrap());
/// assert_eq!(calculated.net_hours, Decimal::from_str("3.75").unwrap());
/// assert_eq!(calculated.total_pay, Decimal::from_str("45.00").unwrap());
/// ```
pub fn calculate_entry(
    entry: &TimeEntry,
    clock_out: DateTime<FixedOffset>,
    effective_rate: Decimal,
    break_minutes: u32,
    pay_period: String,
) -> CalculatedEntry {
    let gross_hours = hours_from_millis((clock_out - entry.clock_in).num_milliseconds().max(0));
    let net_hours = net_hours(gross_hours, break_minutes);

    CalculatedEntry {
        entry_id: entry.id.clone(),
        employee_id: entry.employee_id.clone(),
        employee_name: entry.display_name().to_string(),
        employee_email: entry.employee_email.clone(),
        date: entry.work_date(),
        clock_in: entry.clock_in,
        clock_out,
        location_name: entry.location_name.clone(),
        category_id: entry.category_id.clone(),
        category_name: entry.category_label().to_string(),
        break_minutes,
        gross_hours,
        net_hours,
        effective_rate,
        total_pay: net_hours * effective_rate,
        pay_period,
    }
}
