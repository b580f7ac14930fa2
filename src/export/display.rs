//! Presentation formatting shared by the writers.
//!
//! Calculated values stay unrounded up to this point; these helpers are the
//! only place hours and money are rounded to two decimals.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimals, half away from zero, at a fixed scale of 2.
///
/// A value that rounds to zero comes back as a plain `0.00`, never `-0.00`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded
}

/// Formats hours or a rate with two decimals, e.g. `3.75`.
pub fn decimal_2dp(value: Decimal) -> String {
    round2(value).to_string()
}

/// Formats an amount with the currency symbol, e.g. `£45.00` or `-£8.00`.
pub fn money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = round2(value);
    if rounded.is_sign_negative() {
        format!("-{currency_symbol}{}", rounded.abs())
    } else {
        format!("{currency_symbol}{rounded}")
    }
}

/// Formats a date as `dd/mm/yyyy`.
pub fn date(value: NaiveDate) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Formats a timestamp's local time as `HH:MM`.
pub fn time(value: DateTime<FixedOffset>) -> String {
    value.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(decimal_2dp(dec("2.345")), "2.35");
        assert_eq!(decimal_2dp(dec("-2.345")), "-2.35");
        assert_eq!(decimal_2dp(dec("2.344999")), "2.34");
    }

    #[test]
    fn test_round2_pads_to_two_places() {
        assert_eq!(decimal_2dp(dec("7.5")), "7.50");
        assert_eq!(decimal_2dp(dec("4")), "4.00");
        assert_eq!(decimal_2dp(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_round2_never_negative_zero() {
        assert_eq!(decimal_2dp(dec("-0.000000000001")), "0.00");
        assert_eq!(money(dec("-0.001"), "£"), "£0.00");
    }

    #[test]
    fn test_money_with_symbol() {
        assert_eq!(money(dec("120"), "£"), "£120.00");
        assert_eq!(money(dec("3.33333333333330"), "$"), "$3.33");
        assert_eq!(money(dec("-8"), "£"), "-£8.00");
    }

    #[test]
    fn test_date_and_time_formats() {
        let date_value = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date(date_value), "05/01/2024");

        let timestamp = DateTime::parse_from_rfc3339("2024-01-05T08:05:00+10:00").unwrap();
        assert_eq!(time(timestamp), "08:05");
    }
}
