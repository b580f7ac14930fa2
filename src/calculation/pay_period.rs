//! Pay period labeling.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::PayPeriod;

/// Returns the pay period label for a work date.
///
/// Periods are scanned in the order supplied and the first one whose
/// inclusive range contains `date` wins; callers that allow overlapping
/// periods control the outcome through that order. When no period matches,
/// the label is the date's month and year, e.g. "January 2024".
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::resolve_pay_period_label;
/// use timesheet_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let periods = vec![PayPeriod {
///     name: "Week 3".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
///     pay_date: None,
/// }];
///
/// let inside = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
/// let outside = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
/// assert_eq!(resolve_pay_period_label(inside, &periods), "Week 3");
/// assert_eq!(resolve_pay_period_label(outside, &periods), "February 2024");
/// ```
pub fn resolve_pay_period_label(date: NaiveDate, periods: &[PayPeriod]) -> String {
    match periods.iter().find(|period| period.contains_date(date)) {
        Some(period) => period.name.clone(),
        None => {
            debug!(%date, "No pay period contains date, using month label");
            month_label(date)
        }
    }
}

/// The fallback label for a date: full month name and year.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(name: &str, start: NaiveDate, end: NaiveDate) -> PayPeriod {
        PayPeriod {
            name: name.to_string(),
            start_date: start,
            end_date: end,
            pay_date: None,
        }
    }

    #[test]
    fn test_inclusive_boundaries_match() {
        let periods = vec![period("Jan A", date(2024, 1, 1), date(2024, 1, 14))];
        assert_eq!(resolve_pay_period_label(date(2024, 1, 1), &periods), "Jan A");
        assert_eq!(resolve_pay_period_label(date(2024, 1, 14), &periods), "Jan A");
    }

    #[test]
    fn test_overlapping_periods_first_in_input_order_wins() {
        let periods = vec![
            period("Monthly", date(2024, 1, 1), date(2024, 1, 31)),
            period("Fortnight", date(2024, 1, 8), date(2024, 1, 21)),
        ];
        assert_eq!(resolve_pay_period_label(date(2024, 1, 10), &periods), "Monthly");

        let reversed: Vec<PayPeriod> = periods.into_iter().rev().collect();
        assert_eq!(resolve_pay_period_label(date(2024, 1, 10), &reversed), "Fortnight");
    }

    #[test]
    fn test_gap_between_periods_falls_back_to_month() {
        let periods = vec![
            period("Jan A", date(2024, 1, 1), date(2024, 1, 10)),
            period("Jan B", date(2024, 1, 20), date(2024, 1, 31)),
        ];
        assert_eq!(resolve_pay_period_label(date(2024, 1, 15), &periods), "January 2024");
    }

    #[test]
    fn test_no_periods_falls_back_to_month() {
        assert_eq!(resolve_pay_period_label(date(2023, 12, 31), &[]), "December 2023");
    }

    #[test]
    fn test_month_label_is_date_derived() {
        assert_eq!(month_label(date(2024, 2, 29)), "February 2024");
    }
}
