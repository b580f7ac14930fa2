//! Payroll-file grouping.
//!
//! The payroll importer wants one row per employee, date and category
//! rather than one per clock session.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{CalculatedTimesheet, HOURS_SCALE, PayrollBucket};

use super::aggregation::{compare_categories, compare_employees};

/// Groups calculated entries into `(employee, date, category name)` buckets.
///
/// Sessions in a bucket have their net hours summed before the rate is
/// applied, and the bucket carries the pay period label of its date. A
/// per-day break deduction is spread over that day's buckets in proportion
/// to their net hours, so the buckets reconcile with the summary totals.
///
/// Rows are sorted by employee display name, date, then category.
pub fn group_payroll_buckets(timesheet: &CalculatedTimesheet) -> Vec<PayrollBucket> {
    let days = timesheet.entries.iter().fold(
        BTreeMap::<(&str, NaiveDate), BTreeMap<&str, PayrollBucket>>::new(),
        |mut acc, entry| {
            let bucket = acc
                .entry((entry.employee_id.as_str(), entry.date))
                .or_default()
                .entry(entry.category_name.as_str())
                .or_insert_with(|| PayrollBucket {
                    employee_id: entry.employee_id.clone(),
                    employee_name: entry.employee_name.clone(),
                    employee_email: entry.employee_email.clone(),
                    pay_period: entry.pay_period.clone(),
                    date: entry.date,
                    category_name: entry.category_name.clone(),
                    net_hours: Decimal::ZERO,
                    rate: entry.effective_rate,
                    amount: Decimal::ZERO,
                });
            if bucket.rate != entry.effective_rate {
                warn!(
                    employee_id = %entry.employee_id,
                    date = %entry.date,
                    category = %entry.category_name,
                    bucket_rate = %bucket.rate,
                    entry_rate = %entry.effective_rate,
                    "Entries in one payroll bucket have different rates, keeping the first"
                );
            }
            bucket.net_hours += entry.net_hours;
            acc
        },
    );

    let day_breaks = timesheet.adjustments.iter().fold(
        HashMap::<(&str, NaiveDate), Decimal>::new(),
        |mut acc, adjustment| {
            *acc.entry((adjustment.employee_id.as_str(), adjustment.date))
                .or_default() += adjustment.hours;
            acc
        },
    );

    let mut buckets: Vec<PayrollBucket> = days
        .into_iter()
        .flat_map(|(day, categories)| {
            let mut buckets: Vec<PayrollBucket> = categories.into_values().collect();
            if let Some(&hours) = day_breaks.get(&day) {
                apportion_day_break(&mut buckets, hours);
            }
            buckets
        })
        .map(|bucket| PayrollBucket {
            amount: bucket.net_hours * bucket.rate,
            ..bucket
        })
        .collect();

    buckets.sort_by(|a, b| {
        compare_employees(&a.employee_name, &a.employee_id, &b.employee_name, &b.employee_id)
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| compare_categories(&a.category_name, &b.category_name))
    });
    buckets
}

/// Removes `hours` from one day's buckets in proportion to their net hours.
///
/// The last bucket absorbs the rounding residue so that exactly `hours`
/// is removed in total.
fn apportion_day_break(day: &mut [PayrollBucket], hours: Decimal) {
    let day_net: Decimal = day.iter().map(|bucket| bucket.net_hours).sum();
    if day_net <= Decimal::ZERO {
        return;
    }
    let Some((last, rest)) = day.split_last_mut() else {
        return;
    };

    let assigned = rest.iter_mut().fold(Decimal::ZERO, |assigned, bucket| {
        let share = (hours * bucket.net_hours / day_net).round_dp(HOURS_SCALE);
        bucket.net_hours -= share;
        assigned + share
    });
    last.net_hours -= hours - assigned;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{RateResolver, calculate_timesheet};
    use crate::models::{
        BreakCalculationMode, BreakRule, BreakRuleSet, BreakSettings, TimeEntry,
    };
    use chrono::{DateTime, Duration, FixedOffset};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn create_entry(
        id: &str,
        employee: &str,
        category: (&str, &str),
        clock_in: &str,
        clock_out: &str,
        break_minutes: u32,
    ) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            employee_id: format!("emp_{}", employee.to_lowercase()),
            employee_name: employee.to_string(),
            employee_email: format!("{}@example.com", employee.to_lowercase()),
            clock_in: make_datetime(clock_in),
            clock_out: Some(make_datetime(clock_out)),
            total_break_minutes: break_minutes,
            category_id: Some(format!("cat_{}", category.0.to_lowercase())),
            category_name: Some(category.0.to_string()),
            category_rate: Some(dec(category.1)),
            location_id: None,
            location_name: None,
        }
    }

    fn per_day_settings() -> BreakSettings {
        BreakSettings {
            rules: BreakRuleSet::new(vec![BreakRule {
                min_hours: dec("6"),
                break_minutes: 30,
            }]),
            mode: BreakCalculationMode::PerDay,
            ..Default::default()
        }
    }

    fn buckets_for(entries: &[TimeEntry], settings: &BreakSettings) -> Vec<PayrollBucket> {
        let timesheet = calculate_timesheet(entries, settings, &RateResolver::default(), &[]);
        group_payroll_buckets(&timesheet)
    }

    /// PB-001: two sessions in one category on one day become one row
    #[test]
    fn test_sessions_merge_into_one_bucket() {
        let entries = vec![
            create_entry(
                "te_1",
                "Alex",
                ("Bar", "12.00"),
                "2024-01-15T08:00:00+00:00",
                "2024-01-15T10:00:00+00:00",
                0,
            ),
            create_entry(
                "te_2",
                "Alex",
                ("Bar", "12.00"),
                "2024-01-15T11:00:00+00:00",
                "2024-01-15T12:30:00+00:00",
                0,
            ),
        ];
        let buckets = buckets_for(&entries, &BreakSettings::default());

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].net_hours, dec("3.5"));
        assert_eq!(buckets[0].rate, dec("12.00"));
        assert_eq!(buckets[0].amount, dec("42.00"));
        assert_eq!(buckets[0].pay_period, "January 2024");
    }

    #[test]
    fn test_buckets_split_by_category_and_date() {
        let entries = vec![
            create_entry(
                "te_1",
                "Alex",
                ("Coaching", "20.00"),
                "2024-01-15T13:00:00+00:00",
                "2024-01-15T17:00:00+00:00",
                15,
            ),
            create_entry(
                "te_2",
                "Alex",
                ("Bar", "12.00"),
                "2024-01-15T08:00:00+00:00",
                "2024-01-15T12:00:00+00:00",
                15,
            ),
            create_entry(
                "te_3",
                "Alex",
                ("Bar", "12.00"),
                "2024-01-16T08:00:00+00:00",
                "2024-01-16T10:00:00+00:00",
                0,
            ),
        ];
        let buckets = buckets_for(&entries, &BreakSettings::default());

        let keys: Vec<(String, String)> = buckets
            .iter()
            .map(|b| (b.date.to_string(), b.category_name.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01-15".to_string(), "Bar".to_string()),
                ("2024-01-15".to_string(), "Coaching".to_string()),
                ("2024-01-16".to_string(), "Bar".to_string()),
            ]
        );
        assert_eq!(buckets[0].amount, dec("45.00"));
        assert_eq!(buckets[1].amount, dec("75.00"));
    }

    #[test]
    fn test_day_break_apportioned_across_buckets() {
        let entries = vec![
            create_entry(
                "te_1",
                "Sam",
                ("Bar", "10.00"),
                "2024-01-15T08:00:00+00:00",
                "2024-01-15T11:00:00+00:00",
                0,
            ),
            create_entry(
                "te_2",
                "Sam",
                ("Coaching", "20.00"),
                "2024-01-15T12:00:00+00:00",
                "2024-01-15T16:00:00+00:00",
                0,
            ),
        ];
        let buckets = buckets_for(&entries, &per_day_settings());

        assert_eq!(buckets.len(), 2);
        let total: Decimal = buckets.iter().map(|b| b.net_hours).sum();
        assert_eq!(total, dec("6.5"));
        assert!(buckets[0].net_hours < dec("3"));
        assert!(buckets[1].net_hours < dec("4"));
        assert!(dec("3") - buckets[0].net_hours < dec("4") - buckets[1].net_hours);
    }

    #[test]
    fn test_single_bucket_absorbs_whole_day_break() {
        let entries = vec![create_entry(
            "te_1",
            "Sam",
            ("Bar", "10.00"),
            "2024-01-15T08:00:00+00:00",
            "2024-01-15T15:00:00+00:00",
            0,
        )];
        let buckets = buckets_for(&entries, &per_day_settings());

        assert_eq!(buckets[0].net_hours, dec("6.5"));
        assert_eq!(buckets[0].amount, dec("65.00"));
    }

    #[test]
    fn test_empty_timesheet_has_no_buckets() {
        assert!(group_payroll_buckets(&CalculatedTimesheet::default()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_buckets_reconcile_with_timesheet_hours(
            specs in prop::collection::vec((0usize..3, 0usize..3, 0i64..2880, 0i64..600), 0..30),
        ) {
            const CATEGORIES: [(&str, &str); 3] = [("Bar", "12.00"), ("Coaching", "20.00"), ("Admin", "15.50")];
            let base = make_datetime("2024-01-15T06:00:00+00:00");
            let entries: Vec<TimeEntry> = specs
                .iter()
                .enumerate()
                .map(|(index, &(employee, category, start, length))| {
                    let clock_in = base + Duration::minutes(start);
                    let clock_out = clock_in + Duration::minutes(length);
                    create_entry(
                        &format!("te_{index}"),
                        &format!("Employee{employee}"),
                        CATEGORIES[category],
                        &clock_in.to_rfc3339(),
                        &clock_out.to_rfc3339(),
                        0,
                    )
                })
                .collect();

            let timesheet = calculate_timesheet(&entries, &per_day_settings(), &RateResolver::default(), &[]);
            let buckets = group_payroll_buckets(&timesheet);

            let bucket_hours: Decimal = buckets.iter().map(|b| b.net_hours).sum();
            prop_assert_eq!(bucket_hours, timesheet.total_net_hours());

            let bucket_pay: Decimal = buckets.iter().map(|b| b.amount).sum();
            prop_assert!((bucket_pay - timesheet.total_pay()).abs() < dec("0.000001"));
        }
    }
}
