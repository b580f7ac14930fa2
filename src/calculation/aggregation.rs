//! Export aggregation.
//!
//! Folds a [`CalculatedTimesheet`] into the detail, summary and pivot views
//! plus the payroll buckets. Each view is a fold over the immutable input;
//! nothing here reads the clock or any state outside its arguments.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::models::{
    CalculatedEntry, CalculatedTimesheet, EmployeeSummary, ExportViews, PivotColumn, PivotRow,
    PivotTable,
};

use super::payroll_grouping::group_payroll_buckets;

/// Builds every export view from a calculated timesheet.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::aggregate;
/// use timesheet_engine::models::CalculatedTimesheet;
///
/// let views = aggregate(&CalculatedTimesheet::default());
/// assert!(views.detail.is_empty());
/// assert!(views.summary.is_empty());
/// assert!(views.pivot.columns.is_empty());
/// assert!(views.payroll.is_empty());
/// ```
pub fn aggregate(timesheet: &CalculatedTimesheet) -> ExportViews {
    ExportViews {
        detail: detail_rows(&timesheet.entries),
        summary: summarize_employees(timesheet),
        pivot: build_pivot(timesheet),
        payroll: group_payroll_buckets(timesheet),
    }
}

/// Orders employees by display name, case-insensitively, with the raw name
/// and then the id as tie-breakers so the order is total.
pub(crate) fn compare_employees(a_name: &str, a_id: &str, b_name: &str, b_id: &str) -> Ordering {
    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then_with(|| a_name.cmp(b_name))
        .then_with(|| a_id.cmp(b_id))
}

/// Orders category names case-insensitively, raw name as tie-breaker.
pub(crate) fn compare_categories(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn detail_rows(entries: &[CalculatedEntry]) -> Vec<CalculatedEntry> {
    let mut rows = entries.to_vec();
    rows.sort_by(|a, b| {
        compare_employees(&a.employee_name, &a.employee_id, &b.employee_name, &b.employee_id)
            .then_with(|| a.clock_in.cmp(&b.clock_in))
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });
    rows
}

fn summarize_employees(timesheet: &CalculatedTimesheet) -> Vec<EmployeeSummary> {
    let by_employee = timesheet.entries.iter().fold(
        BTreeMap::<&str, EmployeeSummary>::new(),
        |mut acc, entry| {
            let summary = acc
                .entry(entry.employee_id.as_str())
                .or_insert_with(|| EmployeeSummary {
                    employee_id: entry.employee_id.clone(),
                    employee_name: entry.employee_name.clone(),
                    employee_email: entry.employee_email.clone(),
                    entry_count: 0,
                    gross_hours: Decimal::ZERO,
                    break_deduction_hours: Decimal::ZERO,
                    total_net_hours: Decimal::ZERO,
                    total_pay: Decimal::ZERO,
                });
            summary.entry_count += 1;
            summary.gross_hours += entry.gross_hours;
            summary.total_net_hours += entry.net_hours;
            summary.total_pay += entry.total_pay;
            acc
        },
    );

    let by_employee = timesheet
        .adjustments
        .iter()
        .fold(by_employee, |mut acc, adjustment| {
            if let Some(summary) = acc.get_mut(adjustment.employee_id.as_str()) {
                summary.break_deduction_hours += adjustment.hours;
                summary.total_net_hours -= adjustment.hours;
                summary.total_pay -= adjustment.pay;
            }
            acc
        });

    let mut summaries: Vec<EmployeeSummary> = by_employee.into_values().collect();
    summaries.sort_by(|a, b| {
        compare_employees(&a.employee_name, &a.employee_id, &b.employee_name, &b.employee_id)
    });
    summaries
}

fn build_pivot(timesheet: &CalculatedTimesheet) -> PivotTable {
    let mut categories: Vec<&str> = timesheet
        .entries
        .iter()
        .map(|entry| entry.category_name.as_str())
        .collect();
    categories.sort_by(|a, b| compare_categories(a, b));
    categories.dedup();

    let column_index: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index))
        .collect();

    let mut columns: Vec<PivotColumn> = categories
        .iter()
        .map(|name| PivotColumn::Category(name.to_string()))
        .collect();
    let breaks_column = if timesheet.adjustments.is_empty() {
        None
    } else {
        columns.push(PivotColumn::DailyBreaks);
        Some(columns.len() - 1)
    };
    let width = columns.len();

    let rows = timesheet.entries.iter().fold(
        BTreeMap::<&str, PivotRow>::new(),
        |mut acc, entry| {
            let row = acc
                .entry(entry.employee_id.as_str())
                .or_insert_with(|| PivotRow {
                    employee_id: entry.employee_id.clone(),
                    employee_name: entry.employee_name.clone(),
                    cells: vec![Decimal::ZERO; width],
                    total: Decimal::ZERO,
                });
            if let Some(&column) = column_index.get(entry.category_name.as_str()) {
                row.cells[column] += entry.net_hours;
            }
            acc
        },
    );

    let rows = match breaks_column {
        Some(column) => timesheet.adjustments.iter().fold(rows, |mut acc, adjustment| {
            if let Some(row) = acc.get_mut(adjustment.employee_id.as_str()) {
                row.cells[column] -= adjustment.hours;
            }
            acc
        }),
        None => rows,
    };

    let mut rows: Vec<PivotRow> = rows
        .into_values()
        .map(|row| PivotRow {
            total: row.cells.iter().copied().sum(),
            ..row
        })
        .collect();
    rows.sort_by(|a, b| {
        compare_employees(&a.employee_name, &a.employee_id, &b.employee_name, &b.employee_id)
    });

    let column_totals: Vec<Decimal> = (0..width)
        .map(|column| rows.iter().map(|row| row.cells[column]).sum())
        .collect();
    let grand_total = column_totals.iter().copied().sum();

    PivotTable {
        columns,
        rows,
        column_totals,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{RateResolver, calculate_timesheet};
    use crate::models::{
        BreakCalculationMode, BreakRule, BreakRuleSet, BreakSettings, DailyBreakAdjustment,
        TimeEntry,
    };
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn calculated(
        id: &str,
        employee: &str,
        category: &str,
        clock_in: &str,
        net: &str,
        rate: &str,
    ) -> CalculatedEntry {
        let clock_in = make_datetime(clock_in);
        CalculatedEntry {
            entry_id: id.to_string(),
            employee_id: format!("emp_{}", employee.to_lowercase()),
            employee_name: employee.to_string(),
            employee_email: format!("{}@example.com", employee.to_lowercase()),
            date: clock_in.date_naive(),
            clock_in,
            clock_out: clock_in + Duration::hours(4),
            location_name: None,
            category_id: Some(format!("cat_{}", category.to_lowercase())),
            category_name: category.to_string(),
            break_minutes: 0,
            gross_hours: dec(net),
            net_hours: dec(net),
            effective_rate: dec(rate),
            total_pay: dec(net) * dec(rate),
            pay_period: "January 2024".to_string(),
        }
    }

    fn alex_timesheet() -> CalculatedTimesheet {
        CalculatedTimesheet {
            entries: vec![
                calculated("te_2", "Alex", "Coaching", "2024-01-15T13:00:00+00:00", "3.75", "20.00"),
                calculated("te_1", "Alex", "Bar", "2024-01-15T08:00:00+00:00", "3.75", "12.00"),
            ],
            adjustments: Vec::new(),
        }
    }

    /// AG-001: summary and pivot for the Alex day
    #[test]
    fn test_alex_summary_and_pivot() {
        let views = aggregate(&alex_timesheet());

        assert_eq!(views.summary.len(), 1);
        let summary = &views.summary[0];
        assert_eq!(summary.employee_name, "Alex");
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.total_net_hours, dec("7.5"));
        assert_eq!(summary.total_pay, dec("120.00"));

        let pivot = &views.pivot;
        assert_eq!(
            pivot.columns,
            vec![
                PivotColumn::Category("Bar".to_string()),
                PivotColumn::Category("Coaching".to_string()),
            ]
        );
        assert_eq!(pivot.rows[0].cells, vec![dec("3.75"), dec("3.75")]);
        assert_eq!(pivot.rows[0].total, dec("7.5"));
        assert_eq!(pivot.grand_total, dec("7.5"));
    }

    #[test]
    fn test_detail_sorted_by_name_then_clock_in() {
        let mut timesheet = alex_timesheet();
        timesheet.entries.push(calculated(
            "te_3",
            "beth",
            "Bar",
            "2024-01-14T08:00:00+00:00",
            "2",
            "12.00",
        ));
        timesheet.entries.push(calculated(
            "te_4",
            "Aaron",
            "Bar",
            "2024-01-16T08:00:00+00:00",
            "2",
            "12.00",
        ));

        let ids: Vec<String> = aggregate(&timesheet)
            .detail
            .into_iter()
            .map(|entry| entry.entry_id)
            .collect();
        assert_eq!(ids, vec!["te_4", "te_1", "te_2", "te_3"]);
    }

    #[test]
    fn test_pivot_columns_sorted_case_insensitively() {
        let timesheet = CalculatedTimesheet {
            entries: vec![
                calculated("te_1", "Alex", "bar", "2024-01-15T08:00:00+00:00", "1", "10"),
                calculated("te_2", "Alex", "Admin", "2024-01-15T10:00:00+00:00", "1", "10"),
                calculated("te_3", "Alex", "Coaching", "2024-01-15T12:00:00+00:00", "1", "10"),
            ],
            adjustments: Vec::new(),
        };
        let headers: Vec<String> = aggregate(&timesheet)
            .pivot
            .columns
            .iter()
            .map(|column| column.header().to_string())
            .collect();
        assert_eq!(headers, vec!["Admin", "bar", "Coaching"]);
    }

    #[test]
    fn test_pivot_zero_cells_for_unworked_categories() {
        let timesheet = CalculatedTimesheet {
            entries: vec![
                calculated("te_1", "Alex", "Bar", "2024-01-15T08:00:00+00:00", "2", "10"),
                calculated("te_2", "Sam", "Coaching", "2024-01-15T08:00:00+00:00", "3", "10"),
            ],
            adjustments: Vec::new(),
        };
        let pivot = aggregate(&timesheet).pivot;
        assert_eq!(pivot.rows[0].cells, vec![dec("2"), Decimal::ZERO]);
        assert_eq!(pivot.rows[1].cells, vec![Decimal::ZERO, dec("3")]);
        assert_eq!(pivot.column_totals, vec![dec("2"), dec("3")]);
        assert_eq!(pivot.grand_total, dec("5"));
    }

    #[test]
    fn test_day_adjustments_reduce_summary_and_add_pivot_column() {
        let mut timesheet = alex_timesheet();
        timesheet.adjustments.push(DailyBreakAdjustment {
            employee_id: "emp_alex".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            minutes: 30,
            hours: dec("0.5"),
            pay: dec("8.00"),
        });
        let views = aggregate(&timesheet);

        let summary = &views.summary[0];
        assert_eq!(summary.break_deduction_hours, dec("0.5"));
        assert_eq!(summary.total_net_hours, dec("7"));
        assert_eq!(summary.total_pay, dec("112.00"));

        let pivot = &views.pivot;
        assert_eq!(pivot.columns.last(), Some(&PivotColumn::DailyBreaks));
        assert_eq!(pivot.rows[0].cells[2], dec("-0.5"));
        assert_eq!(pivot.rows[0].total, dec("7"));
        assert_eq!(pivot.grand_total, dec("7"));
    }

    #[test]
    fn test_empty_timesheet_has_empty_views() {
        let views = aggregate(&CalculatedTimesheet::default());
        assert_eq!(views, ExportViews::default());
    }

    fn entry_strategy() -> impl Strategy<Value = (usize, usize, i64, i64, u32)> {
        (0usize..4, 0usize..4, 0i64..2 * 24 * 60, 0i64..10 * 60, 0u32..90)
    }

    fn build_entries(specs: &[(usize, usize, i64, i64, u32)]) -> Vec<TimeEntry> {
        const EMPLOYEES: [&str; 4] = ["Alex", "beth", "Chris", "Dana"];
        const CATEGORIES: [(&str, &str); 4] =
            [("Bar", "12.00"), ("Coaching", "20.00"), ("admin", "15.50"), ("Cleaning", "11.25")];
        let base = make_datetime("2024-01-15T06:00:00+00:00");

        specs
            .iter()
            .enumerate()
            .map(|(index, &(employee, category, start, length, break_minutes))| {
                let clock_in = base + Duration::minutes(start);
                TimeEntry {
                    id: format!("te_{index}"),
                    employee_id: format!("emp_{employee}"),
                    employee_name: EMPLOYEES[employee].to_string(),
                    employee_email: String::new(),
                    clock_in,
                    clock_out: Some(clock_in + Duration::minutes(length)),
                    total_break_minutes: break_minutes,
                    category_id: Some(format!("cat_{category}")),
                    category_name: Some(CATEGORIES[category].0.to_string()),
                    category_rate: Some(dec(CATEGORIES[category].1)),
                    location_id: None,
                    location_name: None,
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_pivot_totals_are_consistent(
            specs in prop::collection::vec(entry_strategy(), 0..40),
            per_day in any::<bool>(),
        ) {
            let settings = BreakSettings {
                rules: BreakRuleSet::new(vec![
                    BreakRule { min_hours: dec("4"), break_minutes: 15 },
                    BreakRule { min_hours: dec("6"), break_minutes: 30 },
                ]),
                mode: if per_day { BreakCalculationMode::PerDay } else { BreakCalculationMode::PerShift },
                ..Default::default()
            };
            let timesheet = calculate_timesheet(
                &build_entries(&specs),
                &settings,
                &RateResolver::default(),
                &[],
            );
            let pivot = aggregate(&timesheet).pivot;

            let cell_sum: Decimal = pivot.rows.iter().flat_map(|row| row.cells.iter().copied()).sum();
            let row_sum: Decimal = pivot.rows.iter().map(|row| row.total).sum();
            let column_sum: Decimal = pivot.column_totals.iter().copied().sum();

            prop_assert_eq!(pivot.grand_total, cell_sum);
            prop_assert_eq!(pivot.grand_total, row_sum);
            prop_assert_eq!(pivot.grand_total, column_sum);
            prop_assert_eq!(pivot.grand_total, timesheet.total_net_hours());
        }

        #[test]
        fn prop_summary_matches_timesheet_totals(
            specs in prop::collection::vec(entry_strategy(), 0..40),
        ) {
            let settings = BreakSettings {
                rules: BreakRuleSet::new(vec![BreakRule { min_hours: dec("6"), break_minutes: 30 }]),
                mode: BreakCalculationMode::PerDay,
                ..Default::default()
            };
            let timesheet = calculate_timesheet(
                &build_entries(&specs),
                &settings,
                &RateResolver::default(),
                &[],
            );
            let summary = aggregate(&timesheet).summary;

            let net: Decimal = summary.iter().map(|s| s.total_net_hours).sum();
            let pay: Decimal = summary.iter().map(|s| s.total_pay).sum();
            prop_assert_eq!(net, timesheet.total_net_hours());
            prop_assert_eq!(pay, timesheet.total_pay());
        }
    }
}
