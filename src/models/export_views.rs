//! Aggregated export views.
//!
//! The aggregation stage turns a [`CalculatedTimesheet`](super::CalculatedTimesheet)
//! into these views; the formatters only read them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculatedEntry;

/// Per-employee totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// The employee id.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The employee's email address.
    pub employee_email: String,
    /// Number of entries included.
    pub entry_count: usize,
    /// Sum of gross hours.
    pub gross_hours: Decimal,
    /// Hours removed by per-day break deductions.
    pub break_deduction_hours: Decimal,
    /// Sum of net hours less per-day deductions.
    pub total_net_hours: Decimal,
    /// Sum of pay less per-day deductions.
    pub total_pay: Decimal,
}

/// A column of the pivot table, before the trailing total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum PivotColumn {
    /// Net hours worked in one pay category.
    Category(String),
    /// Per-day break deductions (negative hours).
    DailyBreaks,
}

impl PivotColumn {
    /// The column header.
    pub fn header(&self) -> &str {
        match self {
            PivotColumn::Category(name) => name,
            PivotColumn::DailyBreaks => "Daily Breaks",
        }
    }
}

/// One employee row of the pivot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    /// The employee id.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// Hours per column, aligned with [`PivotTable::columns`].
    pub cells: Vec<Decimal>,
    /// Sum of `cells`.
    pub total: Decimal,
}

/// Net hours per employee per category, with row and column totals.
///
/// The grand total equals the sum of all cells, the sum of row totals and
/// the sum of column totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Columns in display order, excluding the trailing "Total".
    pub columns: Vec<PivotColumn>,
    /// Employee rows sorted by display name.
    pub rows: Vec<PivotRow>,
    /// Per-column sums across all rows (the "TOTAL" row).
    pub column_totals: Vec<Decimal>,
    /// Sum of every cell.
    pub grand_total: Decimal,
}

/// One payroll-file row: an (employee, date, category) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBucket {
    /// The employee id.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The employee's email address.
    pub employee_email: String,
    /// The pay period label for `date`.
    pub pay_period: String,
    /// The work date.
    pub date: NaiveDate,
    /// The category display name.
    pub category_name: String,
    /// Summed net hours of the bucket's entries.
    pub net_hours: Decimal,
    /// The bucket's hourly rate.
    pub rate: Decimal,
    /// `net_hours * rate`.
    pub amount: Decimal,
}

/// Every view an export can be rendered from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportViews {
    /// Entries sorted by employee display name, then clock-in.
    pub detail: Vec<CalculatedEntry>,
    /// Per-employee totals, sorted by display name.
    pub summary: Vec<EmployeeSummary>,
    /// Hours by employee and category.
    pub pivot: PivotTable,
    /// Payroll buckets, sorted by employee, date, category.
    pub payroll: Vec<PayrollBucket>,
}
