//! Payroll flat file output, in the column layout the Xero timesheet
//! importer expects.
//!
//! Column order and number formatting are an import contract: amounts are
//! plain two-decimal numbers with no currency symbol.

use crate::error::EngineResult;
use crate::models::PayrollBucket;

use super::delimited::write_table;
use super::display;

/// Payroll file headers, in column order.
pub const PAYROLL_HEADER: &[&str] = &[
    "Employee Name",
    "Employee Email",
    "Pay Period",
    "Date",
    "Category",
    "Hours",
    "Rate",
    "Amount",
];

fn bucket_row(bucket: &PayrollBucket) -> Vec<String> {
    vec![
        bucket.employee_name.clone(),
        bucket.employee_email.clone(),
        bucket.pay_period.clone(),
        display::date(bucket.date),
        bucket.category_name.clone(),
        display::decimal_2dp(bucket.net_hours),
        display::decimal_2dp(bucket.rate),
        display::decimal_2dp(bucket.amount),
    ]
}

/// Writes one row per payroll bucket. An empty slice yields the header only.
pub fn write_payroll_file(buckets: &[PayrollBucket]) -> EngineResult<Vec<u8>> {
    write_table(PAYROLL_HEADER, buckets.iter().map(bucket_row))
}
