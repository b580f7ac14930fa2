//! Core data models for the timesheet engine.
//!
//! This module contains the raw inputs (time entries, break rules, rate
//! overrides, pay periods) and the derived values the engine produces.

mod break_rule;
mod calculated_entry;
mod export_views;
mod pay_period;
mod time_entry;

pub use break_rule::{BreakCalculationMode, BreakRule, BreakRuleError, BreakRuleSet, BreakSettings};
pub use calculated_entry::{CalculatedEntry, CalculatedTimesheet, DailyBreakAdjustment};
pub use export_views::{
    EmployeeSummary, ExportViews, PayrollBucket, PivotColumn, PivotRow, PivotTable,
};
pub use pay_period::PayPeriod;
pub use time_entry::{
    HOURS_SCALE, MAX_HOURLY_RATE, RateOverride, TimeEntry, UNCATEGORIZED, hours_from_millis,
    hours_from_minutes,
};
