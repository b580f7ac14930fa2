//! Calculation logic for the timesheet engine.
//!
//! The pipeline runs leaf-first: break rules are resolved per site and
//! applied per shift or per day, rates are resolved per employee and
//! category, each completed entry is turned into hours and pay, and the
//! calculated timesheet is aggregated into the export views.

mod aggregation;
mod break_resolver;
mod entry_calculator;
mod pay_period;
mod payroll_grouping;
mod rate_resolver;
mod timesheet;

pub use aggregation::aggregate;
pub use break_resolver::{
    BreakAllocation, EffectiveBreakRules, RuleScope, effective_rules_for_location,
    resolve_break_rules, resolve_breaks,
};
pub use entry_calculator::{calculate_entry, net_hours};
pub use pay_period::{month_label, resolve_pay_period_label};
pub use payroll_grouping::group_payroll_buckets;
pub use rate_resolver::RateResolver;
pub use timesheet::calculate_timesheet;
