//! Timesheet calculation.
//!
//! Runs every completed entry of an export through break resolution, rate
//! resolution and entry calculation, and derives the per-day break
//! deductions of per-day mode.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    BreakCalculationMode, BreakSettings, CalculatedEntry, CalculatedTimesheet,
    DailyBreakAdjustment, HOURS_SCALE, PayPeriod, TimeEntry, hours_from_minutes,
};

use super::break_resolver::{effective_rules_for_location, resolve_breaks};
use super::entry_calculator::calculate_entry;
use super::pay_period::resolve_pay_period_label;
use super::rate_resolver::RateResolver;

/// A completed entry with its clock-out and gross hours unwrapped.
struct ClosedEntry<'a> {
    entry: &'a TimeEntry,
    clock_out: DateTime<FixedOffset>,
    gross_hours: Decimal,
}

/// A per-day deduction still waiting for the day's calculated totals.
struct PendingDayBreak {
    employee_id: String,
    date: NaiveDate,
    minutes: u32,
    members: Vec<usize>,
}

/// Calculates hours and pay for a batch of raw entries.
///
/// Open entries and entries whose clock-out precedes clock-in are skipped.
/// Rule-derived breaks act as a minimum unpaid break:
///
/// - per-shift mode: each entry deducts the larger of its recorded break
///   and the rule break for its own duration, using its location's rules;
/// - per-day mode: entries deduct their recorded breaks, and each
///   employee-day whose rule break (on the summed duration, using the
///   rules of the day's earliest entry's location) exceeds the recorded
///   total gets one [`DailyBreakAdjustment`] for the excess.
///
/// Entries are returned in input order.
pub fn calculate_timesheet(
    entries: &[TimeEntry],
    settings: &BreakSettings,
    rates: &RateResolver,
    pay_periods: &[PayPeriod],
) -> CalculatedTimesheet {
    let closed: Vec<ClosedEntry<'_>> = entries.iter().filter_map(close_entry).collect();

    let days = closed.iter().enumerate().fold(
        BTreeMap::<(&str, NaiveDate), Vec<usize>>::new(),
        |mut days, (index, closed_entry)| {
            days.entry((
                closed_entry.entry.employee_id.as_str(),
                closed_entry.entry.work_date(),
            ))
            .or_default()
            .push(index);
            days
        },
    );

    let mut break_minutes = vec![0u32; closed.len()];
    let mut pending = Vec::new();

    for ((employee_id, date), mut members) in days {
        members.sort_by_key(|&index| closed[index].entry.clock_in);

        match settings.mode {
            BreakCalculationMode::PerShift => {
                for &index in &members {
                    let closed_entry = &closed[index];
                    let effective = effective_rules_for_location(
                        settings,
                        closed_entry.entry.location_id.as_deref(),
                    );
                    let rule_minutes =
                        resolve_breaks(&effective, &[closed_entry.gross_hours]).total_minutes();
                    break_minutes[index] = rule_minutes.max(closed_entry.entry.total_break_minutes);
                }
            }
            BreakCalculationMode::PerDay => {
                let earliest = &closed[members[0]];
                let effective = effective_rules_for_location(
                    settings,
                    earliest.entry.location_id.as_deref(),
                );
                let shift_hours: Vec<Decimal> =
                    members.iter().map(|&index| closed[index].gross_hours).collect();
                let rule_minutes = resolve_breaks(&effective, &shift_hours).total_minutes();

                let mut recorded_minutes = 0u32;
                for &index in &members {
                    let recorded = closed[index].entry.total_break_minutes;
                    break_minutes[index] = recorded;
                    recorded_minutes = recorded_minutes.saturating_add(recorded);
                }

                let excess = rule_minutes.saturating_sub(recorded_minutes);
                if excess > 0 {
                    pending.push(PendingDayBreak {
                        employee_id: employee_id.to_string(),
                        date,
                        minutes: excess,
                        members,
                    });
                }
            }
        }
    }

    let calculated: Vec<CalculatedEntry> = closed
        .iter()
        .zip(break_minutes)
        .map(|(closed_entry, minutes)| {
            let entry = closed_entry.entry;
            if entry.category_id.is_none() {
                warn!(
                    entry_id = %entry.id,
                    employee_id = %entry.employee_id,
                    "Uncategorized entry, zero-rated"
                );
            }
            let rate = rates.resolve(
                &entry.employee_id,
                entry.category_id.as_deref(),
                entry.category_rate.unwrap_or(Decimal::ZERO),
            );
            let label = resolve_pay_period_label(entry.work_date(), pay_periods);
            calculate_entry(entry, closed_entry.clock_out, rate, minutes, label)
        })
        .collect();

    let adjustments = pending
        .into_iter()
        .filter_map(|day| settle_day_break(day, &calculated))
        .collect();

    CalculatedTimesheet {
        entries: calculated,
        adjustments,
    }
}

fn close_entry(entry: &TimeEntry) -> Option<ClosedEntry<'_>> {
    let Some(clock_out) = entry.clock_out else {
        warn!(entry_id = %entry.id, "Skipping open entry");
        return None;
    };
    let Some(gross_hours) = entry.gross_hours() else {
        warn!(
            entry_id = %entry.id,
            clock_in = %entry.clock_in,
            clock_out = %clock_out,
            "Skipping entry with clock-out before clock-in"
        );
        return None;
    };
    Some(ClosedEntry {
        entry,
        clock_out,
        gross_hours,
    })
}

/// Converts a pending deduction into hours and pay, capped by the day's net
/// hours and priced at the day's blended rate.
fn settle_day_break(
    day: PendingDayBreak,
    calculated: &[CalculatedEntry],
) -> Option<DailyBreakAdjustment> {
    let day_net: Decimal = day.members.iter().map(|&i| calculated[i].net_hours).sum();
    let day_pay: Decimal = day.members.iter().map(|&i| calculated[i].total_pay).sum();

    let hours = hours_from_minutes(day.minutes).min(day_net);
    if hours <= Decimal::ZERO {
        return None;
    }
    let pay = if hours == day_net {
        day_pay
    } else {
        (hours * day_pay / day_net).round_dp(HOURS_SCALE)
    };

    Some(DailyBreakAdjustment {
        employee_id: day.employee_id,
        date: day.date,
        minutes: day.minutes,
        hours,
        pay,
    })
}
