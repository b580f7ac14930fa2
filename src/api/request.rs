//! Request types for the timesheet engine API.
//!
//! This module defines the JSON request body shared by the `/export` and
//! `/preview` endpoints.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::export::{ExportRequest, OutputKind};
use crate::models::{RateOverride, TimeEntry};

/// Request body for the export endpoints.
///
/// `output_kind` is kept as text here so that an unknown kind is reported
/// as an unsupported kind rather than as a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequestBody {
    /// The output kind name, e.g. `WORKBOOK`, `csv` or `xero`.
    pub output_kind: String,
    /// First work date included (inclusive).
    pub start_date: NaiveDate,
    /// Last work date included (inclusive).
    pub end_date: NaiveDate,
    /// The time entries of the range.
    #[serde(default)]
    pub entries: Vec<TimeEntryRequest>,
    /// Per-employee category rates.
    #[serde(default)]
    pub rate_overrides: Vec<RateOverrideRequest>,
}

/// Time entry in an export request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntryRequest {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who worked the entry.
    pub employee_id: String,
    /// The employee's display name.
    #[serde(default)]
    pub employee_name: String,
    /// The employee's email address.
    #[serde(default)]
    pub employee_email: String,
    /// Clock-in timestamp with UTC offset.
    pub clock_in: DateTime<FixedOffset>,
    /// Clock-out timestamp, absent while the entry is open.
    #[serde(default)]
    pub clock_out: Option<DateTime<FixedOffset>>,
    /// Break minutes recorded against the entry.
    #[serde(default)]
    pub total_break_minutes: u32,
    /// Pay category id.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Pay category display name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// The category's default hourly rate.
    #[serde(default)]
    pub category_rate: Option<Decimal>,
    /// Location id.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Location display name.
    #[serde(default)]
    pub location_name: Option<String>,
}

/// Rate override in an export request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOverrideRequest {
    /// The employee the override applies to.
    pub employee_id: String,
    /// The category the override applies to.
    pub category_id: String,
    /// The overriding hourly rate.
    pub hourly_rate: Decimal,
}

impl ExportRequestBody {
    /// Converts the body into an engine request, parsing the output kind.
    pub fn into_export_request(self) -> EngineResult<ExportRequest> {
        Ok(ExportRequest {
            output_kind: OutputKind::from_str(&self.output_kind)?,
            start_date: self.start_date,
            end_date: self.end_date,
            entries: self.entries.into_iter().map(Into::into).collect(),
            rate_overrides: self.rate_overrides.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<TimeEntryRequest> for TimeEntry {
    fn from(req: TimeEntryRequest) -> Self {
        TimeEntry {
            id: req.id,
            employee_id: req.employee_id,
            employee_name: req.employee_name,
            employee_email: req.employee_email,
            clock_in: req.clock_in,
            clock_out: req.clock_out,
            total_break_minutes: req.total_break_minutes,
            category_id: req.category_id,
            category_name: req.category_name,
            category_rate: req.category_rate,
            location_id: req.location_id,
            location_name: req.location_name,
        }
    }
}

impl From<RateOverrideRequest> for RateOverride {
    fn from(req: RateOverrideRequest) -> Self {
        RateOverride {
            employee_id: req.employee_id,
            category_id: req.category_id,
            hourly_rate: req.hourly_rate,
        }
    }
}
