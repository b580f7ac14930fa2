//! Export pipeline and output writers.
//!
//! [`run_export`] drives one export request end to end: it filters the
//! request's entries to the date range, calculates them against the
//! organization's break settings and pay periods, aggregates the views and
//! hands them to [`format_export`] for the requested [`OutputKind`].
//! [`build_views`] stops before rendering, for callers that want the
//! aggregated views themselves.

mod delimited;
mod display;
mod payroll_file;
mod workbook;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{RateResolver, aggregate, calculate_timesheet};
use crate::config::OrganizationSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{ExportViews, MAX_HOURLY_RATE, RateOverride, TimeEntry};

pub use delimited::{DETAIL_HEADER, write_detail};
pub use payroll_file::{PAYROLL_HEADER, write_payroll_file};
pub use workbook::{SUMMARY_HEADER, write_workbook};

/// Content type of workbook exports.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Content type of delimited text and payroll file exports.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// The shapes an export can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputKind {
    /// A workbook with Detail, Summary and Pivot sheets.
    #[serde(alias = "workbook", alias = "xlsx")]
    Workbook,
    /// The detail table as CSV.
    #[serde(alias = "delimited_text", alias = "csv")]
    DelimitedText,
    /// One row per (employee, date, category) for the Xero importer.
    #[serde(alias = "payroll_flat_file", alias = "xero")]
    PayrollFlatFile,
}

impl OutputKind {
    /// The canonical name, e.g. `PAYROLL_FLAT_FILE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Workbook => "WORKBOOK",
            OutputKind::DelimitedText => "DELIMITED_TEXT",
            OutputKind::PayrollFlatFile => "PAYROLL_FLAT_FILE",
        }
    }

    /// The file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Workbook => "xlsx",
            OutputKind::DelimitedText | OutputKind::PayrollFlatFile => "csv",
        }
    }

    /// The MIME type of the output bytes.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputKind::Workbook => XLSX_CONTENT_TYPE,
            OutputKind::DelimitedText | OutputKind::PayrollFlatFile => CSV_CONTENT_TYPE,
        }
    }

    /// The suggested download filename for a date range.
    ///
    /// ```
    /// use timesheet_engine::export::OutputKind;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    ///
    /// assert_eq!(
    ///     OutputKind::Workbook.filename(start, end),
    ///     "timesheet_2024-01-01_to_2024-01-31.xlsx"
    /// );
    /// assert_eq!(
    ///     OutputKind::PayrollFlatFile.filename(start, end),
    ///     "xero_timesheet_2024-01-01_to_2024-01-31.csv"
    /// );
    /// ```
    pub fn filename(&self, start_date: NaiveDate, end_date: NaiveDate) -> String {
        let prefix = match self {
            OutputKind::PayrollFlatFile => "xero_timesheet",
            OutputKind::Workbook | OutputKind::DelimitedText => "timesheet",
        };
        format!(
            "{prefix}_{}_to_{}.{}",
            start_date.format("%Y-%m-%d"),
            end_date.format("%Y-%m-%d"),
            self.extension()
        )
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = EngineError;

    /// Parses a kind name, case-insensitively, accepting the canonical
    /// names and the short aliases `xlsx`, `csv` and `xero`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workbook" | "xlsx" => Ok(OutputKind::Workbook),
            "delimited_text" | "csv" => Ok(OutputKind::DelimitedText),
            "payroll_flat_file" | "xero" => Ok(OutputKind::PayrollFlatFile),
            _ => Err(EngineError::UnsupportedOutputKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// Presentation settings for the writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix for money values in text output, e.g. `£`.
    pub currency_symbol: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "£".to_string(),
        }
    }
}

/// A rendered export, ready to hand to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// The kind the bytes were rendered as.
    pub kind: OutputKind,
    /// Suggested download filename.
    pub filename: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// The file contents.
    pub bytes: Vec<u8>,
}

/// One export request: the already-loaded entries of a date range plus the
/// rate overrides of the employees in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// The shape to render.
    pub output_kind: OutputKind,
    /// First work date included (inclusive).
    pub start_date: NaiveDate,
    /// Last work date included (inclusive).
    pub end_date: NaiveDate,
    /// Raw time entries. Open entries are skipped.
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
    /// Per-employee category rates.
    #[serde(default)]
    pub rate_overrides: Vec<RateOverride>,
}

/// Renders aggregated views as one output kind.
///
/// Never fails on empty views: every kind falls back to header-only
/// output. Errors come only from the underlying writers.
pub fn format_export(
    views: &ExportViews,
    kind: OutputKind,
    options: &FormatOptions,
) -> EngineResult<Vec<u8>> {
    match kind {
        OutputKind::Workbook => write_workbook(views, options),
        OutputKind::DelimitedText => write_detail(&views.detail, options),
        OutputKind::PayrollFlatFile => write_payroll_file(&views.payroll),
    }
}

fn check_rates(request: &ExportRequest) -> EngineResult<()> {
    let category_rates = request
        .entries
        .iter()
        .filter_map(|entry| entry.category_rate.map(|rate| (entry.id.as_str(), rate)));
    let override_rates = request
        .rate_overrides
        .iter()
        .map(|o| (o.employee_id.as_str(), o.hourly_rate));

    for (owner, rate) in category_rates.chain(override_rates) {
        if rate > MAX_HOURLY_RATE {
            return Err(EngineError::InvalidRequest {
                message: format!("hourly rate {rate} for {owner} exceeds {MAX_HOURLY_RATE}"),
            });
        }
    }
    Ok(())
}

/// Calculates and aggregates one request's entries without rendering them.
///
/// Entries whose clock-in date lies outside `[start_date, end_date]` are
/// excluded. Returns `InvalidRequest` when the range is reversed or a rate
/// exceeds [`MAX_HOURLY_RATE`].
pub fn build_views(
    request: &ExportRequest,
    settings: &OrganizationSettings,
) -> EngineResult<ExportViews> {
    if request.end_date < request.start_date {
        return Err(EngineError::InvalidRequest {
            message: format!(
                "end_date {} is before start_date {}",
                request.end_date, request.start_date
            ),
        });
    }

    check_rates(request)?;

    let entries: Vec<TimeEntry> = request
        .entries
        .iter()
        .filter(|entry| {
            let date = entry.work_date();
            date >= request.start_date && date <= request.end_date
        })
        .cloned()
        .collect();
    if entries.len() < request.entries.len() {
        debug!(
            excluded = request.entries.len() - entries.len(),
            "Excluded entries outside the export date range"
        );
    }

    let rates = RateResolver::new(&request.rate_overrides);
    let timesheet = calculate_timesheet(
        &entries,
        &settings.break_settings,
        &rates,
        &settings.pay_periods,
    );
    debug!(
        calculated = timesheet.entries.len(),
        adjustments = timesheet.adjustments.len(),
        "Calculated timesheet"
    );
    Ok(aggregate(&timesheet))
}

/// Runs one export request against an organization's settings.
///
/// # Example
///
/// ```
/// use timesheet_engine::config::OrganizationSettings;
/// use timesheet_engine::export::{ExportRequest, OutputKind, run_export};
/// use chrono::NaiveDate;
///
/// let request = ExportRequest {
///     output_kind: OutputKind::PayrollFlatFile,
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     entries: Vec::new(),
///     rate_overrides: Vec::new(),
/// };
///
/// let file = run_export(&request, &OrganizationSettings::default()).unwrap();
/// assert_eq!(file.filename, "xero_timesheet_2024-01-01_to_2024-01-31.csv");
/// assert!(String::from_utf8(file.bytes).unwrap().starts_with("Employee Name,"));
/// ```
pub fn run_export(
    request: &ExportRequest,
    settings: &OrganizationSettings,
) -> EngineResult<ExportFile> {
    let start_time = Instant::now();
    let views = build_views(request, settings)?;

    let options = FormatOptions {
        currency_symbol: settings.currency_symbol.clone(),
    };
    let kind = request.output_kind;
    let bytes = format_export(&views, kind, &options)?;

    info!(
        kind = %kind,
        entries_in = request.entries.len(),
        entries_calculated = views.detail.len(),
        employees = views.summary.len(),
        payroll_rows = views.payroll.len(),
        bytes = bytes.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Export completed"
    );

    Ok(ExportFile {
        kind,
        filename: kind.filename(request.start_date, request.end_date),
        content_type: kind.content_type(),
        bytes,
    })
}
