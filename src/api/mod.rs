//! HTTP API module for the timesheet engine.
//!
//! This module provides the REST API endpoints for exporting time entries
//! as workbooks, delimited text and payroll flat files.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ExportRequestBody, RateOverrideRequest, TimeEntryRequest};
pub use response::ApiError;
pub use state::AppState;
