//! Error types for the timesheet engine.
//!
//! Data-quality problems in the input (open entries, malformed break rules,
//! uncategorized entries) are absorbed by the engine and never surface here.
//! These variants cover configuration loading, caller contract violations,
//! and failures while writing an export.

use thiserror::Error;

/// The main error type for the timesheet engine.
///
/// # Example
///
/// ```
/// use timesheet_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedOutputKind {
///     kind: "pdf".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported output kind: pdf");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A pay period definition violates `end_date >= start_date`.
    #[error("Invalid pay period '{name}': {message}")]
    InvalidPayPeriod {
        /// The name of the offending period.
        name: String,
        /// A description of what made the period invalid.
        message: String,
    },

    /// The requested output kind is not one the engine can produce.
    #[error("Unsupported output kind: {kind}")]
    UnsupportedOutputKind {
        /// The kind as supplied by the caller.
        kind: String,
    },

    /// An export request was structurally invalid.
    #[error("Invalid export request: {message}")]
    InvalidRequest {
        /// A description of the problem.
        message: String,
    },

    /// Writing the output bytes failed.
    #[error("Failed to write {kind} export: {message}")]
    ExportWrite {
        /// The output kind being written.
        kind: String,
        /// The underlying writer error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::ExportWrite {
            kind: "csv".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for EngineError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        EngineError::ExportWrite {
            kind: "workbook".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/organization.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/organization.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_pay_period_displays_name_and_message() {
        let error = EngineError::InvalidPayPeriod {
            name: "Week 3".to_string(),
            message: "end date before start date".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid pay period 'Week 3': end date before start date"
        );
    }

    #[test]
    fn test_invalid_request_displays_message() {
        let error = EngineError::InvalidRequest {
            message: "end_date before start_date".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid export request: end_date before start_date"
        );
    }

    #[test]
    fn test_export_write_displays_kind_and_message() {
        let error = EngineError::ExportWrite {
            kind: "csv".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to write csv export: disk full");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unsupported() -> EngineResult<()> {
            Err(EngineError::UnsupportedOutputKind {
                kind: "pdf".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unsupported()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
