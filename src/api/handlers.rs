//! HTTP request handlers for the timesheet engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::export::{build_views, run_export};

use super::request::ExportRequestBody;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/export", post(export_handler))
        .route("/preview", post(preview_handler))
        .with_state(state)
}

/// Handler for POST /export endpoint.
///
/// Renders the request's entries in the requested output kind and returns
/// the file as an attachment.
async fn export_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequestBody>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing export request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let result = body
        .into_export_request()
        .and_then(|request| run_export(&request, state.settings()));

    match result {
        Ok(file) => {
            info!(
                correlation_id = %correlation_id,
                kind = %file.kind,
                filename = %file.filename,
                bytes = file.bytes.len(),
                "Export completed successfully"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, file.content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file.filename),
                    ),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /preview endpoint.
///
/// Returns the aggregated views as JSON instead of a rendered file. The
/// request's output kind is still validated.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequestBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing preview request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let result = body
        .into_export_request()
        .and_then(|request| build_views(&request, state.settings()));

    match result {
        Ok(views) => {
            info!(
                correlation_id = %correlation_id,
                entries = views.detail.len(),
                employees = views.summary.len(),
                "Preview completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(views),
            )
                .into_response()
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn engine_error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Export failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}
