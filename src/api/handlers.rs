//! HTTP request handlers for the Attendance Reconciliation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::ConfusedShiftRecord;
use crate::pipeline::ProcessOutcome;

use super::request::{DismissRequest, ProcessRequest, ResolveRequest};
use super::response::{ApiError, ApiErrorResponse, ProcessResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/process", post(process_handler))
        .route("/attendance/:employee_id/:date", get(aggregate_handler))
        .route("/reviews/pending", get(pending_reviews_handler))
        .route("/reviews/:id/resolve", post(resolve_handler))
        .route("/reviews/:id/auto-resolve", post(auto_resolve_handler))
        .route("/reviews/:id/dismiss", post(dismiss_handler))
        .with_state(state)
}

fn process_response(outcome: ProcessOutcome) -> Response {
    (
        StatusCode::OK,
        Json(ProcessResponse {
            aggregate: outcome.aggregate,
            confused: outcome.confused,
        }),
    )
        .into_response()
}

/// Handler for POST /attendance/process.
///
/// Accepts one (employee, date) unit's punches and returns the recomputed
/// aggregate, together with the confused record when the unit escalated.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    // Correlation ID for request tracking
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
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
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        date = %request.date,
        punches = request.punches.len(),
        "Processing attendance unit"
    );

    let punches = request.domain_punches();
    let mut engine = state.engine().write().await;
    match engine.process_day(&request.employee_id, request.date, punches) {
        Ok(outcome) => process_response(outcome),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Attendance processing failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /attendance/:employee_id/:date.
async fn aggregate_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> Response {
    let engine = state.engine().read().await;
    match engine.aggregate(&employee_id, date) {
        Some(aggregate) => (StatusCode::OK, Json(aggregate.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                "AGGREGATE_NOT_FOUND",
                format!("No attendance recorded for '{}' on {}", employee_id, date),
            )),
        )
            .into_response(),
    }
}

/// Handler for GET /reviews/pending.
async fn pending_reviews_handler(State(state): State<AppState>) -> Response {
    let engine = state.engine().read().await;
    let pending: Vec<ConfusedShiftRecord> =
        engine.pending_reviews().into_iter().cloned().collect();
    (StatusCode::OK, Json(pending)).into_response()
}

/// Handler for POST /reviews/:id/resolve.
async fn resolve_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let mut engine = state.engine().write().await;
    match engine.resolve_review(id, &request.shift_id, &request.reviewer, request.comments) {
        Ok(outcome) => process_response(outcome),
        Err(err) => {
            warn!(review_id = %id, error = %err, "Review resolution rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /reviews/:id/auto-resolve.
async fn auto_resolve_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let mut engine = state.engine().write().await;
    match engine.auto_resolve_nearest(id) {
        Ok(outcome) => process_response(outcome),
        Err(err) => {
            warn!(review_id = %id, error = %err, "Auto-resolution rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /reviews/:id/dismiss.
async fn dismiss_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DismissRequest>,
) -> Response {
    let mut engine = state.engine().write().await;
    match engine.dismiss_review(id, &request.reviewer, request.comments) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => {
            warn!(review_id = %id, error = %err, "Review dismissal rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
