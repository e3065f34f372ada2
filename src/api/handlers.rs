//! HTTP request handlers for the allocation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::allocation::run_scheduled;
use crate::error::EngineError;

use super::request::{AllocationRequest, ScheduledRunRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/allocations", post(allocate_handler))
        .route("/allocations/scheduled", post(scheduled_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for POST /allocations.
///
/// Runs one allocation for a company and branch and returns the report.
async fn allocate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing allocation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    if let Err(error) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %error.error, "Invalid allocation request");
        return json_response(StatusCode::BAD_REQUEST, error);
    }

    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let company_id = request.company_id.clone();
    let branch_id = request.branch_id.clone();
    let orchestrator = state.orchestrator();

    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || {
        orchestrator.run_branch(&request.company_id, &request.branch_id, date)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %result.run_id,
                company_id = %company_id,
                branch_id = %branch_id,
                seated = result.assignments.len(),
                wfh = result.wfh_employees.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Allocation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Ok(Err(err)) => engine_error_response(correlation_id, err),
        Err(join_error) => task_failed_response(correlation_id, join_error),
    }
}

/// Handler for POST /allocations/scheduled.
///
/// Runs every company and returns one outcome per company.
async fn scheduled_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScheduledRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing scheduled run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    let start_time = Instant::now();
    match run_scheduled(state.orchestrator().as_ref().clone(), date).await {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                completed = summary.completed(),
                failed = summary.failed(),
                duration_us = start_time.elapsed().as_micros(),
                "Scheduled run completed"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = err.code(),
        error = %err,
        "Allocation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn task_failed_response(correlation_id: Uuid, join_error: tokio::task::JoinError) -> Response {
    error!(correlation_id = %correlation_id, error = %join_error, "Allocation task failed");
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::new("INTERNAL_ERROR", "Allocation task failed"),
    )
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
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
    json_response(StatusCode::BAD_REQUEST, error)
}
