//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::providers::AuthToken;

use super::request::PayrollRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/payroll/calculate", post(calculate_handler))
        .with_state(state)
}

/// Handler for POST /v1/payroll/calculate.
///
/// Forwards the caller's `Authorization` header to every provider and
/// returns the computed payroll.
async fn calculate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(AuthToken::new)
    else {
        warn!(correlation_id = %correlation_id, "Missing Authorization header");
        return ApiErrorResponse {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::missing_authorization(),
        }
        .into_response();
    };

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error,
            }
            .into_response();
        }
    };

    let start_time = Instant::now();
    let outcome = state
        .orchestrator()
        .calculate_payroll(
            request.employee_id,
            request.pay_period_start_date,
            request.pay_period_end_date,
            &auth,
        )
        .await;

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = request.employee_id,
                net_pay = %result.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll request completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = request.employee_id,
                error = %err,
                "Payroll request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}
