//! HTTP request handlers for the payroll deduction engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::calculation::compute_payroll;
use crate::config::RateTable;
use crate::error::EngineError;

use super::request::{BatchEmployee, BatchRequest, CalculationRequest};
use super::response::{
    ApiError, ApiErrorResponse, BatchOutcome, BatchResponse, ENGINE_VERSION, PayrollResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/batch", post(batch_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Resolves the rate table for the requested date and returns the computed
/// payroll wrapped in a [`PayrollResponse`] envelope.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = state
        .rate_table(request.effective_date)
        .and_then(|rates| compute_payroll(&request.input, &rates));

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                effective_date = %request.effective_date,
                net_pay = %result.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(
                StatusCode::OK,
                PayrollResponse::new(request.employee_id, request.effective_date, result),
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /calculate/batch endpoint.
///
/// The rate table is resolved once; each employee then succeeds or fails
/// on their own.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if request.employees.is_empty() {
        warn!(correlation_id = %correlation_id, "Empty batch");
        return error_response(
            EngineError::InvalidRequest {
                message: "employees must not be empty".to_string(),
            }
            .into(),
        );
    }

    let rates = match state.rate_table(request.effective_date) {
        Ok(rates) => rates,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                effective_date = %request.effective_date,
                error = %err,
                "Rate table could not be resolved"
            );
            return error_response(err.into());
        }
    };

    let start_time = Instant::now();
    let employees = request.employees;
    // The computation is CPU-bound; keep it off the async workers.
    let outcomes = match tokio::task::spawn_blocking(move || {
        employees
            .into_iter()
            .map(|employee| batch_outcome(correlation_id, employee, &rates))
            .collect::<Vec<BatchOutcome>>()
    })
    .await
    {
        Ok(outcomes) => outcomes,
        Err(err) => {
            error!(
                correlation_id = %correlation_id,
                error = %err,
                "Batch computation task failed"
            );
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "Batch computation failed"),
            );
        }
    };

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, BatchOutcome::Error { .. }))
        .count();
    let succeeded = outcomes.len() - failed;

    info!(
        correlation_id = %correlation_id,
        effective_date = %request.effective_date,
        succeeded,
        failed,
        duration_us = start_time.elapsed().as_micros(),
        "Batch completed"
    );

    json_response(
        StatusCode::OK,
        BatchResponse {
            batch_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            effective_date: request.effective_date,
            succeeded,
            failed,
            outcomes,
        },
    )
}

fn batch_outcome(correlation_id: Uuid, employee: BatchEmployee, rates: &RateTable) -> BatchOutcome {
    match compute_payroll(&employee.input, rates) {
        Ok(result) => BatchOutcome::Ok {
            employee_id: employee.employee_id,
            result,
        },
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee.employee_id,
                error = %err,
                "Batch entry failed"
            );
            let api_error: ApiErrorResponse = err.into();
            BatchOutcome::Error {
                employee_id: employee.employee_id,
                error: api_error.error,
            }
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
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

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router() -> Router {
        create_router(AppState::new(ConfigLoader::load("./config/ke").unwrap()))
    }

    async fn post_json(uri: &str, body: String) -> (StatusCode, Value) {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_calculate_returns_envelope() {
        let body = json!({
            "employee_id": "emp_001",
            "effective_date": "2024-12-01",
            "input": { "basic_salary": "50000" }
        });
        let (status, json) = post_json("/calculate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["employee_id"], "emp_001");
        assert_eq!(json["engine_version"], ENGINE_VERSION);
        assert!(json["calculation_id"].is_string());
        assert_eq!(json["result"]["net_pay"], "39204.95");
    }

    #[tokio::test]
    async fn test_syntax_error_is_malformed_json() {
        let (status, json) = post_json("/calculate", "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let body = json!({ "employee_id": "emp_001", "input": { "basic_salary": "1" } });
        let (status, json) = post_json("/calculate", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_large_batch_keeps_employee_order() {
        let employees: Vec<Value> = (0..250)
            .map(|i| {
                json!({
                    "employee_id": format!("emp_{:03}", i),
                    "input": { "basic_salary": "50000" }
                })
            })
            .collect();
        let body = json!({ "effective_date": "2024-12-01", "employees": employees });
        let (status, json) = post_json("/calculate/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["succeeded"], 250);
        let outcomes = json["outcomes"].as_array().unwrap();
        assert_eq!(outcomes[0]["employee_id"], "emp_000");
        assert_eq!(outcomes[249]["employee_id"], "emp_249");
        assert_eq!(outcomes[249]["result"]["net_pay"], "39204.95");
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let body = json!({ "effective_date": "2024-12-01", "employees": [] });
        let (status, json) = post_json("/calculate/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}
