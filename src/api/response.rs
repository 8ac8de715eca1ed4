//! Response types for the payroll deduction engine API.
//!
//! This module defines the response envelopes and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{MAX_AMOUNT, PayrollResult};

/// The engine version reported in every response.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response envelope for one computed payroll.
///
/// Identifiers and timestamps live here rather than in [`PayrollResult`],
/// which stays byte-for-byte reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// The employee identifier from the request.
    pub employee_id: String,
    /// The date whose rates applied.
    pub effective_date: NaiveDate,
    /// The computed payroll.
    pub result: PayrollResult,
}

impl PayrollResponse {
    /// Wraps a result in a fresh envelope.
    pub fn new(employee_id: String, effective_date: NaiveDate, result: PayrollResult) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            employee_id,
            effective_date,
            result,
        }
    }
}

/// The outcome for one employee in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The employee's payroll was computed.
    Ok {
        /// The employee identifier from the request.
        employee_id: String,
        /// The computed payroll.
        result: PayrollResult,
    },
    /// The employee's payroll could not be computed.
    Error {
        /// The employee identifier from the request.
        employee_id: String,
        /// Why the computation failed.
        error: ApiError,
    },
}

/// Response body for the `/calculate/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Unique identifier for this batch.
    pub batch_id: Uuid,
    /// When the batch was processed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the results.
    pub engine_version: String,
    /// The date whose rates applied.
    pub effective_date: NaiveDate,
    /// Number of employees computed successfully.
    pub succeeded: usize,
    /// Number of employees that failed.
    pub failed: usize,
    /// One outcome per employee, in request order.
    pub outcomes: Vec<BatchOutcome>,
}

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::ConfigParseError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    message,
                ),
            },
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!(
                        "The input field '{}' must be a non-negative amount no greater than {}",
                        field, MAX_AMOUNT
                    ),
                ),
            },
            EngineError::InvalidRateTable { rate_type, .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_RATE_TABLE",
                    message,
                    format!(
                        "The configured rows for '{}' are not valid on the requested date",
                        rate_type
                    ),
                ),
            },
            EngineError::MissingRateType { rate_type } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "MISSING_RATE_TYPE",
                    message,
                    format!("No '{}' rate is in force on the requested date", rate_type),
                ),
            },
            EngineError::InvalidRequest { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response: ApiErrorResponse = EngineError::InvalidInput {
            field: "bonus".to_string(),
            message: "must not be negative".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_INPUT");
        assert!(response.error.message.contains("bonus"));
    }

    #[test]
    fn test_missing_rate_type_maps_to_unprocessable() {
        let response: ApiErrorResponse = EngineError::MissingRateType {
            rate_type: "paye_band".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "MISSING_RATE_TYPE");
        assert_eq!(response.error.message, "Rate type not defined: paye_band");
    }

    #[test]
    fn test_invalid_rate_table_maps_to_unprocessable() {
        let response: ApiErrorResponse = EngineError::InvalidRateTable {
            rate_type: "nssf".to_string(),
            message: "tier ceilings must ascend".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "INVALID_RATE_TABLE");
    }

    #[test]
    fn test_config_errors_map_to_server_error() {
        let response: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "/missing".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
    }

    #[test]
    fn test_batch_outcome_is_tagged() {
        let outcome = BatchOutcome::Error {
            employee_id: "emp_9".to_string(),
            error: ApiError::new("INVALID_INPUT", "bad"),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["employee_id"], "emp_9");
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
    }
}
