//! Error types for the payroll deduction engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop a payroll computation or a rate
//! table from being built.

use thiserror::Error;

/// The main error type for the payroll deduction engine.
///
/// All operations in the engine return this error type. Each variant names
/// the offending field or rate type so callers can surface an actionable
/// message instead of a generic failure.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::MissingRateType {
///     rate_type: "nssf".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rate type not defined: nssf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// A payroll input amount was negative or otherwise unusable.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The rate table violated a structural rule.
    #[error("Invalid rate table for '{rate_type}': {message}")]
    InvalidRateTable {
        /// The rate type whose rows are malformed.
        rate_type: String,
        /// A description of the violation.
        message: String,
    },

    /// A rate type the calculation depends on has no active row.
    #[error("Rate type not defined: {rate_type}")]
    MissingRateType {
        /// The rate type that was not found.
        rate_type: String,
    },

    /// A service request was well-formed JSON but semantically unusable.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// A description of the problem.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rate_table(
        rate_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRateTable {
            rate_type: rate_type.into(),
            message: message.into(),
        }
    }

    pub(crate) fn missing_rate_type(rate_type: impl Into<String>) -> Self {
        Self::MissingRateType {
            rate_type: rate_type.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/statutory_rates.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/statutory_rates.yaml"
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
    fn test_invalid_input_names_field() {
        let error = EngineError::invalid_input("basic_salary", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid input field 'basic_salary': must not be negative"
        );
    }

    #[test]
    fn test_invalid_rate_table_names_rate_type() {
        let error = EngineError::invalid_rate_table("paye_band", "bands overlap");
        assert_eq!(
            error.to_string(),
            "Invalid rate table for 'paye_band': bands overlap"
        );
    }

    #[test]
    fn test_missing_rate_type_names_rate_type() {
        let error = EngineError::missing_rate_type("sha");
        assert_eq!(error.to_string(), "Rate type not defined: sha");
    }

    #[test]
    fn test_invalid_request_displays_message() {
        let error = EngineError::InvalidRequest {
            message: "batch is empty".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid request: batch is empty");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing() -> EngineResult<()> {
            Err(EngineError::missing_rate_type("paye_band"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing()?;
            Ok(())
        }

        assert_eq!(
            propagates_error(),
            Err(EngineError::missing_rate_type("paye_band"))
        );
    }
}
