//! Request types for the payroll deduction engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/calculate/batch` endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PayrollInput;

/// Request body for the `/calculate` endpoint.
///
/// Carries one employee's pay components and the date whose statutory
/// rates apply.
///
/// # Example
///
/// ```
/// use payroll_engine::api::CalculationRequest;
///
/// let request: CalculationRequest = serde_json::from_str(r#"{
///     "employee_id": "emp_001",
///     "effective_date": "2024-12-01",
///     "input": { "basic_salary": "50000" }
/// }"#).unwrap();
/// assert_eq!(request.employee_id, "emp_001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Caller's identifier for the employee, echoed in the response.
    pub employee_id: String,
    /// The date whose rates apply.
    pub effective_date: NaiveDate,
    /// The employee's pay components for the period.
    pub input: PayrollInput,
}

/// One employee inside a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmployee {
    /// Caller's identifier for the employee.
    pub employee_id: String,
    /// The employee's pay components for the period.
    pub input: PayrollInput,
}

/// Request body for the `/calculate/batch` endpoint.
///
/// Every employee is computed against the same rate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The date whose rates apply.
    pub effective_date: NaiveDate,
    /// Employees to compute.
    pub employees: Vec<BatchEmployee>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_calculation_request_defaults_optional_components() {
        let json = r#"{
            "employee_id": "emp_001",
            "effective_date": "2024-12-01",
            "input": { "basic_salary": "50000", "bonus": "1500.50" }
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.effective_date, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(request.input.basic_salary, Decimal::new(50000, 0));
        assert_eq!(request.input.bonus, Decimal::new(150050, 2));
        assert_eq!(request.input.housing_allowance, Decimal::ZERO);
    }

    #[test]
    fn test_calculation_request_requires_basic_salary() {
        let json = r#"{
            "employee_id": "emp_001",
            "effective_date": "2024-12-01",
            "input": { "bonus": "100" }
        }"#;

        let err = serde_json::from_str::<CalculationRequest>(json).unwrap_err();
        assert!(err.to_string().contains("basic_salary"));
    }

    #[test]
    fn test_batch_request_deserialization() {
        let json = r#"{
            "effective_date": "2025-03-01",
            "employees": [
                { "employee_id": "a", "input": { "basic_salary": "30000" } },
                { "employee_id": "b", "input": { "basic_salary": "90000" } }
            ]
        }"#;

        let request: BatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employees.len(), 2);
        assert_eq!(request.employees[1].employee_id, "b");
    }
}
