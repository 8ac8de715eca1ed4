//! Flat levy calculation (e.g., housing levy, SHA).
//!
//! A flat levy is a single rate applied to its base with no banding. The
//! employee and employer sides are computed and rounded independently.

use rust_decimal::Decimal;

use crate::config::{FlatLevy, LevyBase};
use crate::models::{AuditStep, LevyAmount};

use super::rounding::round_money;

/// The result of a flat levy calculation.
#[derive(Debug, Clone)]
pub struct FlatLevyResult {
    /// Employee and employer amounts.
    pub levy: LevyAmount,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates one flat levy.
///
/// # Arguments
///
/// * `levy` - The validated levy definition
/// * `gross_pay` - Total gross pay
/// * `taxable_gross` - Gross pay less non-taxable allowances
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_flat_levy;
/// use payroll_engine::config::{FlatLevy, LevyBase};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let housing = FlatLevy {
///     rate_type: "housing_levy".to_string(),
///     employee_rate: Decimal::from_str("0.015").unwrap(),
///     employer_rate: Decimal::from_str("0.015").unwrap(),
///     base: LevyBase::GrossPay,
///     tax_deductible: true,
/// };
/// let result = calculate_flat_levy(&housing, Decimal::new(50000, 0), Decimal::new(50000, 0), 1);
/// assert_eq!(result.levy.employee, Decimal::from_str("750.00").unwrap());
/// assert_eq!(result.levy.employer, Decimal::from_str("750.00").unwrap());
/// ```
pub fn calculate_flat_levy(
    levy: &FlatLevy,
    gross_pay: Decimal,
    taxable_gross: Decimal,
    step_number: u32,
) -> FlatLevyResult {
    let (base_amount, base_name) = match levy.base {
        LevyBase::GrossPay => (gross_pay, "gross_pay"),
        LevyBase::TaxableGross => (taxable_gross, "taxable_gross"),
    };

    let employee = round_money(base_amount * levy.employee_rate);
    let employer = round_money(base_amount * levy.employer_rate);

    let reasoning = if levy.employer_rate.is_zero() {
        format!(
            "{} x {} = {} (employee only)",
            base_amount,
            levy.employee_rate.normalize(),
            employee
        )
    } else {
        format!(
            "{} x {} = {} employee; {} x {} = {} employer",
            base_amount,
            levy.employee_rate.normalize(),
            employee,
            base_amount,
            levy.employer_rate.normalize(),
            employer
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "flat_levy".to_string(),
        rule_name: "Flat Levy".to_string(),
        rate_type: Some(levy.rate_type.clone()),
        input: serde_json::json!({
            "base": base_name,
            "base_amount": base_amount.to_string(),
            "employee_rate": levy.employee_rate.normalize().to_string(),
            "employer_rate": levy.employer_rate.normalize().to_string(),
            "tax_deductible": levy.tax_deductible
        }),
        output: serde_json::json!({
            "employee": employee.to_string(),
            "employer": employer.to_string()
        }),
        reasoning,
    };

    FlatLevyResult {
        levy: LevyAmount {
            rate_type: levy.rate_type.clone(),
            base_amount,
            employee,
            employer,
            tax_deductible: levy.tax_deductible,
        },
        audit_step,
    }
}
