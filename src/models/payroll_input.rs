//! Payroll input model.
//!
//! This module defines [`PayrollInput`], the per-employee, per-period figures
//! a collaborator assembles before asking the engine for a computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The largest amount any single input field may carry.
///
/// With every field at or below this bound, all sums and rate products the
/// engine forms stay inside `Decimal`'s range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Earnings and claims for one employee in one pay period.
///
/// Multi-line allowances and ad-hoc deductions are pre-summed by the caller.
/// Every amount must be non-negative and at most [`MAX_AMOUNT`];
/// [`PayrollInput::validate`] enforces this.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     basic_salary: Decimal::new(50000, 0),
///     ..PayrollInput::default()
/// };
/// assert!(input.validate().is_ok());
/// assert_eq!(input.gross_earnings().unwrap(), Decimal::new(50000, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// Basic salary for the period.
    pub basic_salary: Decimal,
    /// Taxable housing allowance.
    #[serde(default)]
    pub housing_allowance: Decimal,
    /// Taxable transport allowance.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Sum of any other taxable allowances.
    #[serde(default)]
    pub other_taxable_allowances: Decimal,
    /// Sum of allowances excluded from tax and contribution bases.
    #[serde(default)]
    pub non_taxable_allowances: Decimal,
    /// Overtime pay for the period.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Bonus paid in the period.
    #[serde(default)]
    pub bonus: Decimal,
    /// Pre-summed ad-hoc deductions (loans, advances, union dues).
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Insurance relief claimed, before the statutory cap.
    #[serde(default)]
    pub insurance_relief: Decimal,
}

impl PayrollInput {
    /// Returns the seven earnings components with their field names, in payslip order.
    pub fn earnings(&self) -> [(&'static str, Decimal); 7] {
        [
            ("basic_salary", self.basic_salary),
            ("housing_allowance", self.housing_allowance),
            ("transport_allowance", self.transport_allowance),
            ("other_taxable_allowances", self.other_taxable_allowances),
            ("non_taxable_allowances", self.non_taxable_allowances),
            ("overtime_pay", self.overtime_pay),
            ("bonus", self.bonus),
        ]
    }

    /// Returns the unrounded sum of all earnings components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the component whose addition overflows.
    pub fn gross_earnings(&self) -> EngineResult<Decimal> {
        self.earnings()
            .into_iter()
            .try_fold(Decimal::ZERO, |total, (field, amount)| {
                total.checked_add(amount).ok_or_else(|| {
                    EngineError::invalid_input(field, "earnings total overflows")
                })
            })
    }

    /// Checks that every amount is non-negative and no larger than [`MAX_AMOUNT`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first out-of-range field.
    pub fn validate(&self) -> EngineResult<()> {
        let claims = [
            ("other_deductions", self.other_deductions),
            ("insurance_relief", self.insurance_relief),
        ];
        let max = Decimal::from(MAX_AMOUNT);

        for (field, amount) in self.earnings().into_iter().chain(claims) {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative (got {})", amount),
                ));
            }
            if amount > max {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not exceed {} (got {})", max, amount),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "basic_salary": "50000.00" }"#;
        let input: PayrollInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.basic_salary, dec("50000.00"));
        assert_eq!(input.housing_allowance, Decimal::ZERO);
        assert_eq!(input.other_deductions, Decimal::ZERO);
        assert_eq!(input.insurance_relief, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_requires_basic_salary() {
        let json = r#"{ "bonus": "1000" }"#;
        let result: Result<PayrollInput, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_gross_earnings_sums_all_seven_components() {
        let input = PayrollInput {
            basic_salary: dec("40000"),
            housing_allowance: dec("5000"),
            transport_allowance: dec("3000"),
            other_taxable_allowances: dec("1000"),
            non_taxable_allowances: dec("2000"),
            overtime_pay: dec("1500.50"),
            bonus: dec("500"),
            other_deductions: dec("999"),
            insurance_relief: dec("300"),
        };
        assert_eq!(input.gross_earnings().unwrap(), dec("53000.50"));
    }

    #[test]
    fn test_gross_earnings_reports_overflow() {
        let input = PayrollInput {
            basic_salary: Decimal::MAX,
            bonus: Decimal::ONE,
            ..PayrollInput::default()
        };

        assert!(matches!(
            input.gross_earnings(),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "bonus"
        ));
    }

    #[test]
    fn test_validate_rejects_amounts_above_maximum() {
        let input = PayrollInput {
            basic_salary: Decimal::MAX,
            bonus: Decimal::ONE,
            ..PayrollInput::default()
        };

        match input.validate() {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "basic_salary");
                assert!(message.contains("must not exceed"), "{}", message);
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_maximum_amount() {
        let max = Decimal::from(MAX_AMOUNT);
        let input = PayrollInput {
            basic_salary: max,
            housing_allowance: max,
            transport_allowance: max,
            other_taxable_allowances: max,
            non_taxable_allowances: max,
            overtime_pay: max,
            bonus: max,
            other_deductions: max,
            insurance_relief: max,
        };

        assert!(input.validate().is_ok());
        assert_eq!(input.gross_earnings().unwrap(), max * Decimal::from(7));
    }

    #[test]
    fn test_validate_accepts_zero_input() {
        assert!(PayrollInput::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_earnings() {
        let input = PayrollInput {
            basic_salary: dec("50000"),
            bonus: dec("-1"),
            ..PayrollInput::default()
        };

        match input.validate() {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "bonus");
                assert!(message.contains("-1"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_claims() {
        let input = PayrollInput {
            basic_salary: dec("50000"),
            insurance_relief: dec("-0.01"),
            ..PayrollInput::default()
        };

        assert!(matches!(
            input.validate(),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "insurance_relief"
        ));
    }

    #[test]
    fn test_validate_accepts_negative_zero() {
        let input = PayrollInput {
            basic_salary: -Decimal::ZERO,
            ..PayrollInput::default()
        };
        assert!(input.validate().is_ok());
    }
}
