//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures: per-scheme contribution and levy amounts, the payslip
//! breakdown, and the audit trace recording every stage of a computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The contribution made on one tier of a tiered scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSlice {
    /// The tier's name.
    pub tier: String,
    /// Earnings falling inside the tier.
    pub pensionable_amount: Decimal,
    /// Employee contribution on the tier.
    pub employee: Decimal,
    /// Employer contribution on the tier.
    pub employer: Decimal,
}

/// Employee and employer amounts for one tiered contribution scheme.
///
/// # Example
///
/// ```
/// use payroll_engine::models::ContributionAmount;
/// use rust_decimal::Decimal;
///
/// let nssf = ContributionAmount {
///     rate_type: "nssf".to_string(),
///     pensionable_base: Decimal::new(36000, 0),
///     employee: Decimal::new(216000, 2),
///     employer: Decimal::new(216000, 2),
///     tiers: vec![],
/// };
/// assert_eq!(nssf.employee, nssf.employer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionAmount {
    /// The scheme's rate type (e.g., "nssf").
    pub rate_type: String,
    /// Earnings the scheme was charged on, after the top-tier cap.
    pub pensionable_base: Decimal,
    /// Total employee contribution.
    pub employee: Decimal,
    /// Total employer contribution.
    pub employer: Decimal,
    /// Per-tier amounts, in tier order.
    pub tiers: Vec<TierSlice>,
}

/// Employee and employer amounts for one flat levy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyAmount {
    /// The levy's rate type (e.g., "housing_levy").
    pub rate_type: String,
    /// The amount the levy was charged on.
    pub base_amount: Decimal,
    /// Employee portion.
    pub employee: Decimal,
    /// Employer portion.
    pub employer: Decimal,
    /// Whether the employee portion reduced taxable income.
    pub tax_deductible: bool,
}

/// The tax charged inside one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSlice {
    /// The band's name.
    pub band: String,
    /// The band's marginal rate.
    pub rate: Decimal,
    /// Taxable income falling inside the band.
    pub taxable_amount: Decimal,
    /// Tax on that income.
    pub tax: Decimal,
}

/// A single payslip line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Stable machine code (an input field name or a rate type).
    pub code: String,
    /// Human-readable label.
    pub description: String,
    /// The line amount.
    pub amount: Decimal,
}

impl BreakdownLine {
    pub(crate) fn new(code: &str, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            code: code.to_string(),
            description: description.into(),
            amount,
        }
    }
}

/// Payslip-ready breakdown of a computation.
///
/// Renderers read these lines as-is; they never re-derive totals from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipBreakdown {
    /// Non-zero earnings components.
    pub earnings: Vec<BreakdownLine>,
    /// Employee deductions, in computation order.
    pub deductions: Vec<BreakdownLine>,
    /// Employer-only contributions.
    pub employer_contributions: Vec<BreakdownLine>,
    /// Tax charged per band.
    pub tax_bands: Vec<BandSlice>,
}

/// A single step in the audit trace recording a calculation stage.
///
/// Each step captures the input, output, and reasoning for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Identifier of the stage (e.g., "progressive_tax").
    pub rule_id: String,
    /// Human-readable name of the stage.
    pub rule_name: String,
    /// The rate type the stage read, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rate_type: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the arithmetic.
    pub reasoning: String,
}

/// The complete audit trace for a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
}

/// The complete result of a payroll computation.
///
/// Every monetary field is rounded to two decimal places, half-up, at the
/// point the amount is finalized. The value holds no clock or random data,
/// so identical inputs serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Sum of all earnings components.
    pub gross_pay: Decimal,
    /// Gross pay less non-taxable allowances.
    pub taxable_gross: Decimal,
    /// The base progressive tax is charged on.
    pub taxable_income: Decimal,
    /// Tax liability before reliefs.
    pub paye_before_relief: Decimal,
    /// Personal relief used against the tax liability. Below the table
    /// amount when the liability is smaller.
    pub personal_relief: Decimal,
    /// Insurance relief used, after the cap and after personal relief.
    pub insurance_relief: Decimal,
    /// Net tax payable, never below zero.
    pub paye: Decimal,
    /// Tiered contribution schemes, ordered by rate type.
    pub contributions: Vec<ContributionAmount>,
    /// Flat levies, ordered by rate type.
    pub levies: Vec<LevyAmount>,
    /// Ad-hoc deductions passed through from the input.
    pub other_deductions: Decimal,
    /// All employee deductions.
    pub total_deductions: Decimal,
    /// All employer-side contributions.
    pub total_employer_contributions: Decimal,
    /// Take-home pay, never below zero.
    pub net_pay: Decimal,
    /// Payslip breakdown.
    pub breakdown: PayslipBreakdown,
    /// Stage-by-stage audit trace.
    pub trace: AuditTrace,
}

impl PayrollResult {
    /// Returns the amounts for a tiered contribution scheme.
    pub fn contribution(&self, rate_type: &str) -> Option<&ContributionAmount> {
        self.contributions.iter().find(|c| c.rate_type == rate_type)
    }

    /// Returns the amounts for a flat levy.
    pub fn levy(&self, rate_type: &str) -> Option<&LevyAmount> {
        self.levies.iter().find(|l| l.rate_type == rate_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> PayrollResult {
        PayrollResult {
            gross_pay: dec("50000.00"),
            taxable_gross: dec("50000.00"),
            taxable_income: dec("47090.00"),
            paye_before_relief: dec("8910.05"),
            personal_relief: dec("2400.00"),
            insurance_relief: dec("0.00"),
            paye: dec("6510.05"),
            contributions: vec![ContributionAmount {
                rate_type: "nssf".to_string(),
                pensionable_base: dec("36000"),
                employee: dec("2160.00"),
                employer: dec("2160.00"),
                tiers: vec![],
            }],
            levies: vec![LevyAmount {
                rate_type: "sha".to_string(),
                base_amount: dec("50000.00"),
                employee: dec("1375.00"),
                employer: dec("0.00"),
                tax_deductible: false,
            }],
            other_deductions: dec("0"),
            total_deductions: dec("10795.05"),
            total_employer_contributions: dec("2910.00"),
            net_pay: dec("39204.95"),
            breakdown: PayslipBreakdown::default(),
            trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_contribution_lookup_by_rate_type() {
        let result = sample_result();
        assert_eq!(result.contribution("nssf").unwrap().employee, dec("2160.00"));
        assert!(result.contribution("nhif").is_none());
    }

    #[test]
    fn test_levy_lookup_by_rate_type() {
        let result = sample_result();
        assert_eq!(result.levy("sha").unwrap().employee, dec("1375.00"));
        assert!(result.levy("housing_levy").is_none());
    }

    #[test]
    fn test_monetary_fields_serialize_as_strings() {
        let json = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(json["net_pay"], "39204.95");
        assert_eq!(json["paye_before_relief"], "8910.05");
        assert_eq!(json["contributions"][0]["employee"], "2160.00");
    }

    #[test]
    fn test_audit_step_omits_missing_rate_type() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "gross_pay".to_string(),
            rule_name: "Gross Pay".to_string(),
            rate_type: None,
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: "sum of earnings".to_string(),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("rate_type"));

        let back: AuditStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
