//! Tiered contribution calculation (e.g., NSSF).
//!
//! ## Tier Structure
//!
//! A scheme is an ordered list of cumulative ceilings. The pensionable base
//! is taxable gross capped at the top ceiling, and it is consumed tier by
//! tier: each tier charges its rate only on the slice between the previous
//! ceiling and its own. Earnings above the top ceiling contribute nothing.

use rust_decimal::Decimal;

use crate::config::TieredContribution;
use crate::models::{AuditStep, ContributionAmount, TierSlice};

use super::rounding::round_money;

/// The result of a tiered contribution calculation.
#[derive(Debug, Clone)]
pub struct TieredContributionResult {
    /// Employee and employer amounts with per-tier detail.
    pub contribution: ContributionAmount,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employee and employer contributions for one tiered scheme.
///
/// Each tier's employee and employer amounts are rounded independently and
/// the scheme totals are the sums of the rounded tiers.
///
/// # Arguments
///
/// * `scheme` - The validated tier scheme
/// * `taxable_gross` - Gross pay less non-taxable allowances
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::calculation::calculate_tiered_contribution;
/// use payroll_engine::config::{RateRow, RateTable};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rows = vec![
///     RateRow::tax_band("band_1", Decimal::ZERO, None, dec("0.10")),
///     RateRow::relief("personal_relief", dec("2400")),
///     RateRow::relief_cap("insurance_relief", dec("5000")),
///     RateRow::contribution_tier("nssf", "tier_1", dec("7000"), dec("0.06")),
///     RateRow::contribution_tier("nssf", "tier_2", dec("36000"), dec("0.06")),
/// ];
/// let table = RateTable::from_rows(&rows, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(), &["nssf"]).unwrap();
///
/// let result = calculate_tiered_contribution(table.tier_scheme_for("nssf").unwrap(), dec("50000"), 1);
/// assert_eq!(result.contribution.employee, dec("2160.00"));
/// assert_eq!(result.contribution.employer, dec("2160.00"));
/// ```
pub fn calculate_tiered_contribution(
    scheme: &TieredContribution,
    taxable_gross: Decimal,
    step_number: u32,
) -> TieredContributionResult {
    let top_ceiling = scheme.top_ceiling();
    let pensionable_base = taxable_gross.max(Decimal::ZERO).min(top_ceiling);

    let (tiers, _) = scheme.tiers.iter().fold(
        (Vec::with_capacity(scheme.tiers.len()), Decimal::ZERO),
        |(mut slices, floor), tier| {
            let width = tier.ceiling - floor;
            let pensionable_amount = (pensionable_base - floor).max(Decimal::ZERO).min(width);
            slices.push(TierSlice {
                tier: tier.name.clone(),
                pensionable_amount,
                employee: round_money(pensionable_amount * tier.employee_rate),
                employer: round_money(pensionable_amount * tier.employer_rate),
            });
            (slices, tier.ceiling)
        },
    );

    let employee: Decimal = tiers.iter().map(|t| t.employee).sum();
    let employer: Decimal = tiers.iter().map(|t| t.employer).sum();

    let tier_detail: Vec<String> = tiers
        .iter()
        .zip(&scheme.tiers)
        .map(|(slice, tier)| {
            format!(
                "{} x {} = {}",
                slice.pensionable_amount.normalize(),
                tier.employee_rate.normalize(),
                slice.employee
            )
        })
        .collect();

    let reasoning = if taxable_gross > top_ceiling {
        format!(
            "Taxable gross {} capped at top ceiling {}; {} = {}",
            taxable_gross,
            top_ceiling.normalize(),
            tier_detail.join(" + "),
            employee
        )
    } else {
        format!("{} = {}", tier_detail.join(" + "), employee)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tiered_contribution".to_string(),
        rule_name: "Tiered Contribution".to_string(),
        rate_type: Some(scheme.rate_type.clone()),
        input: serde_json::json!({
            "taxable_gross": taxable_gross.to_string(),
            "top_ceiling": top_ceiling.normalize().to_string(),
            "tiers": scheme.tiers.iter().map(|t| serde_json::json!({
                "name": t.name,
                "ceiling": t.ceiling.normalize().to_string(),
                "employee_rate": t.employee_rate.normalize().to_string(),
                "employer_rate": t.employer_rate.normalize().to_string()
            })).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "pensionable_base": pensionable_base.to_string(),
            "employee": employee.to_string(),
            "employer": employer.to_string(),
            "capped": taxable_gross > top_ceiling
        }),
        reasoning,
    };

    TieredContributionResult {
        contribution: ContributionAmount {
            rate_type: scheme.rate_type.clone(),
            pensionable_base,
            employee,
            employer,
            tiers,
        },
        audit_step,
    }
}
