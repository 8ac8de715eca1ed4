//! Progressive income tax (PAYE) calculation.
//!
//! ## Band Walking
//!
//! Bands are walked in ascending order. The income taxed inside a band is
//! `clamp(taxable_income - band.min, 0, band.max - previous.max)`: the
//! slice starts at the band's own lower bound and is as wide as the distance
//! between consecutive upper bounds. For half-open bounds (each band starts
//! at the previous upper bound) the slices add up to the taxable income
//! exactly. For inclusive whole-unit bounds (each band starts one unit above
//! the previous upper bound) this reproduces the statutory tables published
//! in that form.

use rust_decimal::Decimal;

use crate::config::TaxBandSet;
use crate::models::{AuditStep, BandSlice};

use super::rounding::round_money;

/// The result of a progressive tax calculation.
#[derive(Debug, Clone)]
pub struct ProgressiveTaxResult {
    /// Bands that taxed a non-zero amount, in ascending order.
    pub slices: Vec<BandSlice>,
    /// Tax liability before reliefs.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates tax liability on a taxable income by walking the band set.
///
/// Each band's tax is rounded independently; the liability is the sum of
/// the rounded band amounts.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_progressive_tax;
/// use payroll_engine::config::{TaxBand, TaxBandSet};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let band = |name: &str, min: &str, max: Option<&str>, rate: &str| TaxBand {
///     name: name.to_string(),
///     min: dec(min),
///     max: max.map(dec),
///     rate: dec(rate),
/// };
/// let bands = TaxBandSet {
///     rate_type: "paye_band".to_string(),
///     bands: vec![
///         band("band_1", "0", Some("24000"), "0.10"),
///         band("band_2", "24001", Some("32333"), "0.25"),
///         band("band_3", "32334", None, "0.30"),
///     ],
/// };
///
/// let result = calculate_progressive_tax(&bands, dec("47090"), 1);
/// assert_eq!(result.tax, dec("8910.05"));
/// ```
pub fn calculate_progressive_tax(
    bands: &TaxBandSet,
    taxable_income: Decimal,
    step_number: u32,
) -> ProgressiveTaxResult {
    let income = taxable_income.max(Decimal::ZERO);
    let first_min = bands.bands.first().map(|b| b.min).unwrap_or(Decimal::ZERO);

    let (slices, _) = bands.bands.iter().fold(
        (Vec::new(), first_min),
        |(mut slices, previous_max), band| {
            let above_min = (income - band.min).max(Decimal::ZERO);
            let taxable_amount = match band.max {
                Some(max) => above_min.min(max - previous_max),
                None => above_min,
            };
            if taxable_amount > Decimal::ZERO {
                slices.push(BandSlice {
                    band: band.name.clone(),
                    rate: band.rate,
                    taxable_amount,
                    tax: round_money(taxable_amount * band.rate),
                });
            }
            (slices, band.max.unwrap_or(previous_max))
        },
    );

    let tax = round_money(slices.iter().map(|s| s.tax).sum());

    let reasoning = if slices.is_empty() {
        format!("Taxable income {} attracts no tax", income)
    } else {
        let parts: Vec<String> = slices
            .iter()
            .map(|s| {
                format!(
                    "{} x {} = {}",
                    s.taxable_amount.normalize(),
                    s.rate.normalize(),
                    s.tax
                )
            })
            .collect();
        format!("{}; total {}", parts.join(" + "), tax)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "progressive_tax".to_string(),
        rule_name: "Progressive Tax".to_string(),
        rate_type: Some(bands.rate_type.clone()),
        input: serde_json::json!({
            "taxable_income": income.to_string(),
            "band_count": bands.bands.len()
        }),
        output: serde_json::json!({
            "bands": slices.iter().map(|s| serde_json::json!({
                "band": s.band,
                "taxable_amount": s.taxable_amount.to_string(),
                "tax": s.tax.to_string()
            })).collect::<Vec<_>>(),
            "tax": tax.to_string()
        }),
        reasoning,
    };

    ProgressiveTaxResult {
        slices,
        tax,
        audit_step,
    }
}
