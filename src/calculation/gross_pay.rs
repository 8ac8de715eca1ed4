//! Gross pay and taxable gross calculation.
//!
//! Gross pay is the sum of all seven earnings components. Non-taxable
//! allowances are then removed to give the base every contribution and tax
//! stage works from.

use rust_decimal::Decimal;

use crate::models::{AuditStep, BreakdownLine, PayrollInput};

use super::rounding::round_money;

/// The result of the gross pay stage.
#[derive(Debug, Clone)]
pub struct GrossPayResult {
    /// Sum of all earnings components.
    pub gross_pay: Decimal,
    /// Gross pay less non-taxable allowances.
    pub taxable_gross: Decimal,
    /// Non-zero earnings lines for the payslip.
    pub earnings: Vec<BreakdownLine>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn describe(field: &str) -> &'static str {
    match field {
        "basic_salary" => "Basic salary",
        "housing_allowance" => "Housing allowance",
        "transport_allowance" => "Transport allowance",
        "other_taxable_allowances" => "Other taxable allowances",
        "non_taxable_allowances" => "Non-taxable allowances",
        "overtime_pay" => "Overtime",
        "bonus" => "Bonus",
        _ => "Earnings",
    }
}

/// Sums earnings into gross pay and removes non-taxable allowances.
///
/// Each component is rounded to cents before summing, so the payslip lines
/// always add up to the reported gross. `input` must already have passed
/// [`PayrollInput::validate`], which bounds every component.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_gross_pay;
/// use payroll_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     basic_salary: Decimal::new(50000, 0),
///     non_taxable_allowances: Decimal::new(2000, 0),
///     ..PayrollInput::default()
/// };
/// let result = calculate_gross_pay(&input, 1);
/// assert_eq!(result.gross_pay, Decimal::new(5200000, 2));
/// assert_eq!(result.taxable_gross, Decimal::new(5000000, 2));
/// ```
pub fn calculate_gross_pay(input: &PayrollInput, step_number: u32) -> GrossPayResult {
    let earnings: Vec<BreakdownLine> = input
        .earnings()
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(field, amount)| BreakdownLine::new(field, describe(field), round_money(amount)))
        .collect();

    let gross_pay = round_money(earnings.iter().map(|line| line.amount).sum());
    let non_taxable = round_money(input.non_taxable_allowances);
    let taxable_gross = gross_pay - non_taxable;

    let components: serde_json::Map<String, serde_json::Value> = earnings
        .iter()
        .map(|line| (line.code.clone(), line.amount.to_string().into()))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        rate_type: None,
        input: serde_json::json!({ "earnings": components }),
        output: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "non_taxable_allowances": non_taxable.to_string(),
            "taxable_gross": taxable_gross.to_string()
        }),
        reasoning: format!(
            "{} earnings components sum to {}; less non-taxable allowances {} = taxable gross {}",
            earnings.len(),
            gross_pay,
            non_taxable,
            taxable_gross
        ),
    };

    GrossPayResult {
        gross_pay,
        taxable_gross,
        earnings,
        audit_step,
    }
}
