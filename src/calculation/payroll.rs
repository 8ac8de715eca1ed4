//! End-to-end payroll computation.
//!
//! [`compute_payroll`] runs every stage in statutory order against one
//! validated [`RateTable`]:
//!
//! 1. gross pay and taxable gross
//! 2. tiered contributions
//! 3. tax-deductible levies
//! 4. taxable income
//! 5. progressive tax
//! 6. reliefs
//! 7. levies charged after tax
//! 8. totals and net pay
//!
//! The function reads nothing but its arguments, so identical inputs always
//! serialize to identical bytes.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{INSURANCE_RELIEF, PAYE_BAND, PERSONAL_RELIEF, RateTable};
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, BandSlice, BreakdownLine, ContributionAmount, LevyAmount,
    PayrollInput, PayrollResult, PayslipBreakdown,
};

use super::flat_levy::calculate_flat_levy;
use super::gross_pay::calculate_gross_pay;
use super::progressive_tax::calculate_progressive_tax;
use super::reliefs::apply_reliefs;
use super::rounding::round_money;
use super::tiered_contribution::calculate_tiered_contribution;

/// Computes statutory deductions and net pay for one employee.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
/// naming the first negative or oversized input field, or
/// [`EngineError::MissingRateType`](crate::error::EngineError::MissingRateType)
/// if the table lacks a rate type the calculation reads. Nothing is computed
/// when either is returned.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::calculation::compute_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/ke").unwrap();
/// let rates = loader
///     .rate_table(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
///     .unwrap();
/// let input = PayrollInput {
///     basic_salary: Decimal::new(50000, 0),
///     ..PayrollInput::default()
/// };
///
/// let result = compute_payroll(&input, &rates).unwrap();
/// assert_eq!(result.net_pay.to_string(), "39204.95");
/// ```
pub fn compute_payroll(input: &PayrollInput, rates: &RateTable) -> EngineResult<PayrollResult> {
    input.validate()?;

    // Resolve everything up front so a missing rate type fails before any stage runs.
    let bands = rates.bands_for(PAYE_BAND)?;
    let personal = rates.relief_for(PERSONAL_RELIEF)?;
    let insurance = rates.relief_for(INSURANCE_RELIEF)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    let gross = calculate_gross_pay(input, step_number);
    let gross_pay = gross.gross_pay;
    let taxable_gross = gross.taxable_gross;
    steps.push(gross.audit_step);
    step_number += 1;

    let mut contributions: Vec<ContributionAmount> = Vec::new();
    for scheme in rates.contribution_schemes() {
        let result = calculate_tiered_contribution(scheme, taxable_gross, step_number);
        contributions.push(result.contribution);
        steps.push(result.audit_step);
        step_number += 1;
    }

    let mut deductible_levies: Vec<LevyAmount> = Vec::new();
    for levy in rates.levies().filter(|l| l.tax_deductible) {
        let result = calculate_flat_levy(levy, gross_pay, taxable_gross, step_number);
        deductible_levies.push(result.levy);
        steps.push(result.audit_step);
        step_number += 1;
    }

    let contributions_employee: Decimal = contributions.iter().map(|c| c.employee).sum();
    let deductible_employee: Decimal = deductible_levies.iter().map(|l| l.employee).sum();
    let taxable_income = round_money(
        (taxable_gross - contributions_employee - deductible_employee).max(Decimal::ZERO),
    );
    steps.push(AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        rate_type: None,
        input: serde_json::json!({
            "taxable_gross": taxable_gross.to_string(),
            "contributions": contributions_employee.to_string(),
            "deductible_levies": deductible_employee.to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.to_string()
        }),
        reasoning: format!(
            "{} - {} contributions - {} deductible levies = {}",
            taxable_gross, contributions_employee, deductible_employee, taxable_income
        ),
    });
    step_number += 1;

    let tax = calculate_progressive_tax(bands, taxable_income, step_number);
    let paye_before_relief = tax.tax;
    let tax_bands = tax.slices;
    steps.push(tax.audit_step);
    step_number += 1;

    let reliefs = apply_reliefs(
        paye_before_relief,
        personal,
        insurance,
        input.insurance_relief,
        step_number,
    );
    let paye = reliefs.paye;
    steps.push(reliefs.audit_step);
    step_number += 1;

    let mut post_tax_levies: Vec<LevyAmount> = Vec::new();
    for levy in rates.levies().filter(|l| !l.tax_deductible) {
        let result = calculate_flat_levy(levy, gross_pay, taxable_gross, step_number);
        post_tax_levies.push(result.levy);
        steps.push(result.audit_step);
        step_number += 1;
    }

    let other_deductions = round_money(input.other_deductions);
    let levies_employee: Decimal = deductible_levies
        .iter()
        .chain(&post_tax_levies)
        .map(|l| l.employee)
        .sum();
    let total_deductions =
        round_money(paye + contributions_employee + levies_employee + other_deductions);
    let total_employer_contributions = round_money(
        contributions.iter().map(|c| c.employer).sum::<Decimal>()
            + deductible_levies
                .iter()
                .chain(&post_tax_levies)
                .map(|l| l.employer)
                .sum::<Decimal>(),
    );
    let net_pay = round_money((gross_pay - total_deductions).max(Decimal::ZERO));

    let net_reasoning = if gross_pay < total_deductions {
        format!(
            "Deductions {} exceed gross {}; net pay floored at 0",
            total_deductions, gross_pay
        )
    } else {
        format!("{} - {} = {}", gross_pay, total_deductions, net_pay)
    };
    steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        rate_type: None,
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "paye": paye.to_string(),
            "contributions": contributions_employee.to_string(),
            "levies": levies_employee.to_string(),
            "other_deductions": other_deductions.to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.to_string(),
            "total_employer_contributions": total_employer_contributions.to_string(),
            "net_pay": net_pay.to_string()
        }),
        reasoning: net_reasoning,
    });

    let breakdown = build_breakdown(
        gross.earnings,
        &contributions,
        &deductible_levies,
        paye,
        &post_tax_levies,
        other_deductions,
        tax_bands,
    );

    let mut levies: Vec<LevyAmount> = deductible_levies;
    levies.extend(post_tax_levies);
    levies.sort_by(|a, b| a.rate_type.cmp(&b.rate_type));

    debug!(
        gross_pay = %gross_pay,
        taxable_income = %taxable_income,
        paye = %paye,
        total_deductions = %total_deductions,
        net_pay = %net_pay,
        steps = steps.len(),
        "Payroll computed"
    );

    Ok(PayrollResult {
        gross_pay,
        taxable_gross,
        taxable_income,
        paye_before_relief,
        personal_relief: reliefs.personal_relief,
        insurance_relief: reliefs.insurance_relief,
        paye,
        contributions,
        levies,
        other_deductions,
        total_deductions,
        total_employer_contributions,
        net_pay,
        breakdown,
        trace: AuditTrace { steps },
    })
}

fn build_breakdown(
    earnings: Vec<BreakdownLine>,
    contributions: &[ContributionAmount],
    deductible_levies: &[LevyAmount],
    paye: Decimal,
    post_tax_levies: &[LevyAmount],
    other_deductions: Decimal,
    tax_bands: Vec<BandSlice>,
) -> PayslipBreakdown {
    let mut deductions = Vec::new();
    let mut employer_contributions = Vec::new();

    for c in contributions {
        deductions.push(BreakdownLine::new(
            &c.rate_type,
            format!("{} contribution", c.rate_type),
            c.employee,
        ));
        if c.employer > Decimal::ZERO {
            employer_contributions.push(BreakdownLine::new(
                &c.rate_type,
                format!("{} employer contribution", c.rate_type),
                c.employer,
            ));
        }
    }

    push_levy_lines(deductible_levies, &mut deductions);
    deductions.push(BreakdownLine::new("paye", "PAYE", paye));
    push_levy_lines(post_tax_levies, &mut deductions);
    if !other_deductions.is_zero() {
        deductions.push(BreakdownLine::new(
            "other_deductions",
            "Other deductions",
            other_deductions,
        ));
    }

    for l in deductible_levies.iter().chain(post_tax_levies) {
        if l.employer > Decimal::ZERO {
            employer_contributions.push(BreakdownLine::new(
                &l.rate_type,
                format!("{} employer levy", l.rate_type),
                l.employer,
            ));
        }
    }

    PayslipBreakdown {
        earnings,
        deductions,
        employer_contributions,
        tax_bands,
    }
}

fn push_levy_lines(levies: &[LevyAmount], lines: &mut Vec<BreakdownLine>) {
    for l in levies {
        lines.push(BreakdownLine::new(
            &l.rate_type,
            format!("{} levy", l.rate_type),
            l.employee,
        ));
    }
}
