//! Tax relief application.
//!
//! Personal relief is a flat amount; insurance relief is the claimed amount
//! capped by the rate table. Both are subtracted from the gross tax
//! liability and net tax is floored at zero. The reported reliefs are the
//! amounts actually used, so they never exceed the liability.

use rust_decimal::Decimal;

use crate::config::Relief;
use crate::models::AuditStep;

use super::rounding::round_money;

/// The result of applying reliefs to a tax liability.
#[derive(Debug, Clone)]
pub struct ReliefResult {
    /// Personal relief used against the liability.
    pub personal_relief: Decimal,
    /// Insurance relief used against the liability, after the cap.
    pub insurance_relief: Decimal,
    /// Net tax payable.
    pub paye: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Subtracts personal and insurance relief from a gross tax liability.
///
/// # Arguments
///
/// * `gross_tax` - Tax liability before reliefs
/// * `personal` - The personal relief definition
/// * `insurance` - The insurance relief definition
/// * `claimed_insurance` - Insurance relief claimed on the input
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::apply_reliefs;
/// use payroll_engine::config::{Relief, ReliefKind};
/// use rust_decimal::Decimal;
///
/// let personal = Relief {
///     rate_type: "personal_relief".to_string(),
///     kind: ReliefKind::Flat,
///     amount: Decimal::new(2400, 0),
/// };
/// let insurance = Relief {
///     rate_type: "insurance_relief".to_string(),
///     kind: ReliefKind::Cap,
///     amount: Decimal::new(5000, 0),
/// };
///
/// let result = apply_reliefs(Decimal::new(891005, 2), &personal, &insurance, Decimal::ZERO, 1);
/// assert_eq!(result.paye, Decimal::new(651005, 2));
/// ```
pub fn apply_reliefs(
    gross_tax: Decimal,
    personal: &Relief,
    insurance: &Relief,
    claimed_insurance: Decimal,
    step_number: u32,
) -> ReliefResult {
    let personal_granted = round_money(personal.applied(Decimal::ZERO));
    let insurance_granted =
        round_money(insurance.applied(claimed_insurance.max(Decimal::ZERO)));

    // Personal relief is used first; insurance relief covers what remains.
    let personal_relief = personal_granted.min(gross_tax.max(Decimal::ZERO));
    let insurance_relief = insurance_granted.min(gross_tax - personal_relief);
    let paye = round_money(gross_tax - personal_relief - insurance_relief);

    let mut reasoning = format!(
        "{} - {} personal - {} insurance",
        gross_tax, personal_granted, insurance_granted
    );
    if insurance_granted < claimed_insurance {
        reasoning.push_str(&format!(
            " (claim {} capped at {})",
            claimed_insurance,
            insurance.amount.normalize()
        ));
    }
    if gross_tax - personal_granted - insurance_granted < Decimal::ZERO {
        reasoning.push_str(&format!(
            " floored at 0 = {}; reliefs used: personal {}, insurance {}",
            paye, personal_relief, insurance_relief
        ));
    } else {
        reasoning.push_str(&format!(" = {}", paye));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_reliefs".to_string(),
        rule_name: "Tax Reliefs".to_string(),
        rate_type: None,
        input: serde_json::json!({
            "paye_before_relief": gross_tax.to_string(),
            "personal_relief": personal.amount.normalize().to_string(),
            "insurance_relief_cap": insurance.amount.normalize().to_string(),
            "insurance_relief_claimed": claimed_insurance.to_string(),
            "insurance_relief_granted": insurance_granted.to_string()
        }),
        output: serde_json::json!({
            "personal_relief": personal_relief.to_string(),
            "insurance_relief": insurance_relief.to_string(),
            "paye": paye.to_string()
        }),
        reasoning,
    };

    ReliefResult {
        personal_relief,
        insurance_relief,
        paye,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReliefKind;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn personal() -> Relief {
        Relief {
            rate_type: "personal_relief".to_string(),
            kind: ReliefKind::Flat,
            amount: dec("2400"),
        }
    }

    fn insurance() -> Relief {
        Relief {
            rate_type: "insurance_relief".to_string(),
            kind: ReliefKind::Cap,
            amount: dec("5000"),
        }
    }

    #[test]
    fn test_personal_relief_only() {
        let result = apply_reliefs(dec("8910.05"), &personal(), &insurance(), Decimal::ZERO, 1);

        assert_eq!(result.personal_relief.to_string(), "2400.00");
        assert_eq!(result.insurance_relief.to_string(), "0.00");
        assert_eq!(result.paye.to_string(), "6510.05");
    }

    #[test]
    fn test_insurance_claim_below_cap() {
        let result = apply_reliefs(dec("8910.05"), &personal(), &insurance(), dec("1500"), 1);

        assert_eq!(result.insurance_relief, dec("1500.00"));
        assert_eq!(result.paye, dec("5010.05"));
    }

    #[test]
    fn test_insurance_claim_above_cap_is_capped() {
        let result = apply_reliefs(dec("8910.05"), &personal(), &insurance(), dec("7000"), 1);

        assert_eq!(result.insurance_relief, dec("5000.00"));
        assert_eq!(result.paye, dec("1510.05"));
        assert!(result.audit_step.reasoning.contains("capped at 5000"));
    }

    #[test]
    fn test_relief_exceeding_tax_floors_at_zero() {
        let result = apply_reliefs(dec("1500.00"), &personal(), &insurance(), Decimal::ZERO, 1);

        assert_eq!(result.paye.to_string(), "0.00");
        assert_eq!(result.personal_relief, dec("1500.00"));
        assert_eq!(result.insurance_relief, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("floored at 0"));
    }

    #[test]
    fn test_insurance_relief_covers_only_remaining_tax() {
        let result = apply_reliefs(dec("3000.00"), &personal(), &insurance(), dec("4000"), 1);

        assert_eq!(result.personal_relief, dec("2400.00"));
        assert_eq!(result.insurance_relief, dec("600.00"));
        assert_eq!(result.paye, dec("0.00"));
        assert_eq!(result.audit_step.input["insurance_relief_granted"], "4000.00");
    }

    #[test]
    fn test_no_relief_reported_without_tax() {
        let result = apply_reliefs(dec("0.00"), &personal(), &insurance(), dec("1000"), 1);

        assert_eq!(result.personal_relief, Decimal::ZERO);
        assert_eq!(result.insurance_relief, Decimal::ZERO);
        assert_eq!(result.paye.to_string(), "0.00");
    }

    #[test]
    fn test_audit_step_reports_reliefs() {
        let result = apply_reliefs(dec("8910.05"), &personal(), &insurance(), Decimal::ZERO, 9);

        assert_eq!(result.audit_step.step_number, 9);
        assert_eq!(result.audit_step.rule_id, "tax_reliefs");
        assert_eq!(result.audit_step.output["paye"], "6510.05");
    }
}
