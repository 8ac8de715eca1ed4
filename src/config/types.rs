//! Configuration types for statutory rate tables.
//!
//! This module contains the strongly-typed row and metadata structures that
//! are deserialized from YAML configuration files. A row mirrors one record
//! of a `statutory_rates` store: it belongs to a `rate_type`, carries a
//! `kind` that says how the engine reads it, and is effective-dated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the jurisdiction a rate configuration belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short jurisdiction code (e.g., "KE").
    pub code: String,
    /// The human-readable name of the jurisdiction.
    pub name: String,
    /// ISO currency code amounts are expressed in.
    pub currency: String,
    /// URL to the issuing authority's published rates.
    pub source_url: String,
    /// Rate types that must have an active row on any resolved date,
    /// in addition to the ones the calculator always needs.
    #[serde(default)]
    pub required_rate_types: Vec<String>,
}

/// How the engine interprets a rate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// A progressive income-tax band (`min_amount`, `max_amount`, `rate`).
    TaxBand,
    /// One tier of a tiered contribution (`max_amount` is the tier ceiling).
    ContributionTier,
    /// A flat-rate levy on a base amount.
    Levy,
    /// A flat relief amount subtracted from tax liability.
    Relief,
    /// A claimed relief, capped at `amount`.
    ReliefCap,
}

/// The amount a flat levy is charged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyBase {
    /// Total gross pay, including non-taxable allowances.
    #[default]
    GrossPay,
    /// Gross pay less non-taxable allowances.
    TaxableGross,
}

/// A single effective-dated statutory rate row.
///
/// Fields that do not apply to a row's `kind` are left empty. Which fields
/// each kind requires is enforced when a [`RateTable`](super::RateTable) is
/// built from the rows.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{RateKind, RateRow};
/// use rust_decimal::Decimal;
///
/// let row = RateRow::tax_band("band_1", Decimal::ZERO, Some(Decimal::new(24000, 0)), Decimal::new(10, 2));
/// assert_eq!(row.kind, RateKind::TaxBand);
/// assert_eq!(row.rate_type, "paye_band");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    /// The statutory scheme this row belongs to (e.g., "paye_band", "nssf").
    pub rate_type: String,
    /// The row's name, unique within its rate type on any given date.
    pub name: String,
    /// How the row is interpreted.
    pub kind: RateKind,
    /// Lower bound of a band or tier.
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    /// Upper bound of a band, ceiling of a tier. `None` means unbounded.
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// Employee-side (or only) rate, as a fraction in `[0, 1]`.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Employer-side rate. `None` means the employer matches `rate`.
    #[serde(default)]
    pub employer_rate: Option<Decimal>,
    /// Flat relief amount or relief cap.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Whether the employee portion of a levy reduces taxable income.
    #[serde(default)]
    pub tax_deductible: bool,
    /// The base a levy is charged on.
    #[serde(default)]
    pub base: LevyBase,
    /// First date the row applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the row applies (inclusive). `None` means open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl RateRow {
    fn empty(rate_type: &str, name: &str, kind: RateKind) -> Self {
        Self {
            rate_type: rate_type.to_string(),
            name: name.to_string(),
            kind,
            min_amount: None,
            max_amount: None,
            rate: None,
            employer_rate: None,
            amount: None,
            tax_deductible: false,
            base: LevyBase::GrossPay,
            effective_from: NaiveDate::MIN,
            effective_to: None,
        }
    }

    /// Creates a `paye_band` row.
    pub fn tax_band(name: &str, min: Decimal, max: Option<Decimal>, rate: Decimal) -> Self {
        Self {
            min_amount: Some(min),
            max_amount: max,
            rate: Some(rate),
            ..Self::empty(super::PAYE_BAND, name, RateKind::TaxBand)
        }
    }

    /// Creates a contribution tier row with a matching employer rate.
    pub fn contribution_tier(rate_type: &str, name: &str, ceiling: Decimal, rate: Decimal) -> Self {
        Self {
            max_amount: Some(ceiling),
            rate: Some(rate),
            ..Self::empty(rate_type, name, RateKind::ContributionTier)
        }
    }

    /// Creates a flat levy row on gross pay with a matching employer rate.
    pub fn levy(rate_type: &str, rate: Decimal) -> Self {
        Self {
            rate: Some(rate),
            ..Self::empty(rate_type, rate_type, RateKind::Levy)
        }
    }

    /// Creates a flat relief row.
    pub fn relief(rate_type: &str, amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::empty(rate_type, rate_type, RateKind::Relief)
        }
    }

    /// Creates a capped relief row.
    pub fn relief_cap(rate_type: &str, cap: Decimal) -> Self {
        Self {
            amount: Some(cap),
            ..Self::empty(rate_type, rate_type, RateKind::ReliefCap)
        }
    }

    /// Sets an explicit employer rate.
    pub fn with_employer_rate(mut self, employer_rate: Decimal) -> Self {
        self.employer_rate = Some(employer_rate);
        self
    }

    /// Marks a levy's employee portion as deductible from taxable income.
    pub fn tax_deductible(mut self) -> Self {
        self.tax_deductible = true;
        self
    }

    /// Sets the base a levy is charged on.
    pub fn on_base(mut self, base: LevyBase) -> Self {
        self.base = base;
        self
    }

    /// Restricts the row to an effective date range.
    pub fn effective(mut self, from: NaiveDate, to: Option<NaiveDate>) -> Self {
        self.effective_from = from;
        self.effective_to = to;
        self
    }

    /// Returns true if the row applies on the given date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }
}
