//! The validated, immutable statutory rate snapshot.
//!
//! A [`RateTable`] is resolved from effective-dated [`RateRow`]s for a single
//! date. Construction performs every structural check up front, so the
//! calculator can walk bands and tiers without re-validating them.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::types::{LevyBase, RateKind, RateRow};

/// Rate type holding the progressive income-tax bands.
pub const PAYE_BAND: &str = "paye_band";

/// Rate type holding the flat personal relief.
pub const PERSONAL_RELIEF: &str = "personal_relief";

/// Rate type holding the insurance relief cap.
pub const INSURANCE_RELIEF: &str = "insurance_relief";

/// Rate types the calculator cannot run without.
pub const CORE_RATE_TYPES: [&str; 3] = [PAYE_BAND, PERSONAL_RELIEF, INSURANCE_RELIEF];

/// A single progressive tax band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    /// The band's name.
    pub name: String,
    /// The lowest amount taxed in this band.
    pub min: Decimal,
    /// The band's upper bound. `None` for the open top band.
    pub max: Option<Decimal>,
    /// The marginal rate for income inside the band.
    pub rate: Decimal,
}

/// An ordered, contiguous set of tax bands covering `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBandSet {
    /// The rate type the bands were read from.
    pub rate_type: String,
    /// Bands in ascending order.
    pub bands: Vec<TaxBand>,
}

/// One tier of a tiered contribution scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTier {
    /// The tier's name.
    pub name: String,
    /// Cumulative earnings ceiling of the tier.
    pub ceiling: Decimal,
    /// Employee rate on earnings inside the tier.
    pub employee_rate: Decimal,
    /// Employer rate on earnings inside the tier.
    pub employer_rate: Decimal,
}

/// A tiered contribution scheme (e.g., NSSF).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredContribution {
    /// The scheme's rate type.
    pub rate_type: String,
    /// Tiers in ascending ceiling order.
    pub tiers: Vec<ContributionTier>,
}

impl TieredContribution {
    /// Returns the ceiling of the top tier; earnings above it are not pensionable.
    pub fn top_ceiling(&self) -> Decimal {
        self.tiers.last().map(|t| t.ceiling).unwrap_or(Decimal::ZERO)
    }
}

/// A flat-rate levy (e.g., SHA, housing levy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatLevy {
    /// The levy's rate type.
    pub rate_type: String,
    /// Employee rate on the base.
    pub employee_rate: Decimal,
    /// Employer rate on the base.
    pub employer_rate: Decimal,
    /// The amount the levy is charged on.
    pub base: LevyBase,
    /// Whether the employee portion reduces taxable income.
    pub tax_deductible: bool,
}

/// Whether a relief is a fixed amount or a cap on a claimed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefKind {
    /// Always applied in full.
    Flat,
    /// Applied up to the claimed amount, never above the cap.
    Cap,
}

/// A relief subtracted from tax liability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relief {
    /// The relief's rate type.
    pub rate_type: String,
    /// Flat or capped.
    pub kind: ReliefKind,
    /// The flat amount or the cap.
    pub amount: Decimal,
}

impl Relief {
    /// Returns the relief granted for a claimed amount.
    ///
    /// Flat reliefs ignore the claim.
    pub fn applied(&self, claimed: Decimal) -> Decimal {
        match self.kind {
            ReliefKind::Flat => self.amount,
            ReliefKind::Cap => claimed.min(self.amount),
        }
    }
}

/// The serialized form of a [`RateTable`]: the rows a collaborator resolved
/// for one date, plus the rate types that must be present.
///
/// Deserializing a [`RateTable`] reads this shape and runs it through
/// [`RateTable::from_rows`], so a table built from JSON or YAML is validated
/// exactly like one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// The date the rows are resolved for.
    pub effective_date: NaiveDate,
    /// Rate rows; rows not active on `effective_date` are ignored.
    pub rows: Vec<RateRow>,
    /// Rate types that must have an active row, beyond the core ones.
    #[serde(default)]
    pub required_rate_types: Vec<String>,
}

/// A validated snapshot of statutory parameters for one effective date.
///
/// The table exposes read-only queries only. Rate changes are made by
/// building a new table. The only ways to obtain one are
/// [`RateTable::from_rows`] and deserializing a [`RateSnapshot`], and both
/// validate.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::config::{RateRow, RateTable};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     RateRow::tax_band("band_1", Decimal::ZERO, Some(Decimal::new(24000, 0)), Decimal::new(10, 2)),
///     RateRow::tax_band("band_2", Decimal::new(24000, 0), None, Decimal::new(30, 2)),
///     RateRow::relief("personal_relief", Decimal::new(2400, 0)),
///     RateRow::relief_cap("insurance_relief", Decimal::new(5000, 0)),
/// ];
/// let table = RateTable::from_rows(&rows, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(), &[])?;
/// assert_eq!(table.bands_for("paye_band")?.bands.len(), 2);
///
/// // A statutory scheme the caller requires must have rows.
/// let err = RateTable::from_rows(&rows, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(), &["nssf"]);
/// assert!(err.is_err());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RateSnapshot")]
pub struct RateTable {
    effective_date: NaiveDate,
    required_rate_types: Vec<String>,
    band_sets: BTreeMap<String, TaxBandSet>,
    contributions: BTreeMap<String, TieredContribution>,
    levies: BTreeMap<String, FlatLevy>,
    reliefs: BTreeMap<String, Relief>,
}

impl RateTable {
    /// Builds a table from the rows active on `as_of`.
    ///
    /// `required` lists the statutory schemes (e.g. `nssf`, `sha`) the
    /// jurisdiction mandates; each must have an active row. The core rate
    /// types are always required.
    ///
    /// # Errors
    ///
    /// - `InvalidRateTable` if two active rows share a `(rate_type, name)`, a
    ///   rate type mixes kinds, a row lacks a field its kind needs, a rate is
    ///   outside `[0, 1]`, bands/tiers are unsorted, overlapping or gapped,
    ///   or a core relief is configured with the wrong kind.
    /// - `MissingRateType` if `paye_band`, `personal_relief`,
    ///   `insurance_relief` or any `required` rate type has no active row.
    pub fn from_rows(
        rows: &[RateRow],
        as_of: NaiveDate,
        required: &[&str],
    ) -> EngineResult<Self> {
        let active: Vec<&RateRow> = rows.iter().filter(|r| r.is_active_on(as_of)).collect();

        let mut seen = HashSet::new();
        for row in &active {
            if !seen.insert((row.rate_type.as_str(), row.name.as_str())) {
                return Err(EngineError::invalid_rate_table(
                    &row.rate_type,
                    format!("more than one active row named '{}' on {}", row.name, as_of),
                ));
            }
        }

        // Group preserving row order; order within a group is significant.
        let mut groups: BTreeMap<&str, Vec<&RateRow>> = BTreeMap::new();
        for row in active {
            groups.entry(row.rate_type.as_str()).or_default().push(row);
        }

        let mut table = Self {
            effective_date: as_of,
            required_rate_types: required.iter().map(|r| r.to_string()).collect(),
            band_sets: BTreeMap::new(),
            contributions: BTreeMap::new(),
            levies: BTreeMap::new(),
            reliefs: BTreeMap::new(),
        };

        for (rate_type, rows) in groups {
            let kind = rows[0].kind;
            if rows.iter().any(|r| r.kind != kind) {
                return Err(EngineError::invalid_rate_table(
                    rate_type,
                    "rows of different kinds share one rate type",
                ));
            }

            match kind {
                RateKind::TaxBand => {
                    table
                        .band_sets
                        .insert(rate_type.to_string(), build_band_set(rate_type, &rows)?);
                }
                RateKind::ContributionTier => {
                    table
                        .contributions
                        .insert(rate_type.to_string(), build_tiers(rate_type, &rows)?);
                }
                RateKind::Levy => {
                    table
                        .levies
                        .insert(rate_type.to_string(), build_levy(rate_type, &rows)?);
                }
                RateKind::Relief | RateKind::ReliefCap => {
                    table
                        .reliefs
                        .insert(rate_type.to_string(), build_relief(rate_type, &rows)?);
                }
            }
        }

        table.ensure_defined(&CORE_RATE_TYPES)?;
        table.ensure_defined(required)?;
        Ok(table)
    }

    /// The non-core rate types this table was required to define.
    pub fn required_rate_types(&self) -> &[String] {
        &self.required_rate_types
    }

    /// Fails with `MissingRateType` for the first listed rate type that has no rows.
    pub fn ensure_defined<S: AsRef<str>>(&self, rate_types: &[S]) -> EngineResult<()> {
        match rate_types
            .iter()
            .map(AsRef::as_ref)
            .find(|rate_type| !self.defines(rate_type))
        {
            Some(missing) => Err(EngineError::missing_rate_type(missing)),
            None => Ok(()),
        }
    }

    /// Returns true if any active row has the given rate type.
    pub fn defines(&self, rate_type: &str) -> bool {
        self.band_sets.contains_key(rate_type)
            || self.contributions.contains_key(rate_type)
            || self.levies.contains_key(rate_type)
            || self.reliefs.contains_key(rate_type)
    }

    /// The date the table was resolved for.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Returns the band set for a rate type.
    pub fn bands_for(&self, rate_type: &str) -> EngineResult<&TaxBandSet> {
        self.band_sets
            .get(rate_type)
            .ok_or_else(|| EngineError::missing_rate_type(rate_type))
    }

    /// Returns the tiered contribution scheme with the given name.
    pub fn tier_scheme_for(&self, name: &str) -> EngineResult<&TieredContribution> {
        self.contributions
            .get(name)
            .ok_or_else(|| EngineError::missing_rate_type(name))
    }

    /// Returns the flat levy with the given name.
    pub fn levy_for(&self, name: &str) -> EngineResult<&FlatLevy> {
        self.levies
            .get(name)
            .ok_or_else(|| EngineError::missing_rate_type(name))
    }

    /// Returns the relief with the given name.
    pub fn relief_for(&self, name: &str) -> EngineResult<&Relief> {
        self.reliefs
            .get(name)
            .ok_or_else(|| EngineError::missing_rate_type(name))
    }

    /// All tiered contribution schemes, ordered by rate type.
    pub fn contribution_schemes(&self) -> impl Iterator<Item = &TieredContribution> {
        self.contributions.values()
    }

    /// All flat levies, ordered by rate type.
    pub fn levies(&self) -> impl Iterator<Item = &FlatLevy> {
        self.levies.values()
    }
}

impl TryFrom<RateSnapshot> for RateTable {
    type Error = EngineError;

    fn try_from(snapshot: RateSnapshot) -> EngineResult<Self> {
        let required: Vec<&str> = snapshot
            .required_rate_types
            .iter()
            .map(String::as_str)
            .collect();
        Self::from_rows(&snapshot.rows, snapshot.effective_date, &required)
    }
}

fn require(row: &RateRow, value: Option<Decimal>, field: &str) -> EngineResult<Decimal> {
    value.ok_or_else(|| {
        EngineError::invalid_rate_table(
            &row.rate_type,
            format!("row '{}' has no {}", row.name, field),
        )
    })
}

fn check_rate(row: &RateRow, rate: Decimal) -> EngineResult<Decimal> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::invalid_rate_table(
            &row.rate_type,
            format!("row '{}' has rate {} outside [0, 1]", row.name, rate),
        ));
    }
    Ok(rate)
}

fn check_amount(row: &RateRow, amount: Decimal, field: &str) -> EngineResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(EngineError::invalid_rate_table(
            &row.rate_type,
            format!("row '{}' has negative {}", row.name, field),
        ));
    }
    Ok(amount)
}

fn single<'a>(rate_type: &str, rows: &[&'a RateRow]) -> EngineResult<&'a RateRow> {
    match rows {
        [row] => Ok(*row),
        _ => Err(EngineError::invalid_rate_table(
            rate_type,
            format!("expected one active row, found {}", rows.len()),
        )),
    }
}

/// Bands must start at 0, be listed in ascending order, and each band must
/// begin where the previous one ends. Either every band starts at the
/// previous upper bound (half-open bounds) or every band starts one unit
/// above it (inclusive whole-unit bounds); mixing the two is a gap or an
/// overlap. Only the last band may be open-ended, and it must be.
fn build_band_set(rate_type: &str, rows: &[&RateRow]) -> EngineResult<TaxBandSet> {
    let mut bands = Vec::with_capacity(rows.len());
    let mut step: Option<Decimal> = None;

    for row in rows {
        let min = check_amount(row, require(row, row.min_amount, "min_amount")?, "min_amount")?;
        let rate = check_rate(row, require(row, row.rate, "rate")?)?;
        let max = match row.max_amount {
            Some(max) if max <= min => {
                return Err(EngineError::invalid_rate_table(
                    rate_type,
                    format!("band '{}' has max {} not above min {}", row.name, max, min),
                ));
            }
            other => other,
        };

        match bands.last() {
            None if min != Decimal::ZERO => {
                return Err(EngineError::invalid_rate_table(
                    rate_type,
                    format!("first band '{}' starts at {} instead of 0", row.name, min),
                ));
            }
            None => {}
            Some(TaxBand { max: None, name, .. }) => {
                return Err(EngineError::invalid_rate_table(
                    rate_type,
                    format!("band '{}' follows open-ended band '{}'", row.name, name),
                ));
            }
            Some(TaxBand {
                max: Some(prev_max),
                name,
                ..
            }) => {
                let gap = min - *prev_max;
                if gap < Decimal::ZERO {
                    return Err(EngineError::invalid_rate_table(
                        rate_type,
                        format!("band '{}' overlaps or precedes band '{}'", row.name, name),
                    ));
                }
                let whole_step = gap == Decimal::ZERO || gap == Decimal::ONE;
                if !whole_step || step.is_some_and(|s| s != gap) {
                    return Err(EngineError::invalid_rate_table(
                        rate_type,
                        format!("gap between band '{}' and band '{}'", name, row.name),
                    ));
                }
                step = Some(gap);
            }
        }

        bands.push(TaxBand {
            name: row.name.clone(),
            min,
            max,
            rate,
        });
    }

    if bands.last().is_some_and(|b| b.max.is_some()) {
        return Err(EngineError::invalid_rate_table(
            rate_type,
            "top band must be open-ended so every income is covered",
        ));
    }

    Ok(TaxBandSet {
        rate_type: rate_type.to_string(),
        bands,
    })
}

fn build_tiers(rate_type: &str, rows: &[&RateRow]) -> EngineResult<TieredContribution> {
    let mut tiers: Vec<ContributionTier> = Vec::with_capacity(rows.len());

    for row in rows {
        let ceiling = require(row, row.max_amount, "max_amount (tier ceiling)")?;
        let employee_rate = check_rate(row, require(row, row.rate, "rate")?)?;
        let employer_rate = check_rate(row, row.employer_rate.unwrap_or(employee_rate))?;
        let previous = tiers.last().map(|t| t.ceiling).unwrap_or(Decimal::ZERO);

        if ceiling <= previous {
            return Err(EngineError::invalid_rate_table(
                rate_type,
                format!(
                    "tier '{}' ceiling {} is not above the previous ceiling {}",
                    row.name, ceiling, previous
                ),
            ));
        }
        if let Some(min) = row.min_amount {
            let gap = min - previous;
            let first = tiers.is_empty();
            let contiguous = if first {
                min == Decimal::ZERO
            } else {
                gap == Decimal::ZERO || gap == Decimal::ONE
            };
            if !contiguous {
                return Err(EngineError::invalid_rate_table(
                    rate_type,
                    format!("tier '{}' starts at {} and leaves a gap or overlap", row.name, min),
                ));
            }
        }

        tiers.push(ContributionTier {
            name: row.name.clone(),
            ceiling,
            employee_rate,
            employer_rate,
        });
    }

    Ok(TieredContribution {
        rate_type: rate_type.to_string(),
        tiers,
    })
}

fn build_levy(rate_type: &str, rows: &[&RateRow]) -> EngineResult<FlatLevy> {
    let row = single(rate_type, rows)?;
    let employee_rate = check_rate(row, require(row, row.rate, "rate")?)?;
    let employer_rate = check_rate(row, row.employer_rate.unwrap_or(employee_rate))?;

    Ok(FlatLevy {
        rate_type: rate_type.to_string(),
        employee_rate,
        employer_rate,
        base: row.base,
        tax_deductible: row.tax_deductible,
    })
}

fn build_relief(rate_type: &str, rows: &[&RateRow]) -> EngineResult<Relief> {
    let row = single(rate_type, rows)?;
    let amount = check_amount(row, require(row, row.amount, "amount")?, "amount")?;
    let kind = match (rate_type, row.kind) {
        (PERSONAL_RELIEF, RateKind::ReliefCap) => {
            return Err(EngineError::invalid_rate_table(
                rate_type,
                "personal relief must be a flat relief, not a relief_cap",
            ));
        }
        (INSURANCE_RELIEF, RateKind::Relief) => {
            return Err(EngineError::invalid_rate_table(
                rate_type,
                "insurance relief must be a relief_cap, not a flat relief",
            ));
        }
        (_, RateKind::ReliefCap) => ReliefKind::Cap,
        _ => ReliefKind::Flat,
    };

    Ok(Relief {
        rate_type: rate_type.to_string(),
        kind,
        amount,
    })
}
