//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory rate
//! configurations from YAML files and resolving them into [`RateTable`]s.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::rate_table::RateTable;
use super::types::{JurisdictionMetadata, RateRow};

/// Layout of `statutory_rates.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct StatutoryRatesFile {
    rates: Vec<RateRow>,
}

/// Loads and provides access to statutory rate configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// resolves the rows active on a given date into a validated [`RateTable`].
///
/// # Directory Structure
///
/// ```text
/// config/ke/
/// ├── jurisdiction.yaml     # Jurisdiction metadata and required rate types
/// └── statutory_rates.yaml  # Effective-dated rate rows
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/ke")?;
/// let table = loader.rate_table(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())?;
/// println!("Rates for {}: {:?}", loader.jurisdiction().name, table.effective_date());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    jurisdiction: JurisdictionMetadata,
    rows: Vec<RateRow>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if either file is
    /// missing or contains invalid YAML. Rate rows are not validated until a
    /// table is resolved, since validity depends on the effective date.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let rates = Self::load_yaml::<StatutoryRatesFile>(&path.join("statutory_rates.yaml"))?;

        Ok(Self::from_parts(jurisdiction, rates.rates))
    }

    /// Creates a loader from already-parsed parts.
    pub fn from_parts(jurisdiction: JurisdictionMetadata, rows: Vec<RateRow>) -> Self {
        Self { jurisdiction, rows }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.jurisdiction
    }

    /// Returns every configured row, regardless of effective date.
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    /// Resolves the rate table in force on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRateTable` if the active rows are malformed, or
    /// `MissingRateType` if a core rate type or one of the jurisdiction's
    /// `required_rate_types` has no active row on that date.
    pub fn rate_table(&self, as_of: NaiveDate) -> EngineResult<RateTable> {
        let required: Vec<&str> = self
            .jurisdiction
            .required_rate_types
            .iter()
            .map(String::as_str)
            .collect();
        RateTable::from_rows(&self.rows, as_of, &required)
    }
}
