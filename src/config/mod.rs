//! Statutory rate configuration for the payroll deduction engine.
//!
//! This module provides the effective-dated rate rows, the validated
//! [`RateTable`] snapshot the calculator consumes, and a YAML loader.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//! use chrono::NaiveDate;
//!
//! let loader = ConfigLoader::load("./config/ke").unwrap();
//! let table = loader.rate_table(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()).unwrap();
//! println!("Loaded rates for: {}", loader.jurisdiction().name);
//! ```

mod loader;
mod rate_table;
mod types;

pub use loader::ConfigLoader;
pub use rate_table::{
    CORE_RATE_TYPES, ContributionTier, FlatLevy, INSURANCE_RELIEF, PAYE_BAND, PERSONAL_RELIEF,
    RateSnapshot, RateTable, Relief, ReliefKind, TaxBand, TaxBandSet, TieredContribution,
};
pub use types::{JurisdictionMetadata, LevyBase, RateKind, RateRow};
