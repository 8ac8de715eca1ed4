//! Application state for the payroll deduction engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::{ConfigLoader, RateTable};
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded statutory rate rows. Rate tables are resolved per
/// request from the effective date the caller supplies.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rate configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Resolves the rate table in force on a date.
    pub fn rate_table(&self, effective_date: NaiveDate) -> EngineResult<RateTable> {
        self.config.rate_table(effective_date)
    }
}
