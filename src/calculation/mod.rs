//! Calculation logic for the payroll deduction engine.
//!
//! Each stage lives in its own module and returns its amounts together with
//! the [`AuditStep`](crate::models::AuditStep) that explains them.
//! [`compute_payroll`] chains the stages into a full payroll run.

mod flat_levy;
mod gross_pay;
mod payroll;
mod progressive_tax;
mod reliefs;
mod rounding;
mod tiered_contribution;

pub use flat_levy::{FlatLevyResult, calculate_flat_levy};
pub use gross_pay::{GrossPayResult, calculate_gross_pay};
pub use payroll::compute_payroll;
pub use progressive_tax::{ProgressiveTaxResult, calculate_progressive_tax};
pub use reliefs::{ReliefResult, apply_reliefs};
pub use rounding::round_money;
pub use tiered_contribution::{TieredContributionResult, calculate_tiered_contribution};
