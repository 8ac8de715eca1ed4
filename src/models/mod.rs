//! Core data models for the payroll deduction engine.
//!
//! This module contains the input and result value objects exchanged with
//! the calculator.

mod payroll_input;
mod payroll_result;

pub use payroll_input::{MAX_AMOUNT, PayrollInput};
pub use payroll_result::{
    AuditStep, AuditTrace, BandSlice, BreakdownLine, ContributionAmount, LevyAmount,
    PayrollResult, PayslipBreakdown, TierSlice,
};
