//! Statutory Payroll Deduction Engine
//!
//! This crate computes gross-to-net payroll for one employee and one pay
//! period: tiered social security contributions, flat levies, progressive
//! income tax with reliefs, and net pay. Every rate is read from a
//! [`config::RateTable`] resolved for an effective date, and every stage is
//! recorded in an audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
