//! HTTP API module for the payroll deduction engine.
//!
//! This module provides the REST endpoints for computing payroll for a
//! single employee or a batch, against the statutory rates in force on a
//! requested date.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchEmployee, BatchRequest, CalculationRequest};
pub use response::{
    ApiError, ApiErrorResponse, BatchOutcome, BatchResponse, ENGINE_VERSION, PayrollResponse,
};
pub use state::AppState;
