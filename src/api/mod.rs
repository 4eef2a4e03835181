//! HTTP API module for the Payroll Engine.
//!
//! This module provides the REST endpoint that triggers a payroll
//! calculation for one employee and pay period.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::PayrollRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
