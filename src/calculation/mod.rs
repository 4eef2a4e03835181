//! Calculation logic for the Payroll Engine.
//!
//! This module contains the pure calculation functions: date and proration
//! helpers, gross pay, progressive tax, and deduction aggregation. None of
//! them perform I/O; the orchestrator feeds them resolved facts.

mod deductions;
mod gross_pay;
mod period;
mod tax;

pub use deductions::{compute_deductions, deduction_for_half};
pub use gross_pay::{GrossPayResult, compute_gross_pay, count_paid_leave_days};
pub use period::{
    DAYS_PER_YEAR, HALF_MONTH_MIDPOINT_DAY, MONEY_SCALE, days_within_period, half_month_midpoint,
    inclusive_days, is_first_half, periods_per_year, round_money,
};
pub use tax::{TaxResult, annual_tax, compute_tax, validate_bracket_table};
