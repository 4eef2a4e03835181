//! Core data models for the Payroll Engine.
//!
//! Every model here is built fresh for a single calculation from the facts
//! returned by the providers.

mod compensation;
mod deduction;
mod leave;
mod pay_period;
mod payroll_result;
mod tax_bracket;

pub use compensation::{CompensationTerms, RateBasis};
pub use deduction::{DeductionFrequency, DeductionRule};
pub use leave::{LeaveRecord, LeaveStatus};
pub use pay_period::{MAX_PERIOD_DAYS, PayPeriod};
pub use payroll_result::PayrollResult;
pub use tax_bracket::TaxBracket;
