//! Compensation terms for an employee.
//!
//! Only hourly and daily rates take part in payroll calculation. Other rate
//! kinds kept by the employee record are not modelled here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The rate an employee is paid on, resolved from [`CompensationTerms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBasis {
    /// Paid per hour worked.
    Hourly(Decimal),
    /// Paid per working day in the period.
    Daily(Decimal),
}

/// An immutable snapshot of an employee's pay terms for one calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CompensationTerms, RateBasis};
/// use rust_decimal::Decimal;
///
/// let terms = CompensationTerms {
///     employee_id: 1,
///     hourly_rate: Some(Decimal::new(2000, 2)),
///     daily_rate: None,
/// };
/// assert_eq!(terms.rate_basis().unwrap(), RateBasis::Hourly(Decimal::new(2000, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationTerms {
    /// Unique identifier for the employee.
    pub employee_id: i64,
    /// Hourly rate, if the employee is paid by the hour.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Daily rate, if the employee is paid by the day.
    #[serde(default)]
    pub daily_rate: Option<Decimal>,
}

impl CompensationTerms {
    /// Resolves which rate applies.
    ///
    /// The hourly rate takes precedence when both are set. Fails with
    /// [`EngineError::InvalidCompensation`] when neither is.
    pub fn rate_basis(&self) -> EngineResult<RateBasis> {
        match (self.hourly_rate, self.daily_rate) {
            (Some(rate), _) => Ok(RateBasis::Hourly(rate)),
            (None, Some(rate)) => Ok(RateBasis::Daily(rate)),
            (None, None) => Err(EngineError::InvalidCompensation {
                employee_id: self.employee_id,
            }),
        }
    }
}
