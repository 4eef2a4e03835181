//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type which defines the inclusive
//! date window a payroll calculation covers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// The longest pay period, in days, whose periods-per-year factor
/// (`365 / days` at two decimal places) is still nonzero.
pub const MAX_PERIOD_DAYS: i64 = 73_000;

/// Represents a pay period as an inclusive date range.
///
/// A `PayPeriod` can only be built through [`PayPeriod::new`], which enforces
/// that the end date is not before the start date and that the period spans
/// at most [`MAX_PERIOD_DAYS`] days.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// ).unwrap();
///
/// assert_eq!(period.day_count(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, failing with [`EngineError::InvalidPeriod`] when
    /// `end_date` is before `start_date` and with
    /// [`EngineError::PeriodTooLong`] when it spans more than
    /// [`MAX_PERIOD_DAYS`] days.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidPeriod {
                start: start_date,
                end: end_date,
            });
        }
        let period = Self {
            start_date,
            end_date,
        };
        let days = period.day_count();
        if days > MAX_PERIOD_DAYS {
            return Err(EngineError::PeriodTooLong {
                start: start_date,
                end: end_date,
                days,
                max_days: MAX_PERIOD_DAYS,
            });
        }
        Ok(period)
    }

    /// The first day of the period (inclusive).
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last day of the period (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days in the period, counting both ends.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Checks whether the range `[start, end]` shares at least one day with
    /// this period. A `None` end is open-ended.
    pub fn intersects(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        let ends_before = end.is_some_and(|end| end < self.start_date);
        let starts_after = start > self.end_date;
        !(ends_before || starts_after)
    }
}
