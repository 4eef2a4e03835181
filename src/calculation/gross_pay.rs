//! Gross pay calculation.
//!
//! Hourly employees are paid for hours worked plus a fixed number of hours
//! for each paid leave day in the period. Daily employees are paid for every
//! calendar day in the period that is not a non-working day; leave neither
//! adds nor removes days for them. Working days never go below zero.

use rust_decimal::Decimal;

use crate::config::PaidLeavePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationTerms, LeaveRecord, PayPeriod, RateBasis};

use super::period::days_within_period;

/// The result of a gross pay calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrossPayResult {
    /// Gross pay, unrounded.
    pub gross_pay: Decimal,
    /// Paid leave days counted inside the period.
    pub paid_leave_days: i64,
    /// The units the rate was multiplied by: hours for hourly employees,
    /// days for daily employees.
    pub payable_units: Decimal,
}

/// Counts paid leave days that fall inside `period`.
///
/// Each record accepted by `policy` contributes the number of its days that
/// lie inside the period. Overlapping records are summed as-is.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::count_paid_leave_days;
/// use payroll_engine::config::PaidLeavePolicy;
/// use payroll_engine::models::{LeaveRecord, LeaveStatus, PayPeriod};
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// ).unwrap();
/// let leave = LeaveRecord {
///     id: None,
///     employee_id: 1,
///     start_date: NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
///     status: LeaveStatus::Paid,
///     leave_type: "ANNUAL".to_string(),
/// };
///
/// assert_eq!(count_paid_leave_days(&[leave], &period, &PaidLeavePolicy::default()), 2);
/// ```
pub fn count_paid_leave_days(
    leave: &[LeaveRecord],
    period: &PayPeriod,
    policy: &PaidLeavePolicy,
) -> i64 {
    leave
        .iter()
        .filter(|record| policy.is_paid(record.status))
        .map(|record| days_within_period(period, record.start_date, record.end_date))
        .sum()
}

/// Computes gross pay for the period.
///
/// # Arguments
///
/// * `terms` - The employee's compensation terms
/// * `hours_worked` - Hours reported by attendance for the period
/// * `non_working_days` - Holidays and suspensions in the period
/// * `period` - The pay period
/// * `leave` - Leave records intersecting the period
/// * `policy` - Which leave counts as paid, and how many hours a leave day is worth
///
/// # Errors
///
/// Returns `InvalidCompensation` if the terms carry neither an hourly nor a
/// daily rate, and `CalculationOverflow` if the pay exceeds the decimal range.
pub fn compute_gross_pay(
    terms: &CompensationTerms,
    hours_worked: Decimal,
    non_working_days: i64,
    period: &PayPeriod,
    leave: &[LeaveRecord],
    policy: &PaidLeavePolicy,
) -> EngineResult<GrossPayResult> {
    let paid_leave_days = count_paid_leave_days(leave, period, policy);

    let (rate, payable_units) = match terms.rate_basis()? {
        RateBasis::Hourly(rate) => {
            let hours = Decimal::from(paid_leave_days)
                .checked_mul(policy.hours_per_day)
                .and_then(|leave_hours| hours_worked.checked_add(leave_hours))
                .ok_or_else(|| EngineError::overflow("payable hours"))?;
            (rate, hours)
        }
        RateBasis::Daily(rate) => {
            let working_days = period.day_count().saturating_sub(non_working_days).max(0);
            (rate, Decimal::from(working_days))
        }
    };
    let gross_pay = rate
        .checked_mul(payable_units)
        .ok_or_else(|| EngineError::overflow("gross pay"))?;

    Ok(GrossPayResult {
        gross_pay,
        paid_leave_days,
        payable_units,
    })
}
