//! Deduction aggregation.
//!
//! A deduction rule is applied when its date range intersects the pay
//! period and its frequency matches the half of the month the period falls
//! in. Bi-monthly rules are split evenly between both halves.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionFrequency, DeductionRule, PayPeriod};

use super::period::{is_first_half, round_money};

/// Amount a single rule contributes to a pay run in the given half.
///
/// Bi-monthly amounts are halved and rounded to cents.
pub fn deduction_for_half(rule: &DeductionRule, first_half: bool) -> Decimal {
    match rule.frequency {
        DeductionFrequency::FirstHalf if first_half => rule.amount,
        DeductionFrequency::SecondHalf if !first_half => rule.amount,
        DeductionFrequency::BiMonthly => round_money(rule.amount / Decimal::TWO),
        _ => Decimal::ZERO,
    }
}

/// Sums the deductions that apply to `period`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_deductions;
/// use payroll_engine::models::{DeductionFrequency, DeductionRule, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// ).unwrap();
/// let rule = DeductionRule {
///     employee_id: 1,
///     name: None,
///     amount: Decimal::new(1000, 0),
///     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     end_date: None,
///     frequency: DeductionFrequency::BiMonthly,
/// };
///
/// assert_eq!(compute_deductions(&[rule], &period).unwrap(), Decimal::new(500, 0));
/// ```
///
/// # Errors
///
/// Returns `CalculationOverflow` if the total exceeds the decimal range.
pub fn compute_deductions(rules: &[DeductionRule], period: &PayPeriod) -> EngineResult<Decimal> {
    let first_half = is_first_half(period);

    rules
        .iter()
        .filter(|rule| period.intersects(rule.start_date, rule.end_date))
        .map(|rule| deduction_for_half(rule, first_half))
        .try_fold(Decimal::ZERO, |total, amount| {
            total
                .checked_add(amount)
                .ok_or_else(|| EngineError::overflow("total deductions"))
        })
}
