//! Date and proration helpers shared by the calculators.
//!
//! All functions here are pure. Day counts are inclusive of both ends.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PayPeriod;

/// Days used to annualize a pay period.
pub const DAYS_PER_YEAR: i64 = 365;

/// The day of month that closes the first half-month pay run.
pub const HALF_MONTH_MIDPOINT_DAY: u32 = 15;

/// Number of decimal places monetary output is rounded to.
pub const MONEY_SCALE: u32 = 2;

/// Counts the days in `[start, end]`, inclusive of both ends.
///
/// Returns zero when `end` is before `start`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::inclusive_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(inclusive_days(start, end), 31);
/// ```
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Counts the days of `[start, end]` that fall inside `period`.
///
/// The range is clipped to the period bounds first; ranges that do not touch
/// the period contribute zero.
pub fn days_within_period(period: &PayPeriod, start: NaiveDate, end: NaiveDate) -> i64 {
    if !period.intersects(start, Some(end)) {
        return 0;
    }
    let clipped_start = start.max(period.start_date());
    let clipped_end = end.min(period.end_date());
    inclusive_days(clipped_start, clipped_end)
}

/// The 15th of the month the period starts in.
pub fn half_month_midpoint(period: &PayPeriod) -> NaiveDate {
    let start = period.start_date();
    // every month has a 15th
    start.with_day(HALF_MONTH_MIDPOINT_DAY).unwrap_or(start)
}

/// Whether the period is a first-half pay run, i.e. it ends on or before the
/// 15th of its starting month.
pub fn is_first_half(period: &PayPeriod) -> bool {
    period.end_date() <= half_month_midpoint(period)
}

/// How many periods of this length fit in a year: `365 / days`, rounded to
/// two decimal places half-up.
///
/// At least `0.01` for every [`PayPeriod`], since periods are capped at
/// [`MAX_PERIOD_DAYS`](crate::models::MAX_PERIOD_DAYS) days.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::periods_per_year;
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// ).unwrap();
/// assert_eq!(periods_per_year(&period), Decimal::new(2433, 2));
/// ```
pub fn periods_per_year(period: &PayPeriod) -> Decimal {
    let ratio = Decimal::from(DAYS_PER_YEAR) / Decimal::from(period.day_count());
    round_money(ratio)
}

/// Rounds to two decimal places, half-up, always carrying two decimals.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
