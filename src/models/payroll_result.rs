//! Payroll result model.
//!
//! This module contains the [`PayrollResult`] type returned by a payroll
//! calculation. Persisting it is the caller's concern.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::PayPeriod;

/// The computed pay for one employee over one pay period.
///
/// All monetary fields are rounded to two decimal places (half-up). Net pay
/// is derived from the unrounded components before rounding, so it may differ
/// from `gross_pay - total_taxes - total_deductions` by at most one cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayrollResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The employee the payroll was calculated for.
    pub employee_id: i64,
    /// The pay period covered.
    pub pay_period: PayPeriod,
    /// Earnings before tax and deductions.
    pub gross_pay: Decimal,
    /// Tax withheld for the period.
    pub total_taxes: Decimal,
    /// Sum of the active deductions for the period.
    pub total_deductions: Decimal,
    /// Gross pay less taxes and deductions.
    pub net_pay: Decimal,
    /// Hours worked as reported by attendance.
    pub total_hours_worked: Decimal,
}

impl PayrollResult {
    /// Whether the monetary fields of two results are identical, ignoring the
    /// per-calculation id and timestamp.
    pub fn same_amounts(&self, other: &PayrollResult) -> bool {
        self.employee_id == other.employee_id
            && self.pay_period == other.pay_period
            && self.gross_pay == other.gross_pay
            && self.total_taxes == other.total_taxes
            && self.total_deductions == other.total_deductions
            && self.net_pay == other.net_pay
            && self.total_hours_worked == other.total_hours_worked
    }
}
