//! Request types for the Payroll Engine API.
//!
//! This module defines the JSON request structures for the
//! `/v1/payroll/calculate` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request body for the `/v1/payroll/calculate` endpoint.
///
/// # Example
///
/// ```
/// use payroll_engine::api::PayrollRequest;
///
/// let request: PayrollRequest = serde_json::from_str(r#"{
///     "employee_id": 42,
///     "pay_period_start_date": "2024-01-01",
///     "pay_period_end_date": "2024-01-15"
/// }"#).unwrap();
/// assert_eq!(request.employee_id, 42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The employee to calculate payroll for.
    pub employee_id: i64,
    /// First day of the pay period (inclusive).
    pub pay_period_start_date: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_end_date_fails() {
        let json = r#"{"employee_id": 1, "pay_period_start_date": "2024-01-01"}"#;
        let error = serde_json::from_str::<PayrollRequest>(json).unwrap_err();
        assert!(error.to_string().contains("pay_period_end_date"));
    }

    #[test]
    fn test_invalid_date_format_fails() {
        let json = r#"{"employee_id": 1, "pay_period_start_date": "01/01/2024", "pay_period_end_date": "2024-01-15"}"#;
        assert!(serde_json::from_str::<PayrollRequest>(json).is_err());
    }
}
