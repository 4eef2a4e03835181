//! Recurring deduction rules attached to an employee.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which half-month pay runs a deduction applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionFrequency {
    /// Taken in full from pay periods ending on or before the 15th.
    FirstHalf,
    /// Taken in full from pay periods ending after the 15th.
    SecondHalf,
    /// Split evenly across both halves of the month.
    BiMonthly,
}

/// A deduction an employee owes while its date range is active.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{DeductionFrequency, DeductionRule};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rule = DeductionRule {
///     employee_id: 1,
///     name: Some("Health insurance".to_string()),
///     amount: Decimal::new(1000, 0),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: None,
///     frequency: DeductionFrequency::BiMonthly,
/// };
/// assert!(rule.end_date.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRule {
    /// The employee the deduction belongs to.
    pub employee_id: i64,
    /// Optional label, e.g. "Loan repayment".
    #[serde(default)]
    pub name: Option<String>,
    /// Amount per applicable pay run (positive).
    pub amount: Decimal,
    /// First day the rule applies.
    pub start_date: NaiveDate,
    /// Last day the rule applies; `None` means open-ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Which pay runs the rule applies to.
    pub frequency: DeductionFrequency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_open_ended_rule() {
        let json = r#"{
            "employee_id": 4,
            "amount": "250.00",
            "start_date": "2024-01-01",
            "frequency": "SECOND_HALF"
        }"#;
        let rule: DeductionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.end_date, None);
        assert_eq!(rule.name, None);
        assert_eq!(rule.frequency, DeductionFrequency::SecondHalf);
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        let json = r#"{
            "employee_id": 4,
            "amount": "250.00",
            "start_date": "2024-01-01",
            "frequency": "WEEKLY"
        }"#;
        assert!(serde_json::from_str::<DeductionRule>(json).is_err());
    }
}
