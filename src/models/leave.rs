//! Leave records as reported by the leave service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Requested, awaiting a decision.
    Pending,
    /// Approved by a manager.
    Approved,
    /// Turned down.
    Rejected,
    /// Withdrawn by the employee.
    Canceled,
    /// Approved and paid out.
    Paid,
}

/// A single leave booking for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Identifier of the leave booking, when the source provides one.
    #[serde(default)]
    pub id: Option<i64>,
    /// The employee on leave.
    pub employee_id: i64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Current status of the booking.
    pub status: LeaveStatus,
    /// Kind of leave (e.g. "ANNUAL", "SICK").
    pub leave_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_leave_record() {
        let json = r#"{
            "employee_id": 12,
            "start_date": "2024-03-04",
            "end_date": "2024-03-08",
            "status": "PAID",
            "leave_type": "ANNUAL"
        }"#;
        let leave: LeaveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(leave.id, None);
        assert_eq!(leave.status, LeaveStatus::Paid);
        assert_eq!(leave.end_date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }

    #[test]
    fn test_status_uses_upper_case_names() {
        let json = serde_json::to_string(&LeaveStatus::Canceled).unwrap();
        assert_eq!(json, "\"CANCELED\"");
    }
}
