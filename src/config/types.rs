//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section except
//! `services` has defaults.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::LeaveStatus;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Base URLs of the upstream systems of record.
///
/// URLs are used as prefixes exactly as configured, so the employee and
/// deduction URLs are expected to end with a trailing slash.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEndpoints {
    /// Employee service, e.g. `http://employee:8081/v1/employees/`.
    pub employee: String,
    /// Attendance service, e.g. `http://attendance:8082/v1/timelogs`.
    pub attendance: String,
    /// Holiday service, e.g. `http://holiday:8083/v1/holidays`.
    pub holiday: String,
    /// Leave service, e.g. `http://leave:8084/v1/leaves`.
    pub leave: String,
    /// Deduction service, e.g. `http://employee:8081/v1/deductions/`.
    pub deduction: String,
    /// Tax service, e.g. `http://tax:8085/v1`.
    pub tax: String,
}

/// Settings for the outbound HTTP client.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Decides which leave records count as paid time for hourly employees.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PaidLeavePolicy;
/// use payroll_engine::models::LeaveStatus;
///
/// let policy = PaidLeavePolicy::default();
/// assert!(policy.is_paid(LeaveStatus::Paid));
/// assert!(policy.is_paid(LeaveStatus::Approved));
/// assert!(!policy.is_paid(LeaveStatus::Pending));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaidLeavePolicy {
    /// Statuses that count toward paid leave.
    #[serde(default = "default_paid_statuses")]
    pub statuses: Vec<LeaveStatus>,
    /// Hours credited for each paid leave day.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
}

impl PaidLeavePolicy {
    /// Returns true if leave in `status` is paid.
    pub fn is_paid(&self, status: LeaveStatus) -> bool {
        self.statuses.contains(&status)
    }
}

impl Default for PaidLeavePolicy {
    fn default() -> Self {
        Self {
            statuses: default_paid_statuses(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

fn default_paid_statuses() -> Vec<LeaveStatus> {
    vec![LeaveStatus::Paid, LeaveStatus::Approved]
}

fn default_hours_per_day() -> Decimal {
    Decimal::new(8, 0)
}

/// Validation applied to the tax bracket table before the walk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaxPolicy {
    /// Reject tables that are empty or whose top bracket has an upper bound.
    #[serde(default)]
    pub require_open_top_bracket: bool,
}

/// Business rules applied during calculation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalculationPolicy {
    /// Paid leave rules.
    #[serde(default)]
    pub paid_leave: PaidLeavePolicy,
    /// Tax table rules.
    #[serde(default)]
    pub tax: TaxPolicy,
}

/// The complete engine configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream service locations.
    pub services: ServiceEndpoints,
    /// Outbound HTTP client settings.
    #[serde(default)]
    pub http: HttpClientConfig,
    /// Calculation rules.
    #[serde(default)]
    pub policy: CalculationPolicy,
}
