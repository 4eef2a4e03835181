//! Fact provider interfaces.
//!
//! Each trait is a single request/response contract against one system of
//! record. The orchestrator depends only on these traits; [`HttpFactProvider`]
//! is the production implementation that talks to the upstream services.
//!
//! Providers report a missing resource as [`EngineError::UpstreamNotFound`]
//! and any other failure as [`EngineError::UpstreamUnavailable`].
//!
//! [`EngineError::UpstreamNotFound`]: crate::error::EngineError::UpstreamNotFound
//! [`EngineError::UpstreamUnavailable`]: crate::error::EngineError::UpstreamUnavailable

mod http;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{CompensationTerms, DeductionRule, LeaveRecord, TaxBracket};

pub use http::HttpFactProvider;

/// An opaque authorization credential forwarded unchanged to providers.
///
/// The value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw `Authorization` header value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Supplies an employee's compensation terms.
#[async_trait]
pub trait CompensationProvider: Send + Sync {
    /// Fetches the terms for `employee_id`.
    async fn get_terms(&self, employee_id: i64, auth: &AuthToken)
    -> EngineResult<CompensationTerms>;
}

/// Supplies hours worked from attendance records.
#[async_trait]
pub trait AttendanceProvider: Send + Sync {
    /// Total hours worked by `employee_id` between `start` and `end` inclusive.
    async fn get_hours_worked(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Decimal>;
}

/// Supplies the holiday calendar.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Number of holidays and suspensions between `start` and `end` inclusive.
    async fn get_non_working_day_count(&self, start: NaiveDate, end: NaiveDate)
    -> EngineResult<i64>;
}

/// Supplies leave bookings.
#[async_trait]
pub trait LeaveProvider: Send + Sync {
    /// Approved or paid leave for `employee_id` intersecting `[start, end]`.
    async fn get_approved_leave(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Vec<LeaveRecord>>;
}

/// Supplies an employee's deduction rules.
#[async_trait]
pub trait DeductionProvider: Send + Sync {
    /// All deduction rules on record for `employee_id`; activity is decided
    /// by the caller.
    async fn get_active_deductions(
        &self,
        employee_id: i64,
        auth: &AuthToken,
    ) -> EngineResult<Vec<DeductionRule>>;
}

/// Supplies the current tax bracket table.
#[async_trait]
pub trait TaxBracketProvider: Send + Sync {
    /// The full bracket table, in any order.
    async fn get_brackets(&self, auth: &AuthToken) -> EngineResult<Vec<TaxBracket>>;
}
