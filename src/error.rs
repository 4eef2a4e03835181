//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a payroll calculation can surface, including failures
//! reported by the upstream fact providers.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Engine.
///
/// Validation failures, upstream failures and configuration failures all
/// share this type so that callers can match on a single enum.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidCompensation { employee_id: 42 };
/// assert_eq!(
///     error.to_string(),
///     "Employee 42 must have either an hourly or daily rate set"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The pay period ends before it starts.
    #[error("Invalid pay period: end date {end} is before start date {start}")]
    InvalidPeriod {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// The pay period is too long to prorate against a year.
    #[error("Invalid pay period: {start} to {end} spans {days} days, more than the supported {max_days}")]
    PeriodTooLong {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
        /// Days in the requested period.
        days: i64,
        /// The longest supported period in days.
        max_days: i64,
    },

    /// The employee has no usable hourly or daily rate.
    #[error("Employee {employee_id} must have either an hourly or daily rate set")]
    InvalidCompensation {
        /// The employee whose terms are incomplete.
        employee_id: i64,
    },

    /// A referenced employee or resource does not exist downstream.
    #[error("{service} service: {message}")]
    UpstreamNotFound {
        /// The upstream service that reported the missing resource.
        service: String,
        /// A description of what was not found.
        message: String,
    },

    /// An upstream service failed, was unreachable, or returned an unreadable body.
    #[error("{service} service error: {message}")]
    UpstreamUnavailable {
        /// The upstream service that failed.
        service: String,
        /// A description of the failure.
        message: String,
    },

    /// The tax bracket table cannot cover every income.
    #[error("Inconsistent tax bracket table: {message}")]
    InconsistentBracketTable {
        /// A description of the inconsistency.
        message: String,
    },

    /// A monetary amount left the representable decimal range.
    #[error("Arithmetic overflow while computing {context}")]
    CalculationOverflow {
        /// The quantity being computed.
        context: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Builds an [`EngineError::UpstreamUnavailable`] for the named service.
    pub fn unavailable(service: &str, message: impl Into<String>) -> Self {
        EngineError::UpstreamUnavailable {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Builds an [`EngineError::CalculationOverflow`] for the named quantity.
    pub fn overflow(context: &str) -> Self {
        EngineError::CalculationOverflow {
            context: context.to_string(),
        }
    }

    /// Builds an [`EngineError::UpstreamNotFound`] for the named service.
    pub fn not_found(service: &str, message: impl Into<String>) -> Self {
        EngineError::UpstreamNotFound {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
