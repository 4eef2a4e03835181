//! HTTP implementation of the fact providers.
//!
//! Talks JSON to the upstream systems of record. Wire payloads use the
//! services' camelCase field names and are mapped onto the domain models
//! here, so nothing outside this module depends on them.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, header};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use crate::config::{HttpClientConfig, ServiceEndpoints};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompensationTerms, DeductionFrequency, DeductionRule, LeaveRecord, LeaveStatus, TaxBracket,
};

use super::{
    AttendanceProvider, AuthToken, CalendarProvider, CompensationProvider, DeductionProvider,
    LeaveProvider, TaxBracketProvider,
};

const EMPLOYEE: &str = "Employee";
const ATTENDANCE: &str = "Attendance";
const HOLIDAY: &str = "Holiday";
const LEAVE: &str = "Leave";
const DEDUCTION: &str = "Employee deduction";
const TAX: &str = "Tax";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeDto {
    id: i64,
    #[serde(default)]
    hourly_rate: Option<Decimal>,
    #[serde(default)]
    daily_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaveDto {
    #[serde(default)]
    id: Option<i64>,
    employee_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    leave_type: String,
    status: LeaveStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeductionDto {
    #[serde(default)]
    name: Option<String>,
    frequency: DeductionFrequency,
    amount: Decimal,
    start_date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxBracketDto {
    #[serde(default)]
    amount_from: Option<Decimal>,
    #[serde(default)]
    amount_to: Option<Decimal>,
    #[serde(default)]
    tax_percentage: Option<Decimal>,
    #[serde(default)]
    flat_deduction: Option<Decimal>,
}

/// Fact provider backed by the upstream HTTP services.
///
/// One instance implements every provider trait, sharing a single
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::providers::HttpFactProvider;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// let provider = HttpFactProvider::new(loader.services().clone(), &loader.config().http)?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpFactProvider {
    client: Client,
    services: ServiceEndpoints,
}

impl HttpFactProvider {
    /// Builds a provider with the configured request timeout.
    pub fn new(services: ServiceEndpoints, http: &HttpClientConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| EngineError::unavailable("HTTP client", e.to_string()))?;
        Ok(Self { client, services })
    }

    /// Sends `request` and decodes a JSON body.
    ///
    /// With `client_error_is_not_found`, a 4xx response becomes
    /// `UpstreamNotFound`; every other non-success status becomes
    /// `UpstreamUnavailable` carrying the response body.
    async fn fetch<T: DeserializeOwned>(
        service: &str,
        request: RequestBuilder,
        client_error_is_not_found: bool,
    ) -> EngineResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| EngineError::unavailable(service, e.to_string()))?;

        let status = response.status();
        debug!(service, status = %status, "Upstream responded");

        if client_error_is_not_found && status.is_client_error() {
            return Err(EngineError::not_found(service, format!("{} not found.", service)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(service, status = %status, body = %body, "Upstream returned an error");
            return Err(EngineError::unavailable(service, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::unavailable(service, format!("unreadable response: {}", e)))
    }

    fn authorized(&self, url: &str, auth: &AuthToken) -> RequestBuilder {
        self.client
            .get(url)
            .header(header::AUTHORIZATION, auth.as_str())
    }
}

#[async_trait]
impl CompensationProvider for HttpFactProvider {
    async fn get_terms(
        &self,
        employee_id: i64,
        auth: &AuthToken,
    ) -> EngineResult<CompensationTerms> {
        let url = format!("{}{}", self.services.employee, employee_id);
        let dto: EmployeeDto = Self::fetch(EMPLOYEE, self.authorized(&url, auth), true).await?;
        Ok(CompensationTerms {
            employee_id: dto.id,
            hourly_rate: dto.hourly_rate,
            daily_rate: dto.daily_rate,
        })
    }
}

#[async_trait]
impl AttendanceProvider for HttpFactProvider {
    async fn get_hours_worked(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Decimal> {
        let url = format!("{}/hours-worked", self.services.attendance);
        let request = self.authorized(&url, auth).query(&[
            ("employeeId", employee_id.to_string()),
            ("startDate", start.to_string()),
            ("endDate", end.to_string()),
        ]);
        Self::fetch(ATTENDANCE, request, false).await
    }
}

#[async_trait]
impl CalendarProvider for HttpFactProvider {
    async fn get_non_working_day_count(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<i64> {
        let url = format!("{}/non-working-days", self.services.holiday);
        let request = self
            .client
            .get(&url)
            .query(&[("startDate", start.to_string()), ("endDate", end.to_string())]);
        let days: Vec<IgnoredAny> = Self::fetch(HOLIDAY, request, false).await?;
        i64::try_from(days.len())
            .map_err(|_| EngineError::unavailable(HOLIDAY, "non-working day count overflow"))
    }
}

#[async_trait]
impl LeaveProvider for HttpFactProvider {
    async fn get_approved_leave(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Vec<LeaveRecord>> {
        let url = format!("{}/employee/{}/approved", self.services.leave, employee_id);
        let request = self
            .authorized(&url, auth)
            .query(&[("startDate", start.to_string()), ("endDate", end.to_string())]);
        let leave: Vec<LeaveDto> = Self::fetch(LEAVE, request, false).await?;
        Ok(leave
            .into_iter()
            .map(|dto| LeaveRecord {
                id: dto.id,
                employee_id: dto.employee_id,
                start_date: dto.start_date,
                end_date: dto.end_date,
                status: dto.status,
                leave_type: dto.leave_type,
            })
            .collect())
    }
}

#[async_trait]
impl DeductionProvider for HttpFactProvider {
    async fn get_active_deductions(
        &self,
        employee_id: i64,
        auth: &AuthToken,
    ) -> EngineResult<Vec<DeductionRule>> {
        let url = format!("{}employee/{}", self.services.deduction, employee_id);
        let deductions: Vec<DeductionDto> =
            Self::fetch(DEDUCTION, self.authorized(&url, auth), false).await?;
        Ok(deductions
            .into_iter()
            .map(|dto| DeductionRule {
                employee_id,
                name: dto.name,
                amount: dto.amount,
                start_date: dto.start_date,
                end_date: dto.end_date,
                frequency: dto.frequency,
            })
            .collect())
    }
}

#[async_trait]
impl TaxBracketProvider for HttpFactProvider {
    async fn get_brackets(&self, auth: &AuthToken) -> EngineResult<Vec<TaxBracket>> {
        let url = format!("{}/tax-brackets", self.services.tax);
        let brackets: Vec<TaxBracketDto> =
            Self::fetch(TAX, self.authorized(&url, auth), false).await?;
        Ok(brackets
            .into_iter()
            .map(|dto| TaxBracket {
                min_income: dto.amount_from,
                max_income: dto.amount_to,
                rate: dto.tax_percentage,
                flat_base_tax: dto.flat_deduction,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> ServiceEndpoints {
        ServiceEndpoints {
            employee: "http://127.0.0.1:9/v1/employees/".to_string(),
            attendance: "http://127.0.0.1:9/v1/timelogs".to_string(),
            holiday: "http://127.0.0.1:9/v1/holidays".to_string(),
            leave: "http://127.0.0.1:9/v1/leaves".to_string(),
            deduction: "http://127.0.0.1:9/v1/deductions/".to_string(),
            tax: "http://127.0.0.1:9/v1".to_string(),
        }
    }

    #[test]
    fn test_decode_employee_payload() {
        let dto: EmployeeDto = serde_json::from_str(
            r#"{"id": 7, "firstName": "Ana", "hourlyRate": 18.75, "dailyRate": null}"#,
        )
        .unwrap();
        assert_eq!(dto.id, 7);
        assert_eq!(dto.hourly_rate, Some(Decimal::new(1875, 2)));
        assert_eq!(dto.daily_rate, None);
    }

    #[test]
    fn test_decode_tax_bracket_payload() {
        let dto: TaxBracketDto = serde_json::from_str(
            r#"{"id": 1, "amountFrom": 250000, "amountTo": null, "taxPercentage": 0.20, "flatDeduction": 0}"#,
        )
        .unwrap();
        assert_eq!(dto.amount_from, Some(Decimal::new(250_000, 0)));
        assert_eq!(dto.amount_to, None);
        assert_eq!(dto.tax_percentage, Some(Decimal::new(20, 2)));
    }

    #[test]
    fn test_decode_leave_payload() {
        let dto: LeaveDto = serde_json::from_str(
            r#"{"id": 3, "employeeId": 7, "startDate": "2024-01-02", "endDate": "2024-01-04",
                "leaveType": "SICK", "status": "APPROVED"}"#,
        )
        .unwrap();
        assert_eq!(dto.status, LeaveStatus::Approved);
        assert_eq!(dto.leave_type, "SICK");
    }

    #[test]
    fn test_decode_deduction_payload() {
        let dto: DeductionDto = serde_json::from_str(
            r#"{"name": "Loan", "frequency": "FIRST_HALF", "amount": 150.00,
                "startDate": "2024-01-01", "endDate": null}"#,
        )
        .unwrap();
        assert_eq!(dto.frequency, DeductionFrequency::FirstHalf);
        assert_eq!(dto.end_date, None);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let provider = HttpFactProvider::new(
            endpoints(),
            &HttpClientConfig { timeout_secs: 1 },
        )
        .unwrap();

        let result = provider.get_brackets(&AuthToken::new("Bearer t")).await;
        match result {
            Err(EngineError::UpstreamUnavailable { service, .. }) => assert_eq!(service, TAX),
            other => panic!("Expected UpstreamUnavailable, got {:?}", other),
        }
    }
}
