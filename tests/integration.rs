//! Integration tests for the Payroll Engine.
//!
//! This test suite covers:
//! - Hourly and daily gross pay through the orchestrator
//! - Progressive tax and half-month deductions end to end
//! - Two-phase fact gathering and credential forwarding
//! - Failure propagation and cancellation of sibling requests
//! - The HTTP endpoint
//! - Properties: net pay identity, idempotence, tax monotonicity

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::compute_tax;
use payroll_engine::config::{CalculationPolicy, PaidLeavePolicy, TaxPolicy};
use payroll_engine::error::{EngineError, EngineResult};
use payroll_engine::models::{
    CompensationTerms, DeductionFrequency, DeductionRule, LeaveRecord, LeaveStatus, PayPeriod,
    TaxBracket,
};
use payroll_engine::orchestrator::{
    FactProviders, PayrollFacts, PayrollOrchestrator, compute_payroll,
};
use payroll_engine::providers::{
    AttendanceProvider, AuthToken, CalendarProvider, CompensationProvider, DeductionProvider,
    LeaveProvider, TaxBracketProvider,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("Bearer integration-test")
}

/// Which provider, if any, should fail and how.
#[derive(Clone, Copy, PartialEq)]
enum Failure {
    None,
    EmployeeMissing,
    AttendanceDown,
    TaxDown,
}

/// In-memory provider with canned facts that records what it was asked.
struct FakeFacts {
    terms: CompensationTerms,
    hours: Decimal,
    non_working_days: i64,
    leave: Vec<LeaveRecord>,
    deductions: Vec<DeductionRule>,
    brackets: Vec<TaxBracket>,
    failure: Failure,
    slow_leave: bool,
    leave_completed: AtomicBool,
    calls: AtomicUsize,
    seen_ids: Mutex<Vec<i64>>,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeFacts {
    fn hourly(rate: &str, hours: &str) -> Self {
        Self {
            terms: CompensationTerms {
                employee_id: 7,
                hourly_rate: Some(dec(rate)),
                daily_rate: None,
            },
            hours: dec(hours),
            non_working_days: 0,
            leave: vec![],
            deductions: vec![],
            brackets: vec![],
            failure: Failure::None,
            slow_leave: false,
            leave_completed: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            seen_ids: Mutex::new(vec![]),
            seen_tokens: Mutex::new(vec![]),
        }
    }

    fn daily(rate: &str, non_working_days: i64) -> Self {
        let mut facts = Self::hourly("0", "0");
        facts.terms.hourly_rate = None;
        facts.terms.daily_rate = Some(dec(rate));
        facts.non_working_days = non_working_days;
        facts
    }

    fn record(&self, employee_id: Option<i64>, auth: Option<&AuthToken>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = employee_id {
            self.seen_ids.lock().unwrap().push(id);
        }
        if let Some(auth) = auth {
            self.seen_tokens.lock().unwrap().push(auth.as_str().to_string());
        }
    }
}

#[async_trait]
impl CompensationProvider for FakeFacts {
    async fn get_terms(&self, employee_id: i64, auth: &AuthToken) -> EngineResult<CompensationTerms> {
        self.record(Some(employee_id), Some(auth));
        if self.failure == Failure::EmployeeMissing {
            return Err(EngineError::not_found("Employee", "Employee not found."));
        }
        Ok(self.terms.clone())
    }
}

#[async_trait]
impl AttendanceProvider for FakeFacts {
    async fn get_hours_worked(
        &self,
        employee_id: i64,
        _: NaiveDate,
        _: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Decimal> {
        self.record(Some(employee_id), Some(auth));
        if self.failure == Failure::AttendanceDown {
            return Err(EngineError::unavailable("Attendance", "connection reset"));
        }
        Ok(self.hours)
    }
}

#[async_trait]
impl CalendarProvider for FakeFacts {
    async fn get_non_working_day_count(&self, _: NaiveDate, _: NaiveDate) -> EngineResult<i64> {
        self.record(None, None);
        Ok(self.non_working_days)
    }
}

#[async_trait]
impl LeaveProvider for FakeFacts {
    async fn get_approved_leave(
        &self,
        employee_id: i64,
        _: NaiveDate,
        _: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<Vec<LeaveRecord>> {
        self.record(Some(employee_id), Some(auth));
        if self.slow_leave {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.leave_completed.store(true, Ordering::SeqCst);
        Ok(self.leave.clone())
    }
}

#[async_trait]
impl DeductionProvider for FakeFacts {
    async fn get_active_deductions(
        &self,
        employee_id: i64,
        auth: &AuthToken,
    ) -> EngineResult<Vec<DeductionRule>> {
        self.record(Some(employee_id), Some(auth));
        Ok(self.deductions.clone())
    }
}

#[async_trait]
impl TaxBracketProvider for FakeFacts {
    async fn get_brackets(&self, auth: &AuthToken) -> EngineResult<Vec<TaxBracket>> {
        self.record(None, Some(auth));
        if self.failure == Failure::TaxDown {
            return Err(EngineError::unavailable("Tax", "503 Service Unavailable"));
        }
        Ok(self.brackets.clone())
    }
}

fn orchestrator_for(facts: Arc<FakeFacts>) -> PayrollOrchestrator {
    PayrollOrchestrator::new(FactProviders::from_single(facts), CalculationPolicy::default())
}

fn bracket(min: &str, max: Option<&str>, rate: &str, base: &str) -> TaxBracket {
    TaxBracket {
        min_income: Some(dec(min)),
        max_income: max.map(dec),
        rate: Some(dec(rate)),
        flat_base_tax: Some(dec(base)),
    }
}

fn progressive_table() -> Vec<TaxBracket> {
    vec![
        bracket("0", Some("250000"), "0", "0"),
        bracket("250000", Some("400000"), "0.20", "0"),
        bracket("400000", Some("800000"), "0.25", "30000"),
        bracket("800000", None, "0.30", "130000"),
    ]
}

fn deduction(amount: &str, frequency: DeductionFrequency) -> DeductionRule {
    DeductionRule {
        employee_id: 7,
        name: None,
        amount: dec(amount),
        start_date: date(2023, 1, 1),
        end_date: None,
        frequency,
    }
}

fn paid_leave(start: NaiveDate, end: NaiveDate) -> LeaveRecord {
    LeaveRecord {
        id: None,
        employee_id: 7,
        start_date: start,
        end_date: end,
        status: LeaveStatus::Paid,
        leave_type: "ANNUAL".to_string(),
    }
}

// =============================================================================
// Orchestrator scenarios
// =============================================================================

#[tokio::test]
async fn test_hourly_employee_with_paid_leave() {
    let mut facts = FakeFacts::hourly("20", "100");
    facts.leave = vec![paid_leave(date(2024, 4, 10), date(2024, 4, 19))];
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 4, 1), date(2024, 4, 30), &token())
        .await
        .unwrap();

    assert_eq!(result.gross_pay, dec("3600.00"));
    assert_eq!(result.total_hours_worked, dec("100"));
}

#[tokio::test]
async fn test_daily_employee_all_days_non_working() {
    let facts = FakeFacts::daily("150", 15);
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await
        .unwrap();

    assert_eq!(result.gross_pay, dec("0.00"));
    assert_eq!(result.net_pay, dec("0.00"));
}

#[tokio::test]
async fn test_first_half_scenario_with_tax_and_deductions() {
    let mut facts = FakeFacts::daily("2000", 5);
    facts.brackets = vec![
        bracket("0", Some("250000"), "0", "0"),
        bracket("250000", None, "0.20", "0"),
    ];
    facts.deductions = vec![
        deduction("1000", DeductionFrequency::BiMonthly),
        deduction("300", DeductionFrequency::FirstHalf),
        deduction("250", DeductionFrequency::SecondHalf),
    ];
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await
        .unwrap();

    // 2000 x (15 - 5) = 20000; tax 1944.92 (see tax calculator); deductions 500 + 300
    assert_eq!(result.gross_pay, dec("20000.00"));
    assert_eq!(result.total_taxes, dec("1944.92"));
    assert_eq!(result.total_deductions, dec("800.00"));
    assert_eq!(result.net_pay, dec("17255.08"));
}

#[tokio::test]
async fn test_second_half_skips_first_half_deductions() {
    let mut facts = FakeFacts::hourly("10", "80");
    facts.deductions = vec![
        deduction("300", DeductionFrequency::FirstHalf),
        deduction("1000", DeductionFrequency::BiMonthly),
    ];
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 16), date(2024, 1, 31), &token())
        .await
        .unwrap();

    assert_eq!(result.total_deductions, dec("500.00"));
    assert_eq!(result.net_pay, dec("300.00"));
}

#[tokio::test]
async fn test_invalid_period_makes_no_upstream_calls() {
    let facts = Arc::new(FakeFacts::hourly("20", "10"));
    let orchestrator = orchestrator_for(facts.clone());

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 15), date(2024, 1, 1), &token())
        .await;

    assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    assert_eq!(facts.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_multi_century_period_is_rejected_before_upstream_calls() {
    let facts = Arc::new(FakeFacts::hourly("20", "10"));
    let orchestrator = orchestrator_for(facts.clone());

    let result = orchestrator
        .calculate_payroll(7, date(1800, 1, 1), date(2024, 1, 1), &token())
        .await;

    assert!(matches!(result, Err(EngineError::PeriodTooLong { .. })));
    assert_eq!(facts.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extreme_upstream_rate_is_an_error_not_a_panic() {
    let mut facts = FakeFacts::hourly("1", "2");
    facts.terms.hourly_rate = Some(Decimal::MAX);
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await;

    assert!(matches!(
        result,
        Err(EngineError::CalculationOverflow { .. })
    ));
}

#[tokio::test]
async fn test_missing_rates_is_invalid_compensation() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.terms.hourly_rate = None;
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await;

    assert!(matches!(
        result,
        Err(EngineError::InvalidCompensation { employee_id: 7 })
    ));
}

#[tokio::test]
async fn test_strict_tax_policy_rejects_capped_table() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.brackets = vec![bracket("0", Some("250000"), "0", "0")];
    let policy = CalculationPolicy {
        paid_leave: PaidLeavePolicy::default(),
        tax: TaxPolicy {
            require_open_top_bracket: true,
        },
    };
    let orchestrator =
        PayrollOrchestrator::new(FactProviders::from_single(Arc::new(facts)), policy);

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await;

    assert!(matches!(
        result,
        Err(EngineError::InconsistentBracketTable { .. })
    ));
}

// =============================================================================
// Fact gathering
// =============================================================================

#[tokio::test]
async fn test_dependent_facts_use_resolved_employee_id() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.terms.employee_id = 99;
    let facts = Arc::new(facts);
    let orchestrator = orchestrator_for(facts.clone());

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await
        .unwrap();

    assert_eq!(result.employee_id, 99);
    let mut seen = facts.seen_ids.lock().unwrap().clone();
    seen.sort();
    // phase one uses the requested id, leave and deductions the resolved one
    assert_eq!(seen, vec![7, 7, 99, 99]);
}

#[tokio::test]
async fn test_every_provider_is_called_once() {
    let facts = Arc::new(FakeFacts::hourly("20", "10"));
    let orchestrator = orchestrator_for(facts.clone());

    orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await
        .unwrap();

    assert_eq!(facts.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_auth_token_forwarded_unchanged() {
    let facts = Arc::new(FakeFacts::hourly("20", "10"));
    let orchestrator = orchestrator_for(facts.clone());

    orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await
        .unwrap();

    let tokens = facts.seen_tokens.lock().unwrap().clone();
    assert_eq!(tokens.len(), 5);
    assert!(tokens.iter().all(|t| t == "Bearer integration-test"));
}

#[tokio::test]
async fn test_employee_not_found_stops_before_phase_two() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.failure = Failure::EmployeeMissing;
    let facts = Arc::new(facts);
    let orchestrator = orchestrator_for(facts.clone());

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await;

    match result {
        Err(EngineError::UpstreamNotFound { service, .. }) => assert_eq!(service, "Employee"),
        other => panic!("Expected UpstreamNotFound, got {:?}", other),
    }
    // at most the two phase-one calls were made
    assert!(facts.calls.load(Ordering::SeqCst) <= 2);
    assert!(!facts.leave_completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_attendance_failure_is_surfaced_unchanged() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.failure = Failure::AttendanceDown;
    let orchestrator = orchestrator_for(Arc::new(facts));

    let result = orchestrator
        .calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token())
        .await;

    match result {
        Err(EngineError::UpstreamUnavailable { service, message }) => {
            assert_eq!(service, "Attendance");
            assert_eq!(message, "connection reset");
        }
        other => panic!("Expected UpstreamUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_phase_two_failure_cancels_slow_siblings() {
    let mut facts = FakeFacts::hourly("20", "10");
    facts.failure = Failure::TaxDown;
    facts.slow_leave = true;
    let facts = Arc::new(facts);
    let orchestrator = orchestrator_for(facts.clone());

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.calculate_payroll(7, date(2024, 1, 1), date(2024, 1, 15), &token()),
    )
    .await
    .expect("calculation should fail fast instead of waiting for slow leave lookup");

    assert!(matches!(
        result,
        Err(EngineError::UpstreamUnavailable { .. })
    ));
    assert!(!facts.leave_completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_repeated_calculation_is_idempotent() {
    let mut facts = FakeFacts::hourly("31.25", "76.5");
    facts.brackets = progressive_table();
    facts.deductions = vec![deduction("99.99", DeductionFrequency::BiMonthly)];
    facts.leave = vec![paid_leave(date(2024, 2, 1), date(2024, 2, 2))];
    let orchestrator = orchestrator_for(Arc::new(facts));

    let first = orchestrator
        .calculate_payroll(7, date(2024, 2, 1), date(2024, 2, 15), &token())
        .await
        .unwrap();
    let second = orchestrator
        .calculate_payroll(7, date(2024, 2, 1), date(2024, 2, 15), &token())
        .await
        .unwrap();

    assert!(first.same_amounts(&second));
    assert_ne!(first.calculation_id, second.calculation_id);
}

// =============================================================================
// HTTP endpoint
// =============================================================================

fn router_for(facts: FakeFacts) -> Router {
    create_router(AppState::new(orchestrator_for(Arc::new(facts))))
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/payroll/calculate")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer integration-test")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn payroll_request(start: &str, end: &str) -> Value {
    serde_json::json!({
        "employee_id": 7,
        "pay_period_start_date": start,
        "pay_period_end_date": end
    })
}

#[tokio::test]
async fn test_endpoint_returns_payroll() {
    let mut facts = FakeFacts::hourly("20", "100");
    facts.deductions = vec![deduction("1000", DeductionFrequency::BiMonthly)];
    let (status, json) = post_calculate(
        router_for(facts),
        payroll_request("2024-01-01", "2024-01-15"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["gross_pay"], "2000.00");
    assert_eq!(json["total_deductions"], "500.00");
    assert_eq!(json["total_taxes"], "0.00");
    assert_eq!(json["net_pay"], "1500.00");
    assert_eq!(json["pay_period"]["end_date"], "2024-01-15");
    assert!(json["calculation_id"].is_string());
}

#[tokio::test]
async fn test_endpoint_maps_not_found_to_404() {
    let mut facts = FakeFacts::hourly("20", "100");
    facts.failure = Failure::EmployeeMissing;
    let (status, json) = post_calculate(
        router_for(facts),
        payroll_request("2024-01-01", "2024-01-15"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_endpoint_maps_upstream_failure_to_502() {
    let mut facts = FakeFacts::hourly("20", "100");
    facts.failure = Failure::TaxDown;
    let (status, json) = post_calculate(
        router_for(facts),
        payroll_request("2024-01-01", "2024-01-15"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_endpoint_maps_invalid_compensation_to_400() {
    let mut facts = FakeFacts::hourly("20", "100");
    facts.terms.hourly_rate = None;
    let (status, json) = post_calculate(
        router_for(facts),
        payroll_request("2024-01-01", "2024-01-15"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_COMPENSATION");
}

#[tokio::test]
async fn test_endpoint_rejects_multi_century_period() {
    let (status, json) = post_calculate(
        router_for(FakeFacts::hourly("20", "100")),
        payroll_request("1800-01-01", "2024-01-01"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_PERIOD");
}

// =============================================================================
// Properties
// =============================================================================

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

proptest! {
    #[test]
    fn prop_net_pay_equals_gross_less_taxes_and_deductions(
        rate_cents in 1_000i64..20_000,
        hours_tenths in 0i64..2_000,
        deduction_cents in 0i64..100_000,
        period_days in 1i64..31,
    ) {
        let start = date(2024, 3, 1);
        let period = PayPeriod::new(start, start + chrono::Duration::days(period_days - 1)).unwrap();
        let facts = PayrollFacts {
            terms: CompensationTerms {
                employee_id: 1,
                hourly_rate: Some(cents(rate_cents)),
                daily_rate: None,
            },
            hours_worked: Decimal::new(hours_tenths, 1),
            non_working_days: 0,
            leave: vec![],
            deductions: vec![DeductionRule {
                employee_id: 1,
                name: None,
                amount: cents(deduction_cents),
                start_date: date(2024, 1, 1),
                end_date: None,
                frequency: DeductionFrequency::BiMonthly,
            }],
            brackets: progressive_table(),
        };

        let result = compute_payroll(&facts, &period, &CalculationPolicy::default()).unwrap();
        let difference =
            result.net_pay - (result.gross_pay - result.total_taxes - result.total_deductions);
        prop_assert!(difference.abs() <= cents(1));
    }

    #[test]
    fn prop_tax_is_monotonic_in_gross_pay(
        low_cents in 0i64..5_000_000,
        delta_cents in 1i64..5_000_000,
        period_days in 1i64..31,
    ) {
        let start = date(2024, 5, 1);
        let period = PayPeriod::new(start, start + chrono::Duration::days(period_days - 1)).unwrap();
        let brackets = progressive_table();
        let policy = TaxPolicy::default();

        let lower = compute_tax(cents(low_cents), &period, &brackets, &policy).unwrap();
        let higher = compute_tax(cents(low_cents + delta_cents), &period, &brackets, &policy).unwrap();
        prop_assert!(lower.period_tax <= higher.period_tax);
    }

    #[test]
    fn prop_compute_payroll_is_deterministic(
        rate_cents in 5_000i64..50_000,
        non_working_days in 0i64..10,
    ) {
        let period = PayPeriod::new(date(2024, 7, 16), date(2024, 7, 31)).unwrap();
        let facts = PayrollFacts {
            terms: CompensationTerms {
                employee_id: 1,
                hourly_rate: None,
                daily_rate: Some(cents(rate_cents)),
            },
            hours_worked: Decimal::ZERO,
            non_working_days,
            leave: vec![],
            deductions: vec![],
            brackets: progressive_table(),
        };

        let first = compute_payroll(&facts, &period, &CalculationPolicy::default()).unwrap();
        let second = compute_payroll(&facts, &period, &CalculationPolicy::default()).unwrap();
        prop_assert!(first.same_amounts(&second));
    }
}
