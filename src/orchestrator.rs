//! Payroll orchestration.
//!
//! The [`PayrollOrchestrator`] gathers the facts for a calculation from the
//! providers in two concurrent phases and then runs the calculators:
//!
//! 1. compensation terms and hours worked;
//! 2. deductions, non-working days, tax brackets and leave, keyed by the
//!    employee id from the resolved terms.
//!
//! Each phase waits for all of its requests. The first failure in a phase
//! drops the remaining requests of that phase and is returned unchanged.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{compute_deductions, compute_gross_pay, compute_tax, round_money};
use crate::config::CalculationPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompensationTerms, DeductionRule, LeaveRecord, PayPeriod, PayrollResult, TaxBracket,
};
use crate::providers::{
    AttendanceProvider, AuthToken, CalendarProvider, CompensationProvider, DeductionProvider,
    LeaveProvider, TaxBracketProvider,
};

/// The providers an orchestrator draws facts from.
#[derive(Clone)]
pub struct FactProviders {
    /// Compensation terms source.
    pub compensation: Arc<dyn CompensationProvider>,
    /// Hours worked source.
    pub attendance: Arc<dyn AttendanceProvider>,
    /// Non-working day source.
    pub calendar: Arc<dyn CalendarProvider>,
    /// Leave source.
    pub leave: Arc<dyn LeaveProvider>,
    /// Deduction source.
    pub deductions: Arc<dyn DeductionProvider>,
    /// Tax bracket source.
    pub tax_brackets: Arc<dyn TaxBracketProvider>,
}

impl FactProviders {
    /// Uses one value for every provider role.
    pub fn from_single<P>(provider: Arc<P>) -> Self
    where
        P: CompensationProvider
            + AttendanceProvider
            + CalendarProvider
            + LeaveProvider
            + DeductionProvider
            + TaxBracketProvider
            + 'static,
    {
        Self {
            compensation: provider.clone(),
            attendance: provider.clone(),
            calendar: provider.clone(),
            leave: provider.clone(),
            deductions: provider.clone(),
            tax_brackets: provider,
        }
    }
}

/// All facts needed for one calculation, as resolved from the providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollFacts {
    /// The employee's pay terms.
    pub terms: CompensationTerms,
    /// Hours worked in the period.
    pub hours_worked: Decimal,
    /// Holidays and suspensions in the period.
    pub non_working_days: i64,
    /// Leave intersecting the period.
    pub leave: Vec<LeaveRecord>,
    /// The employee's deduction rules.
    pub deductions: Vec<DeductionRule>,
    /// The tax bracket table.
    pub brackets: Vec<TaxBracket>,
}

/// Runs the calculators over resolved facts and assembles the result.
///
/// Gross pay, deductions and tax are combined at full precision; every
/// monetary field is rounded to cents only when the result is assembled.
pub fn compute_payroll(
    facts: &PayrollFacts,
    period: &PayPeriod,
    policy: &CalculationPolicy,
) -> EngineResult<PayrollResult> {
    let gross = compute_gross_pay(
        &facts.terms,
        facts.hours_worked,
        facts.non_working_days,
        period,
        &facts.leave,
        &policy.paid_leave,
    )?;
    let total_deductions = compute_deductions(&facts.deductions, period)?;
    let tax = compute_tax(gross.gross_pay, period, &facts.brackets, &policy.tax)?;
    let net_pay = gross
        .gross_pay
        .checked_sub(total_deductions)
        .and_then(|net| net.checked_sub(tax.period_tax))
        .ok_or_else(|| EngineError::overflow("net pay"))?;

    Ok(PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        employee_id: facts.terms.employee_id,
        pay_period: *period,
        gross_pay: round_money(gross.gross_pay),
        total_taxes: round_money(tax.period_tax),
        total_deductions: round_money(total_deductions),
        net_pay: round_money(net_pay),
        total_hours_worked: facts.hours_worked,
    })
}

/// Computes payroll by gathering facts from the injected providers.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::orchestrator::{FactProviders, PayrollOrchestrator};
/// use payroll_engine::providers::{AuthToken, HttpFactProvider};
///
/// # async fn run() -> payroll_engine::error::EngineResult<()> {
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// let http = HttpFactProvider::new(loader.services().clone(), &loader.config().http)?;
/// let orchestrator = PayrollOrchestrator::new(
///     FactProviders::from_single(Arc::new(http)),
///     loader.policy().clone(),
/// );
///
/// let result = orchestrator
///     .calculate_payroll(
///         42,
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///         &AuthToken::new("Bearer token"),
///     )
///     .await?;
/// println!("Net pay: {}", result.net_pay);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PayrollOrchestrator {
    providers: FactProviders,
    policy: CalculationPolicy,
}

impl PayrollOrchestrator {
    /// Creates an orchestrator over the given providers and policy.
    pub fn new(providers: FactProviders, policy: CalculationPolicy) -> Self {
        Self { providers, policy }
    }

    /// Validates the period and computes payroll for it.
    ///
    /// # Errors
    ///
    /// `InvalidPeriod` if `period_end` is before `period_start`; otherwise
    /// any error from [`PayrollOrchestrator::calculate`].
    pub async fn calculate_payroll(
        &self,
        employee_id: i64,
        period_start: NaiveDate,
        period_end: NaiveDate,
        auth: &AuthToken,
    ) -> EngineResult<PayrollResult> {
        let period = PayPeriod::new(period_start, period_end).inspect_err(|e| {
            warn!(employee_id, error = %e, "Rejected pay period");
        })?;
        self.calculate(employee_id, &period, auth).await
    }

    /// Computes payroll for `employee_id` over `period`.
    ///
    /// # Errors
    ///
    /// Provider errors are returned unchanged. `InvalidCompensation` and
    /// `InconsistentBracketTable` come from the calculators.
    pub async fn calculate(
        &self,
        employee_id: i64,
        period: &PayPeriod,
        auth: &AuthToken,
    ) -> EngineResult<PayrollResult> {
        info!(
            employee_id,
            start = %period.start_date(),
            end = %period.end_date(),
            "Calculating payroll"
        );

        let facts = self
            .gather_facts(employee_id, period, auth)
            .await
            .inspect_err(|e| warn!(employee_id, error = %e, "Fact gathering failed"))?;

        let result = compute_payroll(&facts, period, &self.policy)?;
        info!(
            employee_id,
            calculation_id = %result.calculation_id,
            gross_pay = %result.gross_pay,
            net_pay = %result.net_pay,
            "Payroll calculated"
        );
        Ok(result)
    }

    async fn gather_facts(
        &self,
        employee_id: i64,
        period: &PayPeriod,
        auth: &AuthToken,
    ) -> EngineResult<PayrollFacts> {
        let (start, end) = (period.start_date(), period.end_date());
        let providers = &self.providers;

        let (terms, hours_worked) = tokio::try_join!(
            providers.compensation.get_terms(employee_id, auth),
            providers
                .attendance
                .get_hours_worked(employee_id, start, end, auth),
        )?;
        debug!(employee_id, hours_worked = %hours_worked, "Terms and hours resolved");

        let resolved_id = terms.employee_id;
        let (deductions, non_working_days, brackets, leave) = tokio::try_join!(
            providers.deductions.get_active_deductions(resolved_id, auth),
            providers.calendar.get_non_working_day_count(start, end),
            providers.tax_brackets.get_brackets(auth),
            providers
                .leave
                .get_approved_leave(resolved_id, start, end, auth),
        )?;
        debug!(
            employee_id = resolved_id,
            deductions = deductions.len(),
            non_working_days,
            brackets = brackets.len(),
            leave = leave.len(),
            "Dependent facts resolved"
        );

        Ok(PayrollFacts {
            terms,
            hours_worked,
            non_working_days,
            leave,
            deductions,
            brackets,
        })
    }
}
