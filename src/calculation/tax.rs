//! Progressive income tax calculation.
//!
//! Pay-period gross pay is projected to an annual figure, the bracket table
//! is walked in ascending order, and the resulting annual tax is scaled back
//! down to the pay period.
//!
//! Income exactly equal to a bracket's lower bound belongs to the bracket
//! below it: a bracket applies when `min < income <= max`.

use rust_decimal::Decimal;

use crate::config::TaxPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, TaxBracket};

use super::period::{periods_per_year, round_money};

/// The result of a tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxResult {
    /// Tax for the pay period, rounded to cents.
    pub period_tax: Decimal,
    /// Tax on the annualized gross, unrounded.
    pub annual_tax: Decimal,
    /// Gross pay projected to a full year.
    pub annual_gross: Decimal,
    /// The proration factor used, rounded to two decimals.
    pub periods_per_year: Decimal,
}

/// Computes annual tax on `annual_gross` using `brackets`.
///
/// Brackets are sorted by lower bound before the walk. For every bracket the
/// income passes through, the tax is the bracket's base plus its full width
/// at the marginal rate; the walk stops at the bracket containing the income.
/// Income at or below the first lower bound is untaxed. Income above a
/// bounded top bracket is taxed as if it ended at that bound.
///
/// Fails with `CalculationOverflow` if a bracket's tax leaves the decimal
/// range.
pub fn annual_tax(annual_gross: Decimal, brackets: &[TaxBracket]) -> EngineResult<Decimal> {
    let mut sorted: Vec<&TaxBracket> = brackets.iter().collect();
    sorted.sort_by_key(|bracket| bracket.lower_bound());

    let mut tax = Decimal::ZERO;
    for bracket in sorted {
        let min = bracket.lower_bound();
        if annual_gross <= min {
            break;
        }
        let contains_income = bracket.covers_up_to(annual_gross);
        let taxed_to = match bracket.max_income {
            Some(max) if !contains_income => max,
            _ => annual_gross,
        };
        tax = taxed_to
            .checked_sub(min)
            .and_then(|width| width.checked_mul(bracket.marginal_rate()))
            .and_then(|marginal| marginal.checked_add(bracket.base_tax()))
            .ok_or_else(|| EngineError::overflow("annual tax"))?;
        if contains_income {
            break;
        }
    }
    Ok(tax)
}

/// Checks that the table can tax any income: it must be non-empty and its
/// highest bracket must be open-ended.
pub fn validate_bracket_table(brackets: &[TaxBracket]) -> EngineResult<()> {
    let top = brackets
        .iter()
        .max_by_key(|bracket| bracket.lower_bound())
        .ok_or_else(|| EngineError::InconsistentBracketTable {
            message: "tax bracket table is empty".to_string(),
        })?;

    if let Some(max) = top.max_income {
        return Err(EngineError::InconsistentBracketTable {
            message: format!("top bracket is capped at {}; no open-ended bracket", max),
        });
    }
    Ok(())
}

/// Computes the tax withheld for a pay period.
///
/// # Arguments
///
/// * `gross_pay` - Gross pay for the period (unrounded)
/// * `period` - The pay period, used to derive the proration factor
/// * `brackets` - The tax bracket table, in any order
/// * `policy` - Whether the table must end in an open-ended bracket
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_tax;
/// use payroll_engine::config::TaxPolicy;
/// use payroll_engine::models::{PayPeriod, TaxBracket};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// ).unwrap();
/// let brackets = vec![
///     TaxBracket {
///         min_income: Some(Decimal::ZERO),
///         max_income: Some(Decimal::new(250_000, 0)),
///         rate: Some(Decimal::ZERO),
///         flat_base_tax: Some(Decimal::ZERO),
///     },
///     TaxBracket {
///         min_income: Some(Decimal::new(250_000, 0)),
///         max_income: None,
///         rate: Some(Decimal::new(20, 2)),
///         flat_base_tax: Some(Decimal::ZERO),
///     },
/// ];
///
/// let result = compute_tax(Decimal::new(20_000, 0), &period, &brackets, &TaxPolicy::default()).unwrap();
/// assert_eq!(result.period_tax, Decimal::new(194_492, 2));
/// ```
///
/// # Errors
///
/// `InconsistentBracketTable` when the policy demands an open-ended top
/// bracket and the table lacks one; `CalculationOverflow` when an
/// intermediate amount exceeds the decimal range.
pub fn compute_tax(
    gross_pay: Decimal,
    period: &PayPeriod,
    brackets: &[TaxBracket],
    policy: &TaxPolicy,
) -> EngineResult<TaxResult> {
    if policy.require_open_top_bracket {
        validate_bracket_table(brackets)?;
    }

    let periods_per_year = periods_per_year(period);
    let annual_gross = gross_pay
        .checked_mul(periods_per_year)
        .ok_or_else(|| EngineError::overflow("annual gross"))?;
    let annual_tax = annual_tax(annual_gross, brackets)?;
    let period_tax = annual_tax
        .checked_div(periods_per_year)
        .map(round_money)
        .ok_or_else(|| EngineError::overflow("period tax"))?;

    Ok(TaxResult {
        period_tax,
        annual_tax,
        annual_gross,
        periods_per_year,
    })
}
