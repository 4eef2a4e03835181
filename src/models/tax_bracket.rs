//! Progressive tax bracket model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of a progressive tax table, expressed on annual income.
///
/// Missing values take the neutral defaults used by the tax walk: a missing
/// lower bound is zero, a missing upper bound is unbounded, and a missing
/// rate or base tax is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket.
    #[serde(default)]
    pub min_income: Option<Decimal>,
    /// Upper bound of the bracket (inclusive); `None` for the top bracket.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Marginal rate as a fraction, e.g. `0.20`.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Tax already accumulated by all lower brackets.
    #[serde(default)]
    pub flat_base_tax: Option<Decimal>,
}

impl TaxBracket {
    /// Lower bound, with `None` treated as zero.
    pub fn lower_bound(&self) -> Decimal {
        self.min_income.unwrap_or(Decimal::ZERO)
    }

    /// Marginal rate, with `None` treated as zero.
    pub fn marginal_rate(&self) -> Decimal {
        self.rate.unwrap_or(Decimal::ZERO)
    }

    /// Base tax, with `None` treated as zero.
    pub fn base_tax(&self) -> Decimal {
        self.flat_base_tax.unwrap_or(Decimal::ZERO)
    }

    /// Whether `annual_income` lies at or below this bracket's upper bound.
    pub fn covers_up_to(&self, annual_income: Decimal) -> bool {
        self.max_income.is_none_or(|max| annual_income <= max)
    }
}
