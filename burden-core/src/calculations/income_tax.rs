//! Progressive income tax.
//!
//! Each bracket's rate applies only to the slice of income between its own
//! threshold and the next bracket's threshold. The tax for every slice is
//! rounded to the currency subunit before the slices are summed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use burden_core::TaxBracket;
//! use burden_core::calculations::IncomeTaxCalculator;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), dec!(0.13)),
//!     TaxBracket::new(dec!(2400000), dec!(0.15)),
//! ];
//!
//! let result = IncomeTaxCalculator::new(&brackets)
//!     .calculate(dec!(2500000))
//!     .unwrap();
//!
//! // 2,400,000 × 13% + 100,000 × 15%
//! assert_eq!(result.total, dec!(327000.00));
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;
use crate::calculations::common::{is_fraction, round_subunit};

/// Errors raised for a schedule that cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeTaxError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("duplicate bracket threshold {0}")]
    DuplicateThreshold(Decimal),

    #[error("bracket threshold must be non-negative, got {0}")]
    NegativeThreshold(Decimal),

    #[error("bracket rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),
}

/// The part of income taxed inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    /// 1-based position of the bracket in the sorted schedule.
    pub bracket: usize,
    pub income: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Total tax, at subunit precision.
    pub total: Decimal,
    /// One entry per bracket with a non-empty slice, lowest first.
    pub breakdown: Vec<BracketSlice>,
}

impl IncomeTaxResult {
    fn zero() -> Self {
        Self {
            total: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }
}

/// Applies a progressive schedule to an annual income.
#[derive(Debug, Clone)]
pub struct IncomeTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> IncomeTaxCalculator<'a> {
    /// The brackets may be given in any order.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Returns the schedule sorted by threshold, or the first reason it
    /// cannot be used.
    pub fn sorted_brackets(&self) -> Result<Vec<TaxBracket>, IncomeTaxError> {
        if self.brackets.is_empty() {
            return Err(IncomeTaxError::NoTaxBrackets);
        }

        let mut sorted = self.brackets.to_vec();
        sorted.sort_by(|a, b| a.threshold.cmp(&b.threshold));

        for bracket in &sorted {
            if bracket.threshold < Decimal::ZERO {
                return Err(IncomeTaxError::NegativeThreshold(bracket.threshold));
            }
            if !is_fraction(bracket.rate) {
                return Err(IncomeTaxError::InvalidRate(bracket.rate));
            }
        }
        if let Some(pair) = sorted
            .windows(2)
            .find(|pair| pair[0].threshold == pair[1].threshold)
        {
            return Err(IncomeTaxError::DuplicateThreshold(pair[1].threshold));
        }

        Ok(sorted)
    }

    /// Calculates the tax on `income` together with its per-bracket slices.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeTaxError`] if the schedule is empty or malformed.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> Result<IncomeTaxResult, IncomeTaxError> {
        let sorted = self.sorted_brackets()?;
        let income = round_subunit(income);

        if income <= Decimal::ZERO {
            return Ok(IncomeTaxResult::zero());
        }

        let mut total = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for (index, bracket) in sorted.iter().enumerate() {
            let lower = bracket.threshold;
            if income <= lower {
                break;
            }

            let upper = sorted.get(index + 1).map(|next| next.threshold);
            let slice = self.slice_income(income, lower, upper);
            if slice <= Decimal::ZERO {
                continue;
            }

            let tax = round_subunit(slice * bracket.rate);
            total += tax;
            breakdown.push(BracketSlice {
                bracket: index + 1,
                income: slice,
                rate: bracket.rate,
                tax,
            });
        }

        Ok(IncomeTaxResult {
            total: round_subunit(total),
            breakdown,
        })
    }

    /// Rate applied to the next unit of income on top of `income`.
    ///
    /// Zero below the lowest threshold, where income is untaxed.
    pub fn marginal_rate(
        &self,
        income: Decimal,
    ) -> Result<Decimal, IncomeTaxError> {
        let sorted = self.sorted_brackets()?;
        let income = round_subunit(income);

        Ok(sorted
            .iter()
            .rev()
            .find(|b| income >= b.threshold)
            .map_or(Decimal::ZERO, |b| b.rate))
    }

    /// Highest rate anywhere in the schedule.
    pub fn top_rate(&self) -> Result<Decimal, IncomeTaxError> {
        let sorted = self.sorted_brackets()?;

        Ok(sorted
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO))
    }

    /// Income that falls between `lower` and `upper` (unbounded when `None`).
    fn slice_income(
        &self,
        income: Decimal,
        lower: Decimal,
        upper: Option<Decimal>,
    ) -> Decimal {
        let capped = match upper {
            Some(upper) => income.min(upper),
            None => income,
        };
        capped - lower
    }
}
