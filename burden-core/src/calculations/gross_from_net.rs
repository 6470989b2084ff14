//! Recovers a gross salary from the salary actually received.
//!
//! The progressive schedule has no closed-form inverse, so the solver
//! bisects over the annual gross salary. Income tax is non-decreasing in
//! income and no marginal rate exceeds 100%, so the implied net is
//! non-decreasing in gross and the bisection converges.
//!
//! The search interval is `[max(net - other, 0), 2 × net]` (annual). The
//! upper bound assumes the top marginal rate does not exceed 50%; when it
//! does the root may lie outside the interval, which is reported as
//! [`GrossFromNetError::NotBracketed`] instead of returning a wrong figure.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use burden_core::TaxBracket;
//! use burden_core::calculations::GrossFromNetSolver;
//!
//! let brackets = vec![TaxBracket::new(dec!(0), dec!(0.13))];
//!
//! let gross = GrossFromNetSolver::new(&brackets)
//!     .solve(dec!(87000), dec!(0))
//!     .unwrap();
//!
//! assert!((gross - dec!(100000)).abs() <= dec!(0.01));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::TaxBracket;
use crate::calculations::common::{AmountOutOfRange, SUBUNIT, checked_add, checked_mul, max};
use crate::calculations::income_tax::{IncomeTaxCalculator, IncomeTaxError};

/// Iteration cap for the bisection.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrossFromNetError {
    #[error(transparent)]
    IncomeTax(#[from] IncomeTaxError),

    #[error(transparent)]
    AmountOutOfRange(#[from] AmountOutOfRange),

    /// Even the upper search bound leaves less than the requested net.
    #[error("net {net_annual} cannot be reached below gross {upper_bound}")]
    NotBracketed {
        net_annual: Decimal,
        upper_bound: Decimal,
    },

    /// The iteration cap was hit before the interval narrowed to tolerance.
    #[error("gross salary did not converge after {iterations} iterations")]
    NotConverged {
        iterations: u32,
        best_estimate: Decimal,
    },
}

impl GrossFromNetError {
    /// Monthly gross at the centre of the last interval, if the search ran
    /// out of iterations. Callers that accept an unconverged figure must ask
    /// for it explicitly.
    pub fn best_estimate(&self) -> Option<Decimal> {
        match self {
            Self::NotConverged { best_estimate, .. } => Some(*best_estimate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GrossFromNetSolver<'a> {
    brackets: &'a [TaxBracket],
    max_iterations: u32,
}

impl<'a> GrossFromNetSolver<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self {
            brackets,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(
        mut self,
        max_iterations: u32,
    ) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the monthly gross salary that leaves `net_monthly` after
    /// income tax, given `other_income` per year taxed alongside it.
    ///
    /// The result satisfies
    /// `tax(gross × 12 + other) == gross × 12 + other − net × 12`
    /// to within one currency subunit.
    ///
    /// # Errors
    ///
    /// * [`GrossFromNetError::IncomeTax`]: the schedule is unusable.
    /// * [`GrossFromNetError::NotBracketed`]: the top rate is too high for
    ///   the search interval.
    /// * [`GrossFromNetError::NotConverged`]: the iteration cap was hit.
    /// * [`GrossFromNetError::AmountOutOfRange`]: the search interval does
    ///   not fit in a `Decimal`.
    pub fn solve(
        &self,
        net_monthly: Decimal,
        other_income: Decimal,
    ) -> Result<Decimal, GrossFromNetError> {
        let calculator = IncomeTaxCalculator::new(self.brackets);
        calculator.sorted_brackets()?;

        let net_annual = checked_mul("salary", net_monthly, MONTHS)?;
        if net_annual <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let other_income = other_income.max(Decimal::ZERO);

        let mut low = max(net_annual - other_income, Decimal::ZERO);
        let mut high = checked_mul("salary", net_annual, Decimal::TWO)?;

        if self.implied_net(&calculator, high, other_income)? < net_annual {
            return Err(GrossFromNetError::NotBracketed {
                net_annual,
                upper_bound: high,
            });
        }

        let width_tolerance = SUBUNIT / Decimal::TWO;

        for iteration in 0..self.max_iterations {
            if high - low <= width_tolerance {
                debug!(iteration, "gross salary interval converged");
                return Ok(midpoint(low, high) / MONTHS);
            }

            let candidate = midpoint(low, high);
            let implied = self.implied_net(&calculator, candidate, other_income)?;

            if (implied - net_annual).abs() < SUBUNIT {
                debug!(iteration, gross_annual = %candidate, "gross salary found");
                return Ok(candidate / MONTHS);
            }

            if implied < net_annual {
                low = candidate;
            } else {
                high = candidate;
            }
        }

        if high - low <= width_tolerance {
            return Ok(midpoint(low, high) / MONTHS);
        }

        let best_estimate = midpoint(low, high) / MONTHS;
        warn!(
            iterations = self.max_iterations,
            best_estimate = %best_estimate,
            "gross salary search did not converge"
        );
        Err(GrossFromNetError::NotConverged {
            iterations: self.max_iterations,
            best_estimate,
        })
    }

    /// Annual income left after tax for an annual gross salary.
    fn implied_net(
        &self,
        calculator: &IncomeTaxCalculator<'_>,
        gross_annual: Decimal,
        other_income: Decimal,
    ) -> Result<Decimal, GrossFromNetError> {
        let income = checked_add("other_income", gross_annual, other_income)?;
        let tax = calculator.calculate(income)?.total;
        Ok(income - tax)
    }
}

fn midpoint(
    low: Decimal,
    high: Decimal,
) -> Decimal {
    low + (high - low) / Decimal::TWO
}
