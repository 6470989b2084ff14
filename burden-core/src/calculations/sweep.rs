//! Burden across a range of salaries.
//!
//! Re-runs the aggregator for evenly spaced salaries between zero and twice
//! the profile's salary, keeping every other field of the profile. The
//! salary keeps the profile's [`SalaryType`](crate::SalaryType), so a net
//! profile sweeps over net salaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{checked_mul, round_subunit};
use crate::calculations::totals::{CalculationError, TaxBurdenCalculator};
use crate::{Profile, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Monthly salary as the profile states it.
    pub salary: Decimal,
    pub income_tax: Decimal,
    pub employer_contributions: Option<Decimal>,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

/// Calculates `2 × steps + 1` points from zero to twice the current salary.
///
/// A zero salary or zero `steps` yields a single point at the current
/// salary.
///
/// # Errors
///
/// Returns the first [`CalculationError`] raised by any point.
pub fn salary_sweep(
    profile: &Profile,
    rules: &RuleSet,
    steps: u32,
) -> Result<Vec<SweepPoint>, CalculationError> {
    let calculator = TaxBurdenCalculator::new(rules);
    let current = profile.salary.max(Decimal::ZERO);

    if current.is_zero() || steps == 0 {
        return Ok(vec![point(&calculator, profile, current)?]);
    }

    let steps = u64::from(steps);
    let step = current / Decimal::from(steps);
    (0..=2 * steps)
        .map(|i| {
            let salary = if i == steps {
                current
            } else {
                round_subunit(checked_mul("salary", step, Decimal::from(i))?)
            };
            point(&calculator, profile, salary)
        })
        .collect()
}

fn point(
    calculator: &TaxBurdenCalculator<'_>,
    profile: &Profile,
    salary: Decimal,
) -> Result<SweepPoint, CalculationError> {
    let result = calculator.calculate(&Profile {
        salary,
        ..profile.clone()
    })?;

    Ok(SweepPoint {
        salary,
        income_tax: result.income_tax,
        employer_contributions: result.employer_contributions,
        total_taxes: result.total_taxes,
        net_income: result.net_income,
    })
}
