//! Flat-rate levy on self-employment income.
//!
//! Income from private individuals and income from entities are taxed at
//! their own fixed rates; the two amounts are summed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{AmountOutOfRange, checked_add, is_fraction, round_subunit};
use crate::{SelfEmploymentIncome, SelfEmploymentRules};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelfEmploymentTaxError {
    #[error("self-employment rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error(transparent)]
    AmountOutOfRange(#[from] AmountOutOfRange),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentTaxResult {
    pub from_individuals: Decimal,
    pub from_entities: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct SelfEmploymentTaxCalculator<'a> {
    rules: &'a SelfEmploymentRules,
}

impl<'a> SelfEmploymentTaxCalculator<'a> {
    pub fn new(rules: &'a SelfEmploymentRules) -> Self {
        Self { rules }
    }

    pub fn validate(&self) -> Result<(), SelfEmploymentTaxError> {
        for rate in [self.rules.individual_rate, self.rules.entity_rate] {
            if !is_fraction(rate) {
                return Err(SelfEmploymentTaxError::InvalidRate(rate));
            }
        }
        Ok(())
    }

    /// Calculates the levy. `None` means the person is not self-employed.
    ///
    /// # Errors
    ///
    /// Returns [`SelfEmploymentTaxError`] if either rate is outside `[0, 1]`.
    pub fn calculate(
        &self,
        income: Option<&SelfEmploymentIncome>,
    ) -> Result<SelfEmploymentTaxResult, SelfEmploymentTaxError> {
        self.validate()?;

        let Some(income) = income else {
            return Ok(SelfEmploymentTaxResult::default());
        };

        let from_individuals = self.stream_tax(income.from_individuals, self.rules.individual_rate);
        let from_entities = self.stream_tax(income.from_entities, self.rules.entity_rate);

        Ok(SelfEmploymentTaxResult {
            from_individuals,
            from_entities,
            total: checked_add("self_employment", from_individuals, from_entities)?,
        })
    }

    fn stream_tax(
        &self,
        amount: Decimal,
        rate: Decimal,
    ) -> Decimal {
        round_subunit(round_subunit(amount.max(Decimal::ZERO)) * rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn calculate_without_self_employment_is_zero() {
        let rules = SelfEmploymentRules::default();

        let result = SelfEmploymentTaxCalculator::new(&rules)
            .calculate(None)
            .unwrap();

        assert_eq!(result, SelfEmploymentTaxResult::default());
    }

    #[test]
    fn calculate_applies_rate_per_payer_type() {
        let rules = SelfEmploymentRules::default();
        let income = SelfEmploymentIncome {
            from_individuals: dec!(300000),
            from_entities: dec!(500000),
        };

        let result = SelfEmploymentTaxCalculator::new(&rules)
            .calculate(Some(&income))
            .unwrap();

        // 300,000 × 4% + 500,000 × 6%
        assert_eq!(result.from_individuals, dec!(12000));
        assert_eq!(result.from_entities, dec!(30000));
        assert_eq!(result.total, dec!(42000));
    }

    #[test]
    fn calculate_rounds_each_stream() {
        let rules = SelfEmploymentRules::default();
        let income = SelfEmploymentIncome {
            from_individuals: dec!(1000.13),
            from_entities: dec!(0),
        };

        let result = SelfEmploymentTaxCalculator::new(&rules)
            .calculate(Some(&income))
            .unwrap();

        // 1,000.13 × 0.04 = 40.0052
        assert_eq!(result.total, dec!(40.01));
    }

    #[test]
    fn calculate_rejects_invalid_rate() {
        let rules = SelfEmploymentRules {
            individual_rate: dec!(-0.04),
            entity_rate: dec!(0.06),
        };

        let result = SelfEmploymentTaxCalculator::new(&rules).calculate(None);

        assert_eq!(result, Err(SelfEmploymentTaxError::InvalidRate(dec!(-0.04))));
    }

    #[test]
    fn calculate_reports_total_too_large() {
        let rules = SelfEmploymentRules {
            individual_rate: dec!(1),
            entity_rate: dec!(1),
        };
        let income = SelfEmploymentIncome {
            from_individuals: Decimal::MAX,
            from_entities: Decimal::MAX,
        };

        let result = SelfEmploymentTaxCalculator::new(&rules).calculate(Some(&income));

        assert_eq!(
            result,
            Err(SelfEmploymentTaxError::AmountOutOfRange(AmountOutOfRange {
                field: "self_employment",
            }))
        );
    }
}
