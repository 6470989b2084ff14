//! Employer social contributions.
//!
//! Every tier of a [`ContributionSchedule`] charges its base rate up to the
//! shared limit base and its above-cap rate on the excess. Tiers are
//! independent of each other; the total is the sum of the tier amounts, so
//! the reported parts always add up to the reported total.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use burden_core::{ContributionSchedule, ContributionTier};
//! use burden_core::calculations::EmployerContribCalculator;
//!
//! let schedule = ContributionSchedule {
//!     limit_base: dec!(2759000),
//!     tiers: vec![
//!         ContributionTier::new("pension", dec!(0.22), dec!(0.10)),
//!         ContributionTier::flat("medical", dec!(0.051)),
//!         ContributionTier::flat("social", dec!(0.029)),
//!         ContributionTier::flat("injury", dec!(0.002)),
//!     ],
//! };
//!
//! let result = EmployerContribCalculator::new(&schedule)
//!     .calculate(dec!(3000000))
//!     .unwrap();
//!
//! assert_eq!(result.total, dec!(877080));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ContributionSchedule;
use crate::calculations::common::{AmountOutOfRange, checked_sum, is_fraction, round_subunit};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmployerContribError {
    #[error("limit base must be non-negative, got {0}")]
    NegativeLimitBase(Decimal),

    #[error("contribution rate for tier '{tier}' must be between 0 and 1, got {rate}")]
    InvalidRate { tier: String, rate: Decimal },

    #[error(transparent)]
    AmountOutOfRange(#[from] AmountOutOfRange),
}

/// Amount owed for one named tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierContribution {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// In schedule order.
    pub tiers: Vec<TierContribution>,
    pub total: Decimal,
}

impl ContributionBreakdown {
    /// Looks up a tier's amount by name.
    pub fn tier(
        &self,
        name: &str,
    ) -> Option<Decimal> {
        self.tiers.iter().find(|t| t.name == name).map(|t| t.amount)
    }
}

#[derive(Debug, Clone)]
pub struct EmployerContribCalculator<'a> {
    schedule: &'a ContributionSchedule,
}

impl<'a> EmployerContribCalculator<'a> {
    pub fn new(schedule: &'a ContributionSchedule) -> Self {
        Self { schedule }
    }

    /// Checks the cap and every tier rate.
    pub fn validate(&self) -> Result<(), EmployerContribError> {
        if self.schedule.limit_base < Decimal::ZERO {
            return Err(EmployerContribError::NegativeLimitBase(
                self.schedule.limit_base,
            ));
        }
        for tier in &self.schedule.tiers {
            for rate in [tier.base_rate, tier.above_cap_rate] {
                if !is_fraction(rate) {
                    return Err(EmployerContribError::InvalidRate {
                        tier: tier.name.clone(),
                        rate,
                    });
                }
            }
        }
        Ok(())
    }

    /// Calculates contributions on an annual salary base.
    ///
    /// A negative base is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`EmployerContribError`] if the schedule is invalid.
    pub fn calculate(
        &self,
        annual_base: Decimal,
    ) -> Result<ContributionBreakdown, EmployerContribError> {
        self.validate()?;

        let base = round_subunit(annual_base).max(Decimal::ZERO);
        let cap = round_subunit(self.schedule.limit_base);

        let tiers: Vec<TierContribution> = self
            .schedule
            .tiers
            .iter()
            .map(|tier| TierContribution {
                name: tier.name.clone(),
                amount: self.tier_amount(base, cap, tier.base_rate, tier.above_cap_rate),
            })
            .collect();
        let total = checked_sum("employer_contributions", tiers.iter().map(|t| t.amount))?;

        Ok(ContributionBreakdown { tiers, total })
    }

    fn tier_amount(
        &self,
        base: Decimal,
        cap: Decimal,
        base_rate: Decimal,
        above_cap_rate: Decimal,
    ) -> Decimal {
        if base <= cap {
            return round_subunit(base * base_rate);
        }

        let below_cap = round_subunit(cap * base_rate);
        let above_cap = round_subunit((base - cap) * above_cap_rate);
        below_cap + above_cap
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::ContributionTier;

    fn test_schedule_2025() -> ContributionSchedule {
        ContributionSchedule {
            limit_base: dec!(2759000),
            tiers: vec![
                ContributionTier::new("pension", dec!(0.22), dec!(0.10)),
                ContributionTier::flat("medical", dec!(0.051)),
                ContributionTier::flat("social", dec!(0.029)),
                ContributionTier::flat("injury", dec!(0.002)),
            ],
        }
    }

    fn total_for(annual_base: Decimal) -> Decimal {
        let schedule = test_schedule_2025();
        EmployerContribCalculator::new(&schedule)
            .calculate(annual_base)
            .unwrap()
            .total
    }

    #[test]
    fn calculate_below_limit_base() {
        let schedule = test_schedule_2025();
        let calculator = EmployerContribCalculator::new(&schedule);

        let result = calculator.calculate(dec!(1200000)).unwrap();

        // 1,200,000 × 0.302
        assert_eq!(result.total, dec!(362400));
        assert_eq!(result.tier("pension"), Some(dec!(264000)));
        assert_eq!(result.tier("medical"), Some(dec!(61200)));
        assert_eq!(result.tier("social"), Some(dec!(34800)));
        assert_eq!(result.tier("injury"), Some(dec!(2400)));
    }

    #[test]
    fn calculate_below_limit_equals_base_times_rate_sum() {
        let schedule = test_schedule_2025();
        let base = dec!(1999900);

        assert_eq!(total_for(base), base * schedule.total_base_rate());
    }

    #[test]
    fn calculate_at_limit_base() {
        // 2,759,000 × 0.302
        assert_eq!(total_for(dec!(2759000)), dec!(833218));
    }

    #[test]
    fn calculate_just_above_limit_base() {
        let schedule = test_schedule_2025();
        let calculator = EmployerContribCalculator::new(&schedule);

        let result = calculator.calculate(dec!(3000000)).unwrap();

        // 833,218 + 241,000 × 0.182
        assert_eq!(result.total, dec!(877080));
        assert_eq!(result.tier("pension"), Some(dec!(606980) + dec!(24100)));
    }

    #[test]
    fn calculate_far_above_limit_base() {
        // 833,218 + 3,241,000 × 0.182
        assert_eq!(total_for(dec!(6000000)), dec!(1423080));
    }

    #[test]
    fn calculate_above_limit_matches_split_formula() {
        let schedule = test_schedule_2025();
        let base = dec!(4500000);
        let cap = schedule.limit_base;

        let expected =
            cap * schedule.total_base_rate() + (base - cap) * schedule.total_above_cap_rate();

        assert_eq!(total_for(base), expected);
    }

    #[test]
    fn calculate_tiers_sum_to_total() {
        let schedule = test_schedule_2025();
        let calculator = EmployerContribCalculator::new(&schedule);

        let result = calculator.calculate(dec!(1481481.48)).unwrap();
        let sum: Decimal = result.tiers.iter().map(|t| t.amount).sum();

        assert_eq!(sum, result.total);
    }

    #[test]
    fn calculate_zero_base() {
        let schedule = test_schedule_2025();
        let calculator = EmployerContribCalculator::new(&schedule);

        let result = calculator.calculate(dec!(0)).unwrap();

        assert_eq!(result.total, dec!(0));
        assert_eq!(result.tiers.len(), 4);
    }

    #[test]
    fn calculate_negative_base_is_zero() {
        assert_eq!(total_for(dec!(-100)), dec!(0));
    }

    #[test]
    fn calculate_empty_schedule_is_zero() {
        let schedule = ContributionSchedule {
            limit_base: dec!(1000),
            tiers: vec![],
        };

        let result = EmployerContribCalculator::new(&schedule)
            .calculate(dec!(5000))
            .unwrap();

        assert_eq!(result.total, dec!(0));
    }

    #[test]
    fn validate_rejects_negative_limit_base() {
        let mut schedule = test_schedule_2025();
        schedule.limit_base = dec!(-1);

        let result = EmployerContribCalculator::new(&schedule).calculate(dec!(100));

        assert_eq!(result, Err(EmployerContribError::NegativeLimitBase(dec!(-1))));
    }

    #[test]
    fn validate_rejects_rate_out_of_range() {
        let mut schedule = test_schedule_2025();
        schedule.tiers[1].above_cap_rate = dec!(1.5);

        let result = EmployerContribCalculator::new(&schedule).calculate(dec!(100));

        assert_eq!(
            result,
            Err(EmployerContribError::InvalidRate {
                tier: "medical".to_string(),
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn calculate_reports_total_too_large() {
        let schedule = ContributionSchedule {
            limit_base: dec!(0),
            tiers: vec![
                ContributionTier::flat("pension", dec!(1)),
                ContributionTier::flat("medical", dec!(1)),
            ],
        };

        let result = EmployerContribCalculator::new(&schedule).calculate(Decimal::MAX);

        assert_eq!(
            result,
            Err(EmployerContribError::AmountOutOfRange(AmountOutOfRange {
                field: "employer_contributions",
            }))
        );
    }
}
