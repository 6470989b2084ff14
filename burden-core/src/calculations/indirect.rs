//! Estimated indirect taxes paid through prices.
//!
//! VAT is a fixed share of all spending. Excises are estimated per
//! consumption category from that category's monthly spending and its
//! excise share, then annualized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{AmountOutOfRange, checked_mul, is_fraction, round_subunit};
use crate::{Consumption, IndirectTaxRules, Profile};

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndirectTaxError {
    #[error("{category} share must be between 0 and 1, got {share}")]
    InvalidShare {
        category: &'static str,
        share: Decimal,
    },

    #[error(transparent)]
    AmountOutOfRange(#[from] AmountOutOfRange),
}

/// Annual excise per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExciseBreakdown {
    pub fuel: Decimal,
    pub alcohol: Decimal,
    pub tobacco: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectTaxResult {
    pub vat: Decimal,
    pub excise: Decimal,
    pub excise_by_category: ExciseBreakdown,
}

#[derive(Debug, Clone)]
pub struct IndirectTaxEstimator<'a> {
    rules: &'a IndirectTaxRules,
}

impl<'a> IndirectTaxEstimator<'a> {
    pub fn new(rules: &'a IndirectTaxRules) -> Self {
        Self { rules }
    }

    pub fn validate(&self) -> Result<(), IndirectTaxError> {
        let shares = [
            ("vat", self.rules.vat_share),
            ("fuel excise", self.rules.excise_shares.fuel),
            ("alcohol excise", self.rules.excise_shares.alcohol),
            ("tobacco excise", self.rules.excise_shares.tobacco),
        ];
        for (category, share) in shares {
            if !is_fraction(share) {
                return Err(IndirectTaxError::InvalidShare { category, share });
            }
        }
        Ok(())
    }

    /// Estimates annual VAT and excise for a profile.
    ///
    /// # Errors
    ///
    /// Returns [`IndirectTaxError`] if any share is outside `[0, 1]` or a
    /// spending amount is too large to annualize.
    pub fn estimate(
        &self,
        profile: &Profile,
    ) -> Result<IndirectTaxResult, IndirectTaxError> {
        self.validate()?;

        let vat = self.vat(profile.monthly_spending)?;
        let excise_by_category = match &profile.consumption {
            Some(consumption) => self.excise(consumption)?,
            None => ExciseBreakdown::default(),
        };
        let excise =
            excise_by_category.fuel + excise_by_category.alcohol + excise_by_category.tobacco;

        Ok(IndirectTaxResult {
            vat,
            excise,
            excise_by_category,
        })
    }

    /// Annual VAT embedded in `monthly_spending`.
    pub fn vat(
        &self,
        monthly_spending: Decimal,
    ) -> Result<Decimal, AmountOutOfRange> {
        let annual_spending =
            round_subunit(checked_mul("monthly_spending", monthly_spending, MONTHS)?);
        Ok(round_subunit(annual_spending * self.rules.vat_share))
    }

    /// Annual excise for each consumption category.
    pub fn excise(
        &self,
        consumption: &Consumption,
    ) -> Result<ExciseBreakdown, AmountOutOfRange> {
        let shares = &self.rules.excise_shares;

        Ok(ExciseBreakdown {
            fuel: self.annual_excise(consumption.fuel.monthly_amount()?, shares.fuel)?,
            alcohol: self.annual_excise(consumption.alcohol.monthly_amount()?, shares.alcohol)?,
            tobacco: self.annual_excise(consumption.tobacco.monthly_amount()?, shares.tobacco)?,
        })
    }

    fn annual_excise(
        &self,
        monthly_amount: Decimal,
        share: Decimal,
    ) -> Result<Decimal, AmountOutOfRange> {
        let monthly_excise = round_subunit(round_subunit(monthly_amount) * share);
        checked_mul("consumption", monthly_excise, MONTHS)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ExciseShares, Spending, SpendingItem};

    fn test_rules() -> IndirectTaxRules {
        IndirectTaxRules {
            vat_share: dec!(0.13),
            excise_shares: ExciseShares {
                fuel: dec!(0.40),
                alcohol: dec!(0.50),
                tobacco: dec!(0.60),
            },
        }
    }

    fn profile_with(consumption: Option<Consumption>) -> Profile {
        Profile {
            monthly_spending: dec!(50000),
            consumption,
            ..Profile::default()
        }
    }

    #[test]
    fn vat_is_share_of_annual_spending() {
        let rules = test_rules();

        // 50,000 × 12 × 0.13
        assert_eq!(IndirectTaxEstimator::new(&rules).vat(dec!(50000)), Ok(dec!(78000)));
    }

    #[test]
    fn vat_rounds_to_subunit() {
        let rules = test_rules();

        // 1,234.567 × 12 = 14,814.80 (rounded); × 0.13 = 1,925.924
        assert_eq!(
            IndirectTaxEstimator::new(&rules).vat(dec!(1234.567)),
            Ok(dec!(1925.92))
        );
    }

    #[test]
    fn estimate_without_consumption_has_no_excise() {
        let rules = test_rules();

        let result = IndirectTaxEstimator::new(&rules)
            .estimate(&profile_with(None))
            .unwrap();

        assert_eq!(result.vat, dec!(78000));
        assert_eq!(result.excise, dec!(0));
        assert_eq!(result.excise_by_category, ExciseBreakdown::default());
    }

    #[test]
    fn estimate_with_monthly_amounts() {
        let rules = test_rules();
        let consumption = Consumption {
            fuel: Spending::Monthly(dec!(5000)),
            alcohol: Spending::Monthly(dec!(2000)),
            tobacco: Spending::None,
        };

        let result = IndirectTaxEstimator::new(&rules)
            .estimate(&profile_with(Some(consumption)))
            .unwrap();

        // (5,000 × 0.40 + 2,000 × 0.50) × 12
        assert_eq!(result.excise_by_category.fuel, dec!(24000));
        assert_eq!(result.excise_by_category.alcohol, dec!(12000));
        assert_eq!(result.excise_by_category.tobacco, dec!(0));
        assert_eq!(result.excise, dec!(36000));
    }

    #[test]
    fn estimate_with_itemized_amounts() {
        let rules = test_rules();
        let consumption = Consumption {
            fuel: Spending::Itemized(vec![
                SpendingItem::new("petrol", dec!(1), dec!(4000)),
                SpendingItem::new("diesel", dec!(1), dec!(1000)),
            ]),
            alcohol: Spending::Itemized(vec![
                SpendingItem::new("beer 0.5l", dec!(8), dec!(100)),
                SpendingItem::new("wine 0.7l", dec!(1), dec!(500)),
                SpendingItem::new("vodka 0.5l", dec!(1), dec!(400)),
            ]),
            tobacco: Spending::Itemized(vec![SpendingItem::new(
                "cigarettes",
                dec!(10),
                dec!(250),
            )]),
        };

        let result = IndirectTaxEstimator::new(&rules)
            .estimate(&profile_with(Some(consumption)))
            .unwrap();

        // fuel 5,000 × 0.40; alcohol 1,700 × 0.50; tobacco 2,500 × 0.60
        assert_eq!(result.excise_by_category.fuel, dec!(24000));
        assert_eq!(result.excise_by_category.alcohol, dec!(10200));
        assert_eq!(result.excise_by_category.tobacco, dec!(18000));
        assert_eq!(result.excise, dec!(52200));
    }

    #[test]
    fn estimate_rejects_share_above_one() {
        let mut rules = test_rules();
        rules.excise_shares.tobacco = dec!(1.2);

        let result = IndirectTaxEstimator::new(&rules).estimate(&profile_with(None));

        assert_eq!(
            result,
            Err(IndirectTaxError::InvalidShare {
                category: "tobacco excise",
                share: dec!(1.2),
            })
        );
    }

    #[test]
    fn estimate_reports_spending_too_large_to_annualize() {
        let rules = test_rules();
        let profile = Profile {
            monthly_spending: Decimal::MAX / dec!(2),
            ..Profile::default()
        };

        let result = IndirectTaxEstimator::new(&rules).estimate(&profile);

        assert_eq!(
            result,
            Err(IndirectTaxError::AmountOutOfRange(AmountOutOfRange {
                field: "monthly_spending",
            }))
        );
    }

    #[test]
    fn estimate_reports_itemized_overflow() {
        let rules = test_rules();
        let consumption = Consumption {
            tobacco: Spending::Itemized(vec![SpendingItem::new(
                "cigarettes",
                Decimal::MAX,
                dec!(2),
            )]),
            ..Consumption::default()
        };

        let result = IndirectTaxEstimator::new(&rules).estimate(&profile_with(Some(consumption)));

        assert!(matches!(result, Err(IndirectTaxError::AmountOutOfRange(_))));
    }
}
