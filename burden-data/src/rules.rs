//! Built-in rule sets.

use burden_core::{
    ContributionSchedule, ContributionTier, ExciseShares, IndirectTaxRules, RuleSet,
    SelfEmploymentRules, TaxBracket,
};
use rust_decimal_macros::dec;

/// Years with a built-in rule set, oldest first.
pub const BUILT_IN_YEARS: &[i32] = &[2025];

/// Returns the built-in rule set for `year`, if there is one.
pub fn for_year(year: i32) -> Option<RuleSet> {
    match year {
        2025 => Some(rules_2025()),
        _ => None,
    }
}

/// Latest built-in rule set.
pub fn latest() -> RuleSet {
    rules_2025()
}

/// Rules in force for 2025.
///
/// Five-step progressive income tax, a single contribution cap shared by all
/// employer tiers, and the usual incidence assumptions for indirect taxes.
pub fn rules_2025() -> RuleSet {
    RuleSet {
        year: 2025,
        income_tax: vec![
            TaxBracket::new(dec!(0), dec!(0.13)),
            TaxBracket::new(dec!(2400000), dec!(0.15)),
            TaxBracket::new(dec!(5000000), dec!(0.18)),
            TaxBracket::new(dec!(20000000), dec!(0.20)),
            TaxBracket::new(dec!(50000000), dec!(0.22)),
        ],
        employer_contributions: ContributionSchedule {
            limit_base: dec!(2759000),
            tiers: vec![
                ContributionTier::new("pension", dec!(0.22), dec!(0.10)),
                ContributionTier::flat("medical", dec!(0.051)),
                ContributionTier::flat("social", dec!(0.029)),
                ContributionTier::flat("injury", dec!(0.002)),
            ],
        },
        indirect: IndirectTaxRules {
            vat_share: dec!(0.13),
            excise_shares: ExciseShares {
                fuel: dec!(0.40),
                alcohol: dec!(0.50),
                tobacco: dec!(0.60),
            },
        },
        self_employment: SelfEmploymentRules {
            individual_rate: dec!(0.04),
            entity_rate: dec!(0.06),
        },
    }
}
