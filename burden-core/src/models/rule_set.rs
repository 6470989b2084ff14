use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContributionSchedule, TaxBracket};

/// Share of the price embedded as excise, per consumption category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExciseShares {
    pub fuel: Decimal,
    pub alcohol: Decimal,
    pub tobacco: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectTaxRules {
    /// Assumed fraction of all spending that is VAT.
    pub vat_share: Decimal,
    pub excise_shares: ExciseShares,
}

/// Fixed rates of the simplified self-employment levy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentRules {
    /// Rate on income received from private individuals.
    pub individual_rate: Decimal,
    /// Rate on income received from companies and entrepreneurs.
    pub entity_rate: Decimal,
}

impl Default for SelfEmploymentRules {
    fn default() -> Self {
        Self {
            individual_rate: Decimal::new(4, 2),
            entity_rate: Decimal::new(6, 2),
        }
    }
}

/// Everything a calculation needs to know about one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub year: i32,
    pub income_tax: Vec<TaxBracket>,
    pub employer_contributions: ContributionSchedule,
    pub indirect: IndirectTaxRules,
    #[serde(default)]
    pub self_employment: SelfEmploymentRules,
}
