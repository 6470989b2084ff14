mod contribution_schedule;
mod profile;
mod rule_set;
mod tax_bracket;

pub use contribution_schedule::{ContributionSchedule, ContributionTier};
pub use profile::{
    CalculationMode, Consumption, Profile, PropertyTaxItem, PropertyTaxKind, SalaryType,
    SelfEmploymentIncome, Spending, SpendingItem,
};
pub use rule_set::{ExciseShares, IndirectTaxRules, RuleSet, SelfEmploymentRules};
pub use tax_bracket::TaxBracket;
