//! Burden calculators.
//!
//! Each calculator borrows the part of a [`RuleSet`](crate::RuleSet) it
//! needs and is usable on its own. [`TaxBurdenCalculator`] runs them all for
//! one profile.

pub mod common;
pub mod employer_contrib;
pub mod gross_from_net;
pub mod income_tax;
pub mod indirect;
pub mod property;
pub mod self_employment;
pub mod sweep;
pub mod totals;

pub use common::AmountOutOfRange;
pub use employer_contrib::{
    ContributionBreakdown, EmployerContribCalculator, EmployerContribError, TierContribution,
};
pub use gross_from_net::{GrossFromNetError, GrossFromNetSolver};
pub use income_tax::{BracketSlice, IncomeTaxCalculator, IncomeTaxError, IncomeTaxResult};
pub use indirect::{ExciseBreakdown, IndirectTaxError, IndirectTaxEstimator, IndirectTaxResult};
pub use property::total_property_taxes;
pub use self_employment::{
    SelfEmploymentTaxCalculator, SelfEmploymentTaxError, SelfEmploymentTaxResult,
};
pub use sweep::{SweepPoint, salary_sweep};
pub use totals::{
    BreakdownItem, CalculationError, CalculationResult, TaxBurdenCalculator, TaxCategory, calculate,
};
