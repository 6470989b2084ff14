//! Total tax burden for one profile.
//!
//! The aggregator resolves the gross salary, runs every calculator and
//! assembles a [`CalculationResult`]. It holds no state between calls: each
//! call takes a fully-formed profile and rule set and returns a fresh result.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross monthly salary (inverted from net when needed) |
//! | 2    | Annual income = gross × 12 + other income; income tax |
//! | 3    | Employer contributions on gross × 12 |
//! | 4    | Property taxes |
//! | 5    | VAT and excise |
//! | 6    | Self-employment levy |
//! | 7    | Totals, net income |
//! | 8    | Effective rate over the cost of work |
//! | 9    | Breakdown |
//!
//! Exposed money figures are whole currency units. The total is the sum of
//! the exposed category amounts, and `net_income + income_tax` equals
//! `annual_income` exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{
    AmountOutOfRange, checked_add, checked_mul, checked_sum, round_subunit, round_to_unit,
};
use crate::calculations::employer_contrib::{
    ContributionBreakdown, EmployerContribCalculator, EmployerContribError,
};
use crate::calculations::gross_from_net::{GrossFromNetError, GrossFromNetSolver};
use crate::calculations::income_tax::{BracketSlice, IncomeTaxCalculator, IncomeTaxError};
use crate::calculations::indirect::{IndirectTaxError, IndirectTaxEstimator};
use crate::calculations::property::total_property_taxes;
use crate::calculations::self_employment::{SelfEmploymentTaxCalculator, SelfEmploymentTaxError};
use crate::{Profile, RuleSet, SalaryType};

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("income tax: {0}")]
    IncomeTax(#[from] IncomeTaxError),

    #[error("net-to-gross conversion: {0}")]
    GrossFromNet(#[from] GrossFromNetError),

    #[error("employer contributions: {0}")]
    EmployerContrib(#[from] EmployerContribError),

    #[error("indirect taxes: {0}")]
    IndirectTax(#[from] IndirectTaxError),

    #[error("self-employment levy: {0}")]
    SelfEmploymentTax(#[from] SelfEmploymentTaxError),

    #[error(transparent)]
    AmountOutOfRange(#[from] AmountOutOfRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCategory {
    IncomeTax,
    EmployerContributions,
    PropertyTaxes,
    Vat,
    Excise,
    SelfEmployment,
}

impl TaxCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IncomeTax => "Income tax",
            Self::EmployerContributions => "Employer contributions",
            Self::PropertyTaxes => "Property taxes",
            Self::Vat => "VAT",
            Self::Excise => "Excise",
            Self::SelfEmployment => "Self-employment levy",
        }
    }
}

/// One line of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub category: TaxCategory,
    /// Whole currency units.
    pub amount: Decimal,
    pub description: String,
    /// Per-bracket slices, income tax only.
    pub bracket_details: Option<Vec<BracketSlice>>,
    /// Per-tier amounts, employer contributions only.
    pub tier_details: Option<ContributionBreakdown>,
}

impl BreakdownItem {
    fn new(
        category: TaxCategory,
        amount: Decimal,
        description: String,
    ) -> Self {
        Self {
            category,
            amount,
            description,
            bracket_details: None,
            tier_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Annual income left after income tax.
    pub net_income: Decimal,
    /// Every tax and contribution counted under the calculation mode.
    pub total_taxes: Decimal,
    /// `total_taxes` as a percentage of `work_cost`, two decimal places.
    pub effective_rate: Decimal,
    pub breakdown: Vec<BreakdownItem>,

    /// Monthly gross salary the calculation used, at subunit precision.
    pub gross_monthly_salary: Decimal,
    /// Annual salary plus other income.
    pub annual_income: Decimal,
    /// Net income, income tax and, with employer cost, the contributions.
    pub work_cost: Decimal,

    pub income_tax: Decimal,
    /// `None` when the calculation mode excludes employer cost.
    pub employer_contributions: Option<Decimal>,
    pub property_taxes: Decimal,
    pub vat: Decimal,
    pub excise: Decimal,
    pub self_employment_tax: Decimal,
}

impl CalculationResult {
    /// What the state receives in total.
    pub fn state_take(&self) -> Decimal {
        self.total_taxes
    }

    /// The `n` largest categories, largest first. Equal amounts keep their
    /// breakdown order.
    pub fn top_categories(
        &self,
        n: usize,
    ) -> Vec<TaxCategory> {
        let mut items: Vec<&BreakdownItem> = self.breakdown.iter().collect();
        items.sort_by(|a, b| b.amount.cmp(&a.amount));
        items.into_iter().take(n).map(|item| item.category).collect()
    }

    /// Breakdown line for a category, if it is present.
    pub fn item(
        &self,
        category: TaxCategory,
    ) -> Option<&BreakdownItem> {
        self.breakdown.iter().find(|item| item.category == category)
    }
}

/// Computes the full burden of a profile under one rule set.
#[derive(Debug, Clone)]
pub struct TaxBurdenCalculator<'a> {
    rules: &'a RuleSet,
}

impl<'a> TaxBurdenCalculator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Runs the whole pipeline.
    ///
    /// Negative amounts in the profile are clamped to zero first.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if the rule set is malformed, the net
    /// salary cannot be converted to gross, or an amount is too large to
    /// carry through the calculation.
    pub fn calculate(
        &self,
        profile: &Profile,
    ) -> Result<CalculationResult, CalculationError> {
        let profile = profile.normalized();
        let rules = self.rules;
        let includes_employer = profile.calculation_mode.includes_employer();

        // Step 1
        let gross_monthly_salary = self.gross_monthly_salary(&profile)?;

        // Step 2
        let annual_salary = round_subunit(checked_mul("salary", gross_monthly_salary, MONTHS)?);
        let annual_income_exact =
            round_subunit(checked_add("other_income", annual_salary, profile.other_income)?);
        let income_tax = IncomeTaxCalculator::new(&rules.income_tax).calculate(annual_income_exact)?;

        // Step 3
        let contributions = EmployerContribCalculator::new(&rules.employer_contributions)
            .calculate(annual_salary)?;

        // Step 4
        let property_taxes = total_property_taxes(&profile.property_taxes)?;

        // Step 5
        let indirect = IndirectTaxEstimator::new(&rules.indirect).estimate(&profile)?;

        // Step 6
        let self_employment = SelfEmploymentTaxCalculator::new(&rules.self_employment)
            .calculate(profile.self_employment.as_ref())?;

        debug!(
            year = rules.year,
            gross_monthly_salary = %gross_monthly_salary,
            annual_income = %annual_income_exact,
            income_tax = %income_tax.total,
            employer_contributions = %contributions.total,
            "burden components calculated"
        );

        // Step 7
        let annual_income = round_to_unit(annual_income_exact);
        let income_tax_amount = round_to_unit(income_tax.total);
        let net_income = annual_income - income_tax_amount;
        let employer_amount = round_to_unit(contributions.total);
        let vat = round_to_unit(indirect.vat);
        let excise = round_to_unit(indirect.excise);
        let self_employment_tax = round_to_unit(self_employment.total);

        let employer_share = if includes_employer {
            employer_amount
        } else {
            Decimal::ZERO
        };
        let total_taxes = checked_sum(
            "total_taxes",
            [income_tax_amount, employer_share, property_taxes, vat, excise, self_employment_tax],
        )?;

        // Step 8
        let work_cost = checked_sum("work_cost", [net_income, income_tax_amount, employer_share])?;
        let effective_rate = effective_rate(total_taxes, work_cost)?;

        // Step 9
        let mut breakdown = vec![BreakdownItem {
            bracket_details: Some(income_tax.breakdown),
            ..BreakdownItem::new(
                TaxCategory::IncomeTax,
                income_tax_amount,
                "Personal income tax on salary and other income".to_string(),
            )
        }];
        if includes_employer {
            breakdown.push(BreakdownItem {
                tier_details: Some(contributions),
                ..BreakdownItem::new(
                    TaxCategory::EmployerContributions,
                    employer_amount,
                    self.employer_description(),
                )
            });
        }
        breakdown.push(BreakdownItem::new(
            TaxCategory::PropertyTaxes,
            property_taxes,
            "Property, transport and land taxes".to_string(),
        ));
        breakdown.push(BreakdownItem::new(
            TaxCategory::Vat,
            vat,
            format!(
                "Estimated VAT embedded in spending ({:.1}%)",
                rules.indirect.vat_share * Decimal::ONE_HUNDRED
            ),
        ));
        breakdown.push(BreakdownItem::new(
            TaxCategory::Excise,
            excise,
            "Excise on fuel, alcohol and tobacco".to_string(),
        ));
        if profile.self_employment.is_some() {
            breakdown.push(BreakdownItem::new(
                TaxCategory::SelfEmployment,
                self_employment_tax,
                format!(
                    "Self-employment levy ({:.0}% from individuals, {:.0}% from entities)",
                    rules.self_employment.individual_rate * Decimal::ONE_HUNDRED,
                    rules.self_employment.entity_rate * Decimal::ONE_HUNDRED
                ),
            ));
        }

        Ok(CalculationResult {
            net_income,
            total_taxes,
            effective_rate,
            breakdown,
            gross_monthly_salary: round_subunit(gross_monthly_salary),
            annual_income,
            work_cost,
            income_tax: income_tax_amount,
            employer_contributions: includes_employer.then_some(employer_amount),
            property_taxes,
            vat,
            excise,
            self_employment_tax,
        })
    }

    /// Step 1: the salary as declared, or recovered from net.
    fn gross_monthly_salary(
        &self,
        profile: &Profile,
    ) -> Result<Decimal, CalculationError> {
        match profile.salary_type {
            SalaryType::Gross => Ok(profile.salary),
            SalaryType::Net => Ok(GrossFromNetSolver::new(&self.rules.income_tax)
                .solve(profile.salary, profile.other_income)?),
        }
    }

    fn employer_description(&self) -> String {
        let schedule = &self.rules.employer_contributions;
        format!(
            "Social contributions paid by the employer ({:.1}% up to {}, {:.1}% above)",
            schedule.total_base_rate() * Decimal::ONE_HUNDRED,
            round_to_unit(schedule.limit_base),
            schedule.total_above_cap_rate() * Decimal::ONE_HUNDRED
        )
    }
}

/// Percentage of `work_cost` taken by `total_taxes`; zero for zero cost.
fn effective_rate(
    total_taxes: Decimal,
    work_cost: Decimal,
) -> Result<Decimal, AmountOutOfRange> {
    if work_cost <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let share = total_taxes
        .checked_div(work_cost)
        .ok_or(AmountOutOfRange {
            field: "effective_rate",
        })?;
    Ok(round_subunit(checked_mul("effective_rate", share, Decimal::ONE_HUNDRED)?))
}

/// Convenience entry point for [`TaxBurdenCalculator::calculate`].
pub fn calculate(
    profile: &Profile,
    rules: &RuleSet,
) -> Result<CalculationResult, CalculationError> {
    TaxBurdenCalculator::new(rules).calculate(profile)
}
