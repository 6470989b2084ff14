use std::fs;
use std::io::Read;
use std::path::Path;

use burden_core::calculations::{
    EmployerContribCalculator, EmployerContribError, IncomeTaxCalculator, IncomeTaxError,
    IndirectTaxError, IndirectTaxEstimator, SelfEmploymentTaxCalculator, SelfEmploymentTaxError,
};
use burden_core::{RuleSet, TaxBracket};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Top rate at which the net-to-gross search interval may no longer contain
/// the answer.
const HIGH_TOP_RATE: Decimal = dec!(0.5);

/// Errors that can occur when loading rule data.
#[derive(Debug, Error)]
pub enum RuleSetLoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("No tax brackets for year {0}")]
    YearNotFound(i32),

    #[error("Invalid income tax schedule: {0}")]
    IncomeTax(#[from] IncomeTaxError),

    #[error("Invalid contribution schedule: {0}")]
    EmployerContrib(#[from] EmployerContribError),

    #[error("Invalid indirect tax rules: {0}")]
    IndirectTax(#[from] IndirectTaxError),

    #[error("Invalid self-employment rules: {0}")]
    SelfEmploymentTax(#[from] SelfEmploymentTaxError),
}

impl From<csv::Error> for RuleSetLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleSetLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RuleSetLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RuleSetLoaderError::TomlParse(err.to_string())
    }
}

/// A single record from an income tax brackets CSV file.
///
/// - `tax_year`: the tax year (e.g., 2025)
/// - `threshold`: income at which the bracket starts
/// - `rate`: the marginal rate as a decimal (e.g., 0.13 for 13%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Loader for rule sets from TOML and bracket schedules from CSV.
///
/// Everything it returns has passed the same checks the calculators apply,
/// so a loaded rule set cannot fail a calculation for structural reasons.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse and validate a rule set from TOML text.
    ///
    /// ```toml
    /// year = 2025
    ///
    /// [[income_tax]]
    /// threshold = "0"
    /// rate = "0.13"
    ///
    /// [employer_contributions]
    /// limit_base = "2759000"
    ///
    /// [[employer_contributions.tiers]]
    /// name = "pension"
    /// base_rate = "0.22"
    /// above_cap_rate = "0.10"
    ///
    /// [indirect]
    /// vat_share = "0.13"
    ///
    /// [indirect.excise_shares]
    /// fuel = "0.40"
    /// alcohol = "0.50"
    /// tobacco = "0.60"
    /// ```
    ///
    /// `[self_employment]` may be omitted, in which case the default rates
    /// apply.
    pub fn from_toml_str(s: &str) -> Result<RuleSet, RuleSetLoaderError> {
        let rules: RuleSet = toml::from_str(s)?;
        Self::validate(&rules)?;
        debug!(year = rules.year, brackets = rules.income_tax.len(), "rule set loaded");
        Ok(rules)
    }

    /// Read a TOML rule set from disk.
    pub fn from_path(path: &Path) -> Result<RuleSet, RuleSetLoaderError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice. Records are not validated here; see
    /// [`RuleSetLoader::brackets_for_year`].
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RuleSetLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Select the brackets of one year, sorted by threshold.
    pub fn brackets_for_year(
        records: &[BracketRecord],
        year: i32,
    ) -> Result<Vec<TaxBracket>, RuleSetLoaderError> {
        let brackets: Vec<TaxBracket> = records
            .iter()
            .filter(|r| r.tax_year == year)
            .map(|r| TaxBracket::new(r.threshold, r.rate))
            .collect();

        if brackets.is_empty() {
            return Err(RuleSetLoaderError::YearNotFound(year));
        }

        let sorted = IncomeTaxCalculator::new(&brackets).sorted_brackets()?;
        warn_on_high_top_rate(&sorted)?;
        Ok(sorted)
    }

    /// Run every calculator's checks against `rules`.
    pub fn validate(rules: &RuleSet) -> Result<(), RuleSetLoaderError> {
        warn_on_high_top_rate(&rules.income_tax)?;
        EmployerContribCalculator::new(&rules.employer_contributions).validate()?;
        IndirectTaxEstimator::new(&rules.indirect).validate()?;
        SelfEmploymentTaxCalculator::new(&rules.self_employment).validate()?;
        Ok(())
    }
}

fn warn_on_high_top_rate(brackets: &[TaxBracket]) -> Result<(), RuleSetLoaderError> {
    let top_rate = IncomeTaxCalculator::new(brackets).top_rate()?;
    if top_rate >= HIGH_TOP_RATE {
        warn!(
            %top_rate,
            "top income tax rate is 50% or more; net-to-gross conversion may fail"
        );
    }
    Ok(())
}
