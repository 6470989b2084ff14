use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use burden_core::{
    CalculationMode, CalculationResult, Profile, RuleSet, SalaryType, SweepPoint, calculate,
    salary_sweep,
};
use burden_data::{ProfilePreset, RuleSetLoader, logging, rules};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;

/// Estimate the full tax burden behind a salary.
///
/// Start from a preset or an empty profile and override any field on the
/// command line. Rules default to the built-in set for `--year`.
#[derive(Parser, Debug)]
#[command(name = "burden")]
#[command(version, about, long_about = None)]
struct Args {
    /// Starting profile: poor, average or rich
    #[arg(short, long, value_parser = parse_preset)]
    preset: Option<ProfilePreset>,

    /// TOML file with a complete rule set
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// CSV file (tax_year,threshold,rate) replacing the income tax brackets
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Tax year of the built-in rules and of the bracket file
    #[arg(short, long)]
    year: Option<i32>,

    /// Monthly salary
    #[arg(short, long)]
    salary: Option<Decimal>,

    /// Whether the salary is gross or net
    #[arg(long, value_parser = parse_salary_type)]
    salary_type: Option<SalaryType>,

    /// Other annual income
    #[arg(long)]
    other_income: Option<Decimal>,

    /// Monthly spending
    #[arg(long)]
    spending: Option<Decimal>,

    /// personal, or with_employer to count the employer's contributions
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<CalculationMode>,

    /// Also print the burden for salaries from zero to double, in this many steps per side
    #[arg(long)]
    sweep: Option<u32>,

    /// Log level or filter directive (RUST_LOG overrides)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_preset(s: &str) -> Result<ProfilePreset, String> {
    ProfilePreset::parse(s).ok_or_else(|| format!("unknown preset '{s}'"))
}

fn parse_salary_type(s: &str) -> Result<SalaryType, String> {
    SalaryType::parse(s).ok_or_else(|| format!("unknown salary type '{s}'"))
}

fn parse_mode(s: &str) -> Result<CalculationMode, String> {
    CalculationMode::parse(s).ok_or_else(|| format!("unknown calculation mode '{s}'"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(&args.log_level)?;

    let rules = load_rules(&args)?;
    let profile = build_profile(&args);

    info!(year = rules.year, preset = ?args.preset, "calculating burden");

    let result = calculate(&profile, &rules).context("Failed to calculate tax burden")?;
    print_result(&rules, &result);

    if let Some(steps) = args.sweep {
        let points =
            salary_sweep(&profile, &rules, steps).context("Failed to calculate salary sweep")?;
        print_sweep(&points);
    }

    Ok(())
}

fn load_rules(args: &Args) -> Result<RuleSet> {
    let mut rule_set = match &args.rules {
        Some(path) => RuleSetLoader::from_path(path)
            .with_context(|| format!("Failed to load rules: {}", path.display()))?,
        None => {
            let year = args.year.unwrap_or_else(|| rules::latest().year);
            rules::for_year(year)
                .with_context(|| format!("No built-in rules for {year}; pass --rules"))?
        }
    };

    if let Some(path) = &args.brackets {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = RuleSetLoader::parse_brackets(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let year = args.year.unwrap_or(rule_set.year);
        rule_set.income_tax = RuleSetLoader::brackets_for_year(&records, year)
            .with_context(|| format!("Failed to read brackets for {year}"))?;
    }

    Ok(rule_set)
}

fn build_profile(args: &Args) -> Profile {
    let mut profile = args
        .preset
        .map(|preset| preset.profile())
        .unwrap_or_default();

    if let Some(salary) = args.salary {
        profile.salary = salary;
    }
    if let Some(salary_type) = args.salary_type {
        profile.salary_type = salary_type;
    }
    if let Some(other_income) = args.other_income {
        profile.other_income = other_income;
    }
    if let Some(spending) = args.spending {
        profile.monthly_spending = spending;
    }
    if let Some(mode) = args.mode {
        profile.calculation_mode = mode;
    }

    profile
}

fn print_result(
    rules: &RuleSet,
    result: &CalculationResult,
) {
    println!("Tax year:            {}", rules.year);
    println!("Gross monthly:       {}", result.gross_monthly_salary);
    println!("Annual income:       {}", result.annual_income);
    println!("Net income:          {}", result.net_income);
    println!("Cost of work:        {}", result.work_cost);
    println!("Total taxes:         {}", result.total_taxes);
    println!("Effective rate:      {}%", result.effective_rate);
    println!();

    for item in &result.breakdown {
        println!("{:<24} {:>14}  {}", item.category.label(), item.amount, item.description);

        if let Some(slices) = &item.bracket_details {
            for slice in slices {
                println!(
                    "    bracket {} at {}%: {} on {}",
                    slice.bracket,
                    (slice.rate * Decimal::ONE_HUNDRED).normalize(),
                    slice.tax,
                    slice.income
                );
            }
        }
        if let Some(tiers) = &item.tier_details {
            for tier in &tiers.tiers {
                println!("    {}: {}", tier.name, tier.amount);
            }
        }
    }
}

fn print_sweep(points: &[SweepPoint]) {
    println!();
    println!(
        "{:>14} {:>14} {:>14} {:>14} {:>14}",
        "salary", "income tax", "employer", "total taxes", "net income"
    );
    for point in points {
        let employer = point
            .employer_contributions
            .map(|amount| amount.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>14} {:>14} {:>14} {:>14} {:>14}",
            point.salary, point.income_tax, employer, point.total_taxes, point.net_income
        );
    }
}
