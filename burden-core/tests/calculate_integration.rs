//! End-to-end burden calculations against a complete rule set.

use burden_core::calculations::{GrossFromNetSolver, IncomeTaxCalculator};
use burden_core::{
    CalculationMode, Consumption, ContributionSchedule, ContributionTier, ExciseShares,
    IndirectTaxRules, Profile, PropertyTaxItem, PropertyTaxKind, RuleSet, SalaryType,
    SelfEmploymentIncome, SelfEmploymentRules, Spending, SpendingItem, TaxBracket, TaxCategory,
    calculate, salary_sweep,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rules_2025() -> RuleSet {
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
        self_employment: SelfEmploymentRules::default(),
    }
}

/// A high earner with every input category filled in.
fn rich_profile() -> Profile {
    Profile {
        salary: dec!(300000),
        salary_type: SalaryType::Net,
        other_income: dec!(0),
        monthly_spending: dec!(150000),
        consumption: Some(Consumption {
            fuel: Spending::Itemized(vec![SpendingItem::new("petrol", dec!(1), dec!(15000))]),
            alcohol: Spending::Itemized(vec![
                SpendingItem::new("beer 0.5l", dec!(12), dec!(100)),
                SpendingItem::new("wine 0.7l", dec!(3), dec!(500)),
                SpendingItem::new("vodka 0.5l", dec!(2), dec!(400)),
            ]),
            tobacco: Spending::None,
        }),
        property_taxes: vec![
            PropertyTaxItem::Assessed {
                kind: PropertyTaxKind::Property,
                cadastral_value: dec!(15000000),
                rate_percent: dec!(0.1),
            },
            PropertyTaxItem::Declared {
                kind: PropertyTaxKind::Property,
                annual_amount: dec!(10000),
            },
            PropertyTaxItem::Declared {
                kind: PropertyTaxKind::Transport,
                annual_amount: dec!(8000),
            },
            PropertyTaxItem::Declared {
                kind: PropertyTaxKind::Land,
                annual_amount: dec!(5000),
            },
        ],
        self_employment: None,
        calculation_mode: CalculationMode::WithEmployer,
    }
}

// =============================================================================
// Full pipeline
// =============================================================================

#[test]
fn rich_profile_totals_are_consistent() {
    let rules = rules_2025();

    let result = calculate(&rich_profile(), &rules).unwrap();

    assert_eq!(result.net_income + result.income_tax, result.annual_income);
    assert_eq!(result.property_taxes, dec!(38000));
    // 150,000 × 12 × 0.13
    assert_eq!(result.vat, dec!(234000));
    // fuel 15,000 × 0.4; alcohol 3,500 × 0.5
    assert_eq!(result.excise, dec!(93000));

    let sum: Decimal = result.breakdown.iter().map(|i| i.amount).sum();
    assert_eq!(sum, result.total_taxes);
    assert_eq!(
        result.work_cost,
        result.net_income + result.income_tax + result.employer_contributions.unwrap()
    );
}

#[test]
fn rich_profile_net_salary_is_recovered() {
    let rules = rules_2025();

    let result = calculate(&rich_profile(), &rules).unwrap();

    // 3,600,000 net a year puts the gross in the second bracket.
    let net_annual = result.net_income;
    assert!((net_annual - dec!(3600000)).abs() <= dec!(1), "net = {net_annual}");
    assert!(result.annual_income > dec!(2400000));
}

#[test]
fn personal_mode_is_cheaper_than_with_employer() {
    let rules = rules_2025();
    let with_employer = calculate(&rich_profile(), &rules).unwrap();
    let personal = calculate(
        &Profile {
            calculation_mode: CalculationMode::Personal,
            ..rich_profile()
        },
        &rules,
    )
    .unwrap();

    assert_eq!(
        with_employer.total_taxes - personal.total_taxes,
        with_employer.employer_contributions.unwrap()
    );
    assert_eq!(personal.net_income, with_employer.net_income);
}

#[test]
fn self_employment_is_reported_last() {
    let rules = rules_2025();
    let profile = Profile {
        self_employment: Some(SelfEmploymentIncome {
            from_individuals: dec!(500000),
            from_entities: dec!(0),
        }),
        ..rich_profile()
    };

    let result = calculate(&profile, &rules).unwrap();

    let last = result.breakdown.last().unwrap();
    assert_eq!(last.category, TaxCategory::SelfEmployment);
    assert_eq!(last.amount, dec!(20000));
}

#[test]
fn zero_profile_has_zero_burden() {
    let rules = rules_2025();

    let result = calculate(&Profile::default(), &rules).unwrap();

    assert_eq!(result.total_taxes, dec!(0));
    assert_eq!(result.effective_rate, dec!(0));
    assert_eq!(result.net_income, dec!(0));
}

// =============================================================================
// Calculators used directly
// =============================================================================

#[test]
fn income_tax_top_bracket_scenario() {
    let rules = rules_2025();

    let result = IncomeTaxCalculator::new(&rules.income_tax)
        .calculate(dec!(60000000))
        .unwrap();

    assert_eq!(result.total, dec!(11602000));
    assert_eq!(result.breakdown.len(), 5);
}

#[test]
fn inverter_agrees_with_bracket_calculator() {
    let rules = rules_2025();
    let solver = GrossFromNetSolver::new(&rules.income_tax);
    let calculator = IncomeTaxCalculator::new(&rules.income_tax);

    for net in [dec!(30000), dec!(250000), dec!(2000000)] {
        let gross = solver.solve(net, dec!(0)).unwrap();
        let income = gross * dec!(12);
        let tax = calculator.calculate(income).unwrap().total;

        assert!(
            (tax - (income - net * dec!(12))).abs() <= dec!(0.01),
            "net {net}: gross {gross}, tax {tax}"
        );
    }
}

#[test]
fn sweep_reaches_double_salary() {
    let rules = rules_2025();
    let profile = Profile {
        salary: dec!(100000),
        ..Profile::default()
    };

    let points = salary_sweep(&profile, &rules, 5).unwrap();

    assert_eq!(points.len(), 11);
    assert_eq!(points.first().map(|p| p.salary), Some(dec!(0)));
    assert_eq!(points.last().map(|p| p.salary), Some(dec!(200000)));
}
