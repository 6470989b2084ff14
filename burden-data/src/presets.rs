//! Ready-made profiles for quick comparisons.
//!
//! Every preset states its salary as take-home pay and counts the employer's
//! contributions.

use burden_core::{
    CalculationMode, Consumption, Profile, PropertyTaxItem, PropertyTaxKind, SalaryType,
    Spending, SpendingItem,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default price of a 0.5 l bottle of beer.
pub const BEER_05_PRICE: Decimal = dec!(100);
/// Default price of a 0.7 l bottle of wine.
pub const WINE_07_PRICE: Decimal = dec!(500);
/// Default price of a 0.5 l bottle of vodka.
pub const VODKA_05_PRICE: Decimal = dec!(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfilePreset {
    Poor,
    Average,
    Rich,
}

impl ProfilePreset {
    pub const ALL: [ProfilePreset; 3] = [Self::Poor, Self::Average, Self::Rich];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Average => "average",
            Self::Rich => "rich",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poor" => Some(Self::Poor),
            "average" => Some(Self::Average),
            "rich" => Some(Self::Rich),
            _ => None,
        }
    }

    pub fn profile(&self) -> Profile {
        match self {
            Self::Poor => Profile {
                salary: dec!(50000),
                monthly_spending: dec!(30000),
                property_taxes: vec![declared(PropertyTaxKind::Property, dec!(1000))],
                ..base_profile()
            },
            Self::Average => Profile {
                salary: dec!(100000),
                monthly_spending: dec!(50000),
                consumption: Some(Consumption {
                    fuel: Spending::Monthly(dec!(5000)),
                    alcohol: alcohol(dec!(8), dec!(1), dec!(1)),
                    tobacco: Spending::None,
                }),
                property_taxes: vec![
                    declared(PropertyTaxKind::Property, dec!(3000)),
                    declared(PropertyTaxKind::Transport, dec!(2000)),
                ],
                ..base_profile()
            },
            Self::Rich => Profile {
                salary: dec!(300000),
                monthly_spending: dec!(150000),
                consumption: Some(Consumption {
                    fuel: Spending::Monthly(dec!(15000)),
                    alcohol: alcohol(dec!(12), dec!(3), dec!(2)),
                    tobacco: Spending::None,
                }),
                property_taxes: vec![
                    PropertyTaxItem::Assessed {
                        kind: PropertyTaxKind::Property,
                        cadastral_value: dec!(15000000),
                        rate_percent: dec!(0.1),
                    },
                    declared(PropertyTaxKind::Property, dec!(10000)),
                    declared(PropertyTaxKind::Transport, dec!(8000)),
                    declared(PropertyTaxKind::Land, dec!(5000)),
                ],
                ..base_profile()
            },
        }
    }
}

fn base_profile() -> Profile {
    Profile {
        salary_type: SalaryType::Net,
        calculation_mode: CalculationMode::WithEmployer,
        ..Profile::default()
    }
}

fn declared(
    kind: PropertyTaxKind,
    annual_amount: Decimal,
) -> PropertyTaxItem {
    PropertyTaxItem::Declared {
        kind,
        annual_amount,
    }
}

/// Bottles per month at the default prices.
fn alcohol(
    beer: Decimal,
    wine: Decimal,
    vodka: Decimal,
) -> Spending {
    Spending::Itemized(vec![
        SpendingItem::new("beer 0.5l", beer, BEER_05_PRICE),
        SpendingItem::new("wine 0.7l", wine, WINE_07_PRICE),
        SpendingItem::new("vodka 0.5l", vodka, VODKA_05_PRICE),
    ])
}
