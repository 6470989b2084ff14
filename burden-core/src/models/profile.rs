use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{
    AmountOutOfRange, checked_mul, checked_sum, clamp_non_negative,
};

/// Whether the declared salary is before or after income tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    #[default]
    Gross,
    Net,
}

impl SalaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gross => "gross",
            Self::Net => "net",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gross" => Some(Self::Gross),
            "net" => Some(Self::Net),
            _ => None,
        }
    }
}

/// Selects whether employer-borne contributions count towards the burden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Only taxes the individual pays directly or through prices.
    Personal,
    /// Also counts the contributions the employer pays on the salary.
    #[default]
    WithEmployer,
}

impl CalculationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::WithEmployer => "with_employer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(Self::Personal),
            "with_employer" => Some(Self::WithEmployer),
            _ => None,
        }
    }

    pub fn includes_employer(&self) -> bool {
        matches!(self, Self::WithEmployer)
    }
}

/// One priced line of itemized consumption, e.g. 8 bottles of beer at 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingItem {
    pub label: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl SpendingItem {
    pub fn new(
        label: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            quantity,
            unit_price,
        }
    }

    pub fn amount(&self) -> Result<Decimal, AmountOutOfRange> {
        checked_mul("spending item", self.quantity, self.unit_price)
    }
}

/// Monthly spending on one excise category.
///
/// A category is either declared as a single monthly figure or itemized as
/// quantity × unit price lines. Both resolve to one monthly amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spending {
    #[default]
    None,
    Monthly(Decimal),
    Itemized(Vec<SpendingItem>),
}

impl Spending {
    pub fn monthly_amount(&self) -> Result<Decimal, AmountOutOfRange> {
        match self {
            Self::None => Ok(Decimal::ZERO),
            Self::Monthly(amount) => Ok(*amount),
            Self::Itemized(items) => checked_sum(
                "spending item",
                items
                    .iter()
                    .map(SpendingItem::amount)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }

    fn normalized(
        &self,
        field: &'static str,
    ) -> Self {
        match self {
            Self::None => Self::None,
            Self::Monthly(amount) => Self::Monthly(clamp_non_negative(field, *amount)),
            Self::Itemized(items) => Self::Itemized(
                items
                    .iter()
                    .map(|item| SpendingItem {
                        label: item.label.clone(),
                        quantity: clamp_non_negative(field, item.quantity),
                        unit_price: clamp_non_negative(field, item.unit_price),
                    })
                    .collect(),
            ),
        }
    }
}

/// Spending subject to excise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    #[serde(default)]
    pub fuel: Spending,
    #[serde(default)]
    pub alcohol: Spending,
    #[serde(default)]
    pub tobacco: Spending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyTaxKind {
    Property,
    Transport,
    Land,
}

/// One annual property-type tax the individual pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyTaxItem {
    /// An amount taken straight from the tax notice.
    Declared {
        kind: PropertyTaxKind,
        annual_amount: Decimal,
    },
    /// Cadastral value times a rate given in percent.
    Assessed {
        kind: PropertyTaxKind,
        cadastral_value: Decimal,
        rate_percent: Decimal,
    },
}

impl PropertyTaxItem {
    pub fn kind(&self) -> PropertyTaxKind {
        match self {
            Self::Declared { kind, .. } | Self::Assessed { kind, .. } => *kind,
        }
    }

    fn normalized(&self) -> Self {
        match self {
            Self::Declared {
                kind,
                annual_amount,
            } => Self::Declared {
                kind: *kind,
                annual_amount: clamp_non_negative("property_taxes.annual_amount", *annual_amount),
            },
            Self::Assessed {
                kind,
                cadastral_value,
                rate_percent,
            } => Self::Assessed {
                kind: *kind,
                cadastral_value: clamp_non_negative(
                    "property_taxes.cadastral_value",
                    *cadastral_value,
                ),
                rate_percent: clamp_non_negative("property_taxes.rate_percent", *rate_percent),
            },
        }
    }
}

/// Annual self-employment income split by payer type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentIncome {
    pub from_individuals: Decimal,
    pub from_entities: Decimal,
}

/// The person whose burden is calculated.
///
/// `salary` is monthly; `other_income` is annual; `monthly_spending` covers
/// all consumption and is the VAT base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub salary: Decimal,
    #[serde(default)]
    pub salary_type: SalaryType,
    #[serde(default)]
    pub other_income: Decimal,
    #[serde(default)]
    pub monthly_spending: Decimal,
    #[serde(default)]
    pub consumption: Option<Consumption>,
    #[serde(default)]
    pub property_taxes: Vec<PropertyTaxItem>,
    #[serde(default)]
    pub self_employment: Option<SelfEmploymentIncome>,
    #[serde(default)]
    pub calculation_mode: CalculationMode,
}

impl Profile {
    /// Returns a copy with every negative amount clamped to zero.
    pub fn normalized(&self) -> Self {
        Self {
            salary: clamp_non_negative("salary", self.salary),
            salary_type: self.salary_type,
            other_income: clamp_non_negative("other_income", self.other_income),
            monthly_spending: clamp_non_negative("monthly_spending", self.monthly_spending),
            consumption: self.consumption.as_ref().map(|c| Consumption {
                fuel: c.fuel.normalized("consumption.fuel"),
                alcohol: c.alcohol.normalized("consumption.alcohol"),
                tobacco: c.tobacco.normalized("consumption.tobacco"),
            }),
            property_taxes: self
                .property_taxes
                .iter()
                .map(PropertyTaxItem::normalized)
                .collect(),
            self_employment: self.self_employment.map(|se| SelfEmploymentIncome {
                from_individuals: clamp_non_negative(
                    "self_employment.from_individuals",
                    se.from_individuals,
                ),
                from_entities: clamp_non_negative("self_employment.from_entities", se.from_entities),
            }),
            calculation_mode: self.calculation_mode,
        }
    }
}
