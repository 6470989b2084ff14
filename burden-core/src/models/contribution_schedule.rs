use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named employer contribution (pension, medical, ...) with separate rates
/// below and above the shared limit base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTier {
    pub name: String,
    pub base_rate: Decimal,
    pub above_cap_rate: Decimal,
}

impl ContributionTier {
    pub fn new(
        name: impl Into<String>,
        base_rate: Decimal,
        above_cap_rate: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            base_rate,
            above_cap_rate,
        }
    }

    /// A tier whose rate does not change at the limit base.
    pub fn flat(
        name: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self::new(name, rate, rate)
    }
}

/// Tiers sharing one annual limit base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    pub limit_base: Decimal,
    pub tiers: Vec<ContributionTier>,
}

impl ContributionSchedule {
    /// Sum of every tier's below-cap rate.
    pub fn total_base_rate(&self) -> Decimal {
        self.tiers.iter().map(|t| t.base_rate).sum()
    }

    /// Sum of every tier's above-cap rate.
    pub fn total_above_cap_rate(&self) -> Decimal {
        self.tiers.iter().map(|t| t.above_cap_rate).sum()
    }
}
