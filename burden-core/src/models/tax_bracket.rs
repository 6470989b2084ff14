use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of a progressive schedule.
///
/// `rate` applies to the part of income above `threshold` and below the next
/// bracket's threshold. The highest bracket has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        threshold: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { threshold, rate }
    }
}
