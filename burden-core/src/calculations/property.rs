//! Property, transport and land taxes.

use rust_decimal::Decimal;

use crate::PropertyTaxItem;
use crate::calculations::common::{AmountOutOfRange, checked_mul, checked_sum, round_to_unit};

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Annual amount of one item.
pub fn item_amount(item: &PropertyTaxItem) -> Result<Decimal, AmountOutOfRange> {
    let amount = match item {
        PropertyTaxItem::Declared { annual_amount, .. } => *annual_amount,
        PropertyTaxItem::Assessed {
            cadastral_value,
            rate_percent,
            ..
        } => checked_mul("property_taxes.cadastral_value", *cadastral_value, *rate_percent)?
            / PERCENT,
    };
    Ok(amount.max(Decimal::ZERO))
}

/// Sum of all items, rounded to whole currency units.
pub fn total_property_taxes(items: &[PropertyTaxItem]) -> Result<Decimal, AmountOutOfRange> {
    let amounts = items
        .iter()
        .map(item_amount)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(round_to_unit(checked_sum("property_taxes", amounts)?))
}
