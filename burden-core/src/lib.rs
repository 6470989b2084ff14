pub mod calculations;
pub mod models;

pub use calculations::{
    AmountOutOfRange, BreakdownItem, CalculationError, CalculationResult, SweepPoint,
    TaxBurdenCalculator, TaxCategory, calculate, salary_sweep,
};
pub use models::*;
