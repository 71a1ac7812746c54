mod allowance;
mod calculation;
mod tax_bracket;

pub use allowance::{AllowanceBound, AllowanceDetail, AllowanceType};
pub use calculation::{BracketResult, CalculationInput, TaxCalculation};
pub use tax_bracket::TaxBracket;
