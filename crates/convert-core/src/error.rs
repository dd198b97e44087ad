use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The value field does not hold a finite number. Callers show a blank
    /// result rather than an error message.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown unit '{unit}' in {category}")]
    UnknownUnit { category: String, unit: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid exchange rate for {code}: {rate}")]
    InvalidRate { code: String, rate: f64 },
}
