use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// The result is not a finite number (sqrt of a negative, 0^-1, 171!)
    #[error("Invalid calculation: {0}")]
    InvalidCalculation(String),

    /// Text could not be decoded (bad Base64, malformed percent escapes)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),
}
