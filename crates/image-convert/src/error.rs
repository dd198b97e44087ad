use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageConvertError {
    #[error("{0} is not an image file")]
    UnsupportedFile(String),

    #[error("Failed to load image: {0}")]
    DecodeFailure(String),

    #[error("Failed to convert image: {0}")]
    EncodeFailure(String),

    #[error("Quality must be between 0 and 1, got {0}")]
    InvalidQuality(f32),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// Precondition message shown to the user as-is
    #[error("{0}")]
    Validation(String),
}
