use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdfToolsError {
    /// The file is not of an accepted type (e.g. a non-PDF dropped on a PDF tool).
    #[error("{0} is not a PDF file")]
    UnsupportedFile(String),

    /// The PDF library could not parse the bytes.
    #[error("Failed to parse PDF: {0}")]
    DecodeFailure(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    /// A precondition of the requested operation does not hold.
    /// The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    /// A multi-file operation failed part way and produced no output.
    #[error("Operation aborted while processing {name}: {reason}")]
    OperationAborted { name: String, reason: String },

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Invalid flow transition: {0}")]
    InvalidTransition(String),
}

impl PdfToolsError {
    pub(crate) fn aborted(name: &str, cause: PdfToolsError) -> Self {
        PdfToolsError::OperationAborted {
            name: name.to_string(),
            reason: cause.to_string(),
        }
    }
}
