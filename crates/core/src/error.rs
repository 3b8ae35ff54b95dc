//! Error model for submissions and classifier answers.

use thiserror::Error;

/// Why a submission was rejected before reaching the classifier.
///
/// The `Display` output is the user-facing message and states exactly which
/// constraint failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `text` was absent, `null`, empty, or not a string.
    #[error("Text is required and must be a string")]
    MissingOrWrongType,

    /// The trimmed text is shorter than the minimum.
    #[error("Text is too short. Please enter at least {min} characters.")]
    TooShort { min: usize, actual: usize },
}

impl ValidationError {
    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingOrWrongType => "missing_text",
            ValidationError::TooShort { .. } => "text_too_short",
        }
    }
}

/// A classifier value outside the agreed contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("prediction label must be 0 or 1, got {0}")]
    InvalidLabel(String),

    #[error("probability pair must hold exactly 2 values, got {0}")]
    PairLength(usize),

    #[error("probability must be a finite number in [0, 1], got {0}")]
    ProbabilityOutOfRange(String),
}
