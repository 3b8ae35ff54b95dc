//! Submission validation.

use serde_json::Value as JsonValue;

use crate::error::ValidationError;

/// Minimum number of characters (after trimming) a submission must have.
pub const MIN_TEXT_CHARS: usize = 10;

/// A submission that passed validation.
///
/// Only [`validate`] and [`ValidText::parse`] construct this type, so holding one
/// proves the trimmed text has at least [`MIN_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidText {
    submitted: String,
}

impl ValidText {
    /// Validate an already-typed string.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        if text.is_empty() {
            return Err(ValidationError::MissingOrWrongType);
        }

        let actual = text.trim().chars().count();
        if actual < MIN_TEXT_CHARS {
            return Err(ValidationError::TooShort {
                min: MIN_TEXT_CHARS,
                actual,
            });
        }

        Ok(Self {
            submitted: text.to_string(),
        })
    }

    /// The text exactly as submitted (this is what the classifier receives).
    pub fn submitted(&self) -> &str {
        &self.submitted
    }

    /// The text with leading and trailing whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.submitted.trim()
    }

    /// Number of whitespace-delimited tokens in the trimmed text.
    pub fn token_count(&self) -> usize {
        self.trimmed().split_whitespace().count()
    }
}

/// Validate the `text` field of a decoded request body.
///
/// `None` means the field was absent.
pub fn validate(text: Option<&JsonValue>) -> Result<ValidText, ValidationError> {
    match text {
        Some(JsonValue::String(s)) => ValidText::parse(s),
        _ => Err(ValidationError::MissingOrWrongType),
    }
}
