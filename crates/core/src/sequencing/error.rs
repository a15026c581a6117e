//! Sequencing error types.

use complihr_shared::AppError;
use complihr_shared::types::OrganizationId;
use thiserror::Error;

/// Reasons a pattern string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern is empty or whitespace.
    #[error("Pattern must not be empty")]
    Empty,

    /// Pattern exceeds the maximum length.
    #[error("Pattern is {length} characters long, maximum is {max}")]
    TooLong {
        /// Actual length in characters.
        length: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// A `{` without a matching `}`.
    #[error("Unterminated placeholder at byte {position}")]
    UnterminatedPlaceholder {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A `}` outside of any placeholder.
    #[error("Unexpected '}}' at byte {position}")]
    UnexpectedClosingBrace {
        /// Byte offset of the closing brace.
        position: usize,
    },

    /// `{}` with no name.
    #[error("Empty placeholder at byte {position}")]
    EmptyPlaceholder {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A placeholder name that is not recognized.
    #[error("Unknown placeholder: {{{name}}}")]
    UnknownPlaceholder {
        /// Name between the braces.
        name: String,
    },

    /// `{SEQUENCE:N}` with a width outside `1..=20` or not a number.
    #[error("Invalid sequence width: {value}")]
    InvalidSequenceWidth {
        /// Text after `SEQUENCE:`.
        value: String,
    },

    /// Pattern has no `{SEQUENCE}` placeholder, so IDs would repeat.
    #[error("Pattern must contain a {{SEQUENCE}} placeholder")]
    MissingSequence,

    /// Pattern has more than one `{SEQUENCE}` placeholder.
    #[error("Pattern must contain only one {{SEQUENCE}} placeholder")]
    DuplicateSequence,
}

/// Sequencing errors.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// Organization does not exist.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Organization exists but is deactivated.
    #[error("Organization is inactive: {0}")]
    OrganizationInactive(OrganizationId),

    /// Category name is not one of the known categories.
    #[error("Unknown ID category: {0}")]
    UnknownCategory(String),

    /// Pattern failed validation.
    #[error("Invalid ID pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    /// Counter or settings store could not be reached.
    #[error("Sequence storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::OrganizationNotFound(_) => Self::NotFound(err.to_string()),
            SequenceError::OrganizationInactive(_) => Self::BusinessRule(err.to_string()),
            SequenceError::UnknownCategory(_) | SequenceError::InvalidPattern(_) => {
                Self::Validation(err.to_string())
            }
            SequenceError::StorageUnavailable(_) => Self::Database(err.to_string()),
        }
    }
}
