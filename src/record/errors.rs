//! Record codec errors
//!
//! Every variant belongs to the MALFORMED_RECORD category. The variant
//! names the reason so a skipped line can be diagnosed from the log alone.

use thiserror::Error;

/// Error code shared by all malformed-record failures
pub const MALFORMED_RECORD_CODE: &str = "INVTRACK_MALFORMED_RECORD";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected {expected} fields separated by '|', found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("identifier has leading or trailing whitespace: {id:?}")]
    PaddedIdentifier { id: String },

    #[error("{field} contains a line break")]
    LineBreak { field: &'static str },

    #[error("quantity is not an integer: {text:?}")]
    InvalidQuantity { text: String },

    #[error("price is not a number: {text:?}")]
    InvalidPrice { text: String },
}

impl RecordError {
    pub fn code(&self) -> &'static str {
        MALFORMED_RECORD_CODE
    }

    /// Short machine-readable reason, used as a log field
    pub fn reason(&self) -> &'static str {
        match self {
            RecordError::FieldCount { .. } => "field_count",
            RecordError::EmptyIdentifier => "empty_identifier",
            RecordError::PaddedIdentifier { .. } => "padded_identifier",
            RecordError::LineBreak { .. } => "line_break",
            RecordError::InvalidQuantity { .. } => "invalid_integer",
            RecordError::InvalidPrice { .. } => "invalid_float",
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;
