//! Inventory store error types
//!
//! Error codes:
//! - INVTRACK_DUPLICATE_IDENTIFIER (ERROR)
//! - INVTRACK_NOT_FOUND (ERROR)
//! - INVTRACK_MALFORMED_INPUT (ERROR)
//! - INVTRACK_MALFORMED_RECORD (ERROR)
//! - INVTRACK_STORE_IO_ERROR (FATAL when raised by load)
//! - INVTRACK_STORE_NOT_DURABLE (ERROR, memory and disk disagree)
//! - INVTRACK_STORE_UNSAVED_CHANGES (ERROR, reload refused while dirty)

use std::io;

use thiserror::Error;

use crate::observability::Severity;
use crate::record::RecordError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record with identifier '{id}' already exists")]
    DuplicateIdentifier { id: String },

    #[error("no record with identifier '{id}'")]
    NotFound { id: String },

    #[error("invalid {field} {text:?}: {reason}")]
    MalformedInput {
        field: &'static str,
        text: String,
        reason: String,
    },

    #[error(transparent)]
    Malformed(#[from] RecordError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("'{path}' has unsaved changes; save before reloading")]
    UnsavedChanges { path: String },

    /// The mutation is applied in memory but the backing file still holds
    /// the previous snapshot.
    #[error("{operation} applied in memory but not saved ({context}: {source})")]
    NotDurable {
        operation: &'static str,
        context: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn malformed_input(
        field: &'static str,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StoreError::MalformedInput {
            field,
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Re-tag a failed save as a durability failure of `operation`.
    pub(crate) fn into_not_durable(self, operation: &'static str) -> Self {
        match self {
            StoreError::Io { context, source } => StoreError::NotDurable {
                operation,
                context,
                source,
            },
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateIdentifier { .. } => "INVTRACK_DUPLICATE_IDENTIFIER",
            StoreError::NotFound { .. } => "INVTRACK_NOT_FOUND",
            StoreError::MalformedInput { .. } => "INVTRACK_MALFORMED_INPUT",
            StoreError::Malformed(e) => e.code(),
            StoreError::Io { .. } => "INVTRACK_STORE_IO_ERROR",
            StoreError::NotDurable { .. } => "INVTRACK_STORE_NOT_DURABLE",
            StoreError::UnsavedChanges { .. } => "INVTRACK_STORE_UNSAVED_CHANGES",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            StoreError::Io { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// True when the in-memory table holds a change the file does not.
    pub fn is_durability_failure(&self) -> bool {
        matches!(self, StoreError::NotDurable { .. })
    }

    /// Underlying I/O error kind, if this is an I/O failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            StoreError::Io { source, .. } | StoreError::NotDurable { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
