//! Errors produced while enumerating dependencies.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// The source has no dependency enumeration for the environment it was
    /// given. This is a defect in the source, never a condition to retry.
    #[error("source `{source_type}` does not implement dependency enumeration")]
    EnumerationNotImplemented { source_type: String },

    /// A source-specific failure, e.g. a manifest that could not be parsed.
    #[error("{source_type} source failed: {message}")]
    Failed {
        source_type: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub fn not_implemented(source_type: impl Into<String>) -> Self {
        Self::EnumerationNotImplemented {
            source_type: source_type.into(),
        }
    }

    pub fn failed(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            source_type: source_type.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
