use thiserror::Error;

use crate::profile::validation::ValidationError;

/// Per-record failure surfaced by the profile assembler.
/// Never aborts a batch; the coordinator counts it and moves on.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unreadable input: {0}")]
    Unreadable(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RecordError {
    /// Short machine-readable code for report warnings.
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::InvalidRecord(_) => "INVALID_RECORD",
            RecordError::Unreadable(_) => "UNREADABLE_INPUT",
            RecordError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
