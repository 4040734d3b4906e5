use thiserror::Error;

/// Rejected user input. Raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("note does not exist: {0}")]
    UnknownNote(String),
    #[error("scale type {0} is not supported")]
    UnknownScaleType(String),
    #[error("tuning must contain at least one string")]
    EmptyTuning,
    #[error("invalid note {note:?} in tuning at string {string}")]
    InvalidTuningNote { string: usize, note: String },
    #[error("fret count must be a positive integer, got {0:?}")]
    InvalidFretCount(String),
    #[error("unknown parameter field: {0}")]
    UnknownField(String),
}
