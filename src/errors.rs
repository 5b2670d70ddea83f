//! Error types for the notation engine
//!
//! Every failure here is a deterministic validation failure. Nothing is
//! retried; the API layer converts these into JS strings at the boundary.

use thiserror::Error;

/// Top-level error type shared by the models, the IR pipeline and the API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// Beat count is zero or not a whole number
    #[error("Invalid time signature: {0}")]
    InvalidTimeSignature(String),

    /// Requested chunk sizes don't add up to the events' elementary length
    #[error("Length mismatch: expected {expected} elementary units, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A raw number or fraction that isn't one of the six notated durations
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Chunk sizes must be positive
    #[error("Chunk size at index {index} must be positive")]
    InvalidChunkSize { index: usize },

    /// Empty pitch set, or a pause mixed with pitches
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Bar index {index} out of bounds (bar count: {len})")]
    BarIndexOutOfRange { index: usize, len: usize },

    /// Keyboard token with no note or duration mapping
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type NotationResult<T> = Result<T, NotationError>;
