//! Error types for KineSync

use thiserror::Error;

use crate::SourceId;

/// Core KineSync errors
///
/// Everything here is a misuse or configuration error. Conditions that are
/// expected during normal operation (an empty buffer, a query outside the
/// buffered range) are reported as `None`, not as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinesyncError {
    // Container errors
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Buffer is empty")]
    BufferEmpty,

    // Argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    // Source errors
    #[error("Source id space exhausted")]
    IdExhausted,

    #[error("Unknown source: {0}")]
    UnknownSource(SourceId),

    // Feed errors
    #[error("Frame feed is full")]
    FeedFull,

    #[error("Frame feed is closed")]
    FeedClosed,
}

/// Result type for KineSync operations
pub type KinesyncResult<T> = Result<T, KinesyncError>;
