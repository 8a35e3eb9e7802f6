//! Error types for event-filter.

use thiserror::Error;

use super::types::ValueType;

/// Precondition faults raised by a pipeline stage.
///
/// A stage that filters data out does not produce one of these; it halts
/// with [`StageOutcome::Halt`](super::StageOutcome::Halt) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The stage was invoked without an event to operate on.
    #[error("no Event Received")]
    NoEventReceived,
}

/// Errors raised while building an event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    /// Value kind does not match the declared value type
    #[error("reading '{resource_name}': value type {value_type} cannot hold a {found} value")]
    ValueTypeMismatch {
        resource_name: String,
        value_type: ValueType,
        found: &'static str,
    },

    /// Numeric value does not fit the declared value type
    #[error("reading '{resource_name}': value {value} is out of range for {value_type}")]
    ValueOutOfRange {
        resource_name: String,
        value_type: ValueType,
        value: String,
    },
}

/// Errors raised while reading an event from the pipeline input.
#[derive(Debug, Error)]
pub enum FilterAppError {
    /// Input could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
