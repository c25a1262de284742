//! Error types for data parsing in airwave-types.

use thiserror::Error;

/// Errors that can occur when parsing Airthings Wave sensor data.
///
/// This error type is platform-agnostic and does not include
/// BLE-specific errors (those belong in airwave-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The buffer is shorter than the fixed reading layout.
    #[error("Insufficient bytes: reading requires {expected} bytes, got {actual}")]
    InsufficientBytes {
        /// Length of the layout.
        expected: usize,
        /// Length of the buffer received.
        actual: usize,
    },

    /// The buffer is longer than the fixed reading layout.
    #[error("Unexpected length: reading is exactly {expected} bytes, got {actual}")]
    UnexpectedLength {
        /// Length of the layout.
        expected: usize,
        /// Length of the buffer received.
        actual: usize,
    },

    /// A textual value (model, unit system, measurement key) was not recognized.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using airwave-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
