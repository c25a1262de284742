//! Error types for airwave-core.
//!
//! A failed update is local to one reader: the previous measurements stay in
//! place and the next poll after the throttle interval is the only retry.
//!
//! | Error | Typical cause | Effect on the reader |
//! |-------|---------------|----------------------|
//! | [`Error::DeviceNotFound`] | Sensor asleep or out of range, wrong address | Stale values kept |
//! | [`Error::ConnectionFailed`] | Sensor refused the link | Stale values kept |
//! | [`Error::Timeout`] | Radio congestion | Stale values kept |
//! | [`Error::Bluetooth`] | Anything else from the BLE stack | Stale values kept |
//! | [`Error::InvalidReadingFormat`] | Characteristic value of the wrong length | Stale values kept |
//! | [`Error::InvalidConfig`] | Bad platform configuration | Reader never created |

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while polling a Wave sensor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error reported by the BLE stack.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// The sensor could not be located.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// A read was attempted without an open session.
    #[error("Not connected to device")]
    NotConnected,

    /// The current-values characteristic is missing from the GATT table.
    #[error("Characteristic {uuid} not found in {service_count} services")]
    CharacteristicNotFound {
        uuid: String,
        service_count: usize,
    },

    /// A value could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The characteristic value does not have the layout's length.
    #[error("Invalid reading format: expected {expected} bytes, got {actual}")]
    InvalidReadingFormat { expected: usize, actual: usize },

    /// A session step did not finish in time.
    #[error("Timed out after {duration:?} waiting to {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// The sensor was found but the link could not be opened.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        device_id: Option<String>,
        reason: ConnectionFailureReason,
    },

    /// The platform configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a link could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionFailureReason {
    /// The sensor stopped answering.
    OutOfRange,
    /// The stack or the sensor refused the connection.
    Rejected(String),
}

impl std::fmt::Display for ConnectionFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "device out of range"),
            Self::Rejected(msg) => write!(f, "rejected ({})", msg),
        }
    }
}

/// Why a sensor could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// The host has no usable Bluetooth adapter.
    NoAdapter,
    /// Scanning finished without seeing the address.
    NotFound { identifier: String },
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
            Self::NotFound { identifier } => write!(f, "no sensor seen at '{}'", identifier),
        }
    }
}

impl Error {
    pub fn device_not_found(identifier: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NotFound {
            identifier: identifier.into(),
        })
    }

    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn connection_failed(device_id: Option<String>, reason: ConnectionFailureReason) -> Self {
        Self::ConnectionFailed { device_id, reason }
    }

    /// Whether the error came from decoding rather than from the radio.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidReadingFormat { .. } | Self::InvalidData(_)
        )
    }
}

impl From<airwave_types::ParseError> for Error {
    fn from(err: airwave_types::ParseError) -> Self {
        use airwave_types::ParseError;

        match err {
            ParseError::InsufficientBytes { expected, actual }
            | ParseError::UnexpectedLength { expected, actual } => {
                Error::InvalidReadingFormat { expected, actual }
            }
            ParseError::InvalidValue(msg) => Error::InvalidData(msg),
            other => Error::InvalidData(other.to_string()),
        }
    }
}

/// Result alias for airwave-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::device_not_found("AA:BB:CC:DD:EE:FF");
        assert_eq!(
            err.to_string(),
            "Device not found: no sensor seen at 'AA:BB:CC:DD:EE:FF'"
        );

        assert_eq!(Error::NotConnected.to_string(), "Not connected to device");

        let err = Error::characteristic_not_found("b42e2a68", 3);
        assert_eq!(
            err.to_string(),
            "Characteristic b42e2a68 not found in 3 services"
        );

        let err = Error::timeout("read current values", Duration::from_secs(10));
        assert_eq!(
            err.to_string(),
            "Timed out after 10s waiting to read current values"
        );
    }

    #[test]
    fn test_no_adapter_message() {
        let err = Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter);
        assert!(err.to_string().contains("no Bluetooth adapter"));
    }

    #[test]
    fn test_connection_failed_display() {
        let err = Error::connection_failed(
            Some("AA:BB:CC:DD:EE:FF".to_string()),
            ConnectionFailureReason::OutOfRange,
        );
        assert_eq!(err.to_string(), "Connection failed: device out of range");

        let err = Error::connection_failed(None, ConnectionFailureReason::Rejected("busy".into()));
        assert_eq!(err.to_string(), "Connection failed: rejected (busy)");
    }

    #[test]
    fn test_parse_error_maps_to_reading_format() {
        let err: Error = airwave_types::ParseError::InsufficientBytes {
            expected: 20,
            actual: 13,
        }
        .into();
        assert!(matches!(
            err,
            Error::InvalidReadingFormat {
                expected: 20,
                actual: 13
            }
        ));
        assert!(err.is_decode_error());

        let err: Error = airwave_types::ParseError::UnexpectedLength {
            expected: 20,
            actual: 22,
        }
        .into();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_radio_errors_are_not_decode_errors() {
        assert!(!Error::NotConnected.is_decode_error());
        assert!(!Error::timeout("connect", Duration::from_secs(1)).is_decode_error());
    }

    #[test]
    fn test_btleplug_error_conversion() {
        fn assert_from<T: From<btleplug::Error>>() {}
        assert_from::<Error>();
    }
}
