//! Platform-agnostic types for Airthings Wave sensors.
//!
//! This crate holds everything about Wave data that does not need a
//! Bluetooth stack, so it can be shared by the BLE core (airwave-core) and
//! any front end that only handles decoded values.
//!
//! # Features
//!
//! - Measurement keys, hardware models and unit systems
//! - Decoders for the Wave and Wave Plus byte layouts
//! - Vapor pressure deficit computation
//! - UUID constants for the BLE characteristic
//! - Error types for data parsing
//!
//! # Example
//!
//! ```
//! use airwave_types::{MeasurementKey, WaveModel};
//!
//! let mut raw = [0u8; 20];
//! raw[1] = 0x5A; // 45 % humidity
//! raw[16] = 0x2C; // 300 / 100 = 3.0 °C
//! raw[17] = 0x01;
//!
//! let values = WaveModel::Wave.decode(&raw).unwrap();
//! assert_eq!(values.get(MeasurementKey::Humidity), Some(45.0));
//! assert_eq!(values.get(MeasurementKey::Temperature), Some(3.0));
//! ```

pub mod decode;
pub mod error;
pub mod types;
pub mod units;
pub mod uuid;
pub mod vpd;

pub use decode::{WAVE_PLUS_READING_BYTES, WAVE_READING_BYTES, decode_wave, decode_wave_plus};
pub use error::{ParseError, ParseResult};
pub use types::{MeasurementKey, Measurements, UnitSystem, WaveModel};
pub use units::{convert_for_display, unit_of_measurement};
pub use uuid::GattCharacteristic;
pub use vpd::vapor_pressure_deficit;
