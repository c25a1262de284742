//! Core BLE library for Airthings Wave indoor air quality sensors.
//!
//! This crate polls Airthings Wave devices over Bluetooth Low Energy and
//! exposes each measured quantity as a sensor entity for a host application.
//!
//! # Features
//!
//! - **Device discovery**: Scan for nearby Airthings devices via BLE
//! - **Current readings**: humidity, temperature, radon, and on the Wave Plus
//!   also pressure, CO₂, VOC and light
//! - **Derived values**: vapor pressure deficit from temperature and humidity
//! - **Throttled polling**: at most one wireless session per interval per device
//! - **Sensor entities**: per-measurement name, icon, unit and state
//!
//! # Supported Devices
//!
//! | Device | Sensors |
//! |--------|---------|
//! | Wave | Humidity, Temperature, Radon (1-day, long-term), VPD |
//! | Wave Plus | Humidity, Temperature, Pressure, CO₂, VOC, Radon (1-day, long-term), Light, VPD |
//!
//! # Platform Differences
//!
//! - **macOS**: Devices are identified by a UUID assigned by CoreBluetooth,
//!   not by their MAC address. Configure that UUID as the device address.
//! - **Linux/Windows**: Devices are identified by their Bluetooth MAC address
//!   (e.g., `AA:BB:CC:DD:EE:FF`).
//!
//! # Quick Start
//!
//! ```no_run
//! use airwave_core::{BleTransport, SensorConfig, SensorEntity, setup_platform};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SensorConfig::new("AA:BB:CC:DD:EE:FF");
//!     let mut entities: Vec<SensorEntity> = Vec::new();
//!     let _reader = setup_platform(&config, BleTransport::new(), &mut entities)?;
//!
//!     for entity in &entities {
//!         entity.update().await;
//!         println!("{}: {} {}", entity.name(), entity.state().await, entity.unit_of_measurement());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod mock;
pub mod platform;
pub mod reader;
pub mod scan;
pub mod sensor;
pub mod traits;
pub mod util;

// Re-export types from airwave-types
pub use airwave_types::uuid as uuids;
pub use airwave_types::{
    GattCharacteristic, MeasurementKey, Measurements, UnitSystem, WaveModel,
};

pub use config::{SensorConfig, ValidationError};
pub use device::{BleTransport, ConnectionConfig};
pub use error::{ConnectionFailureReason, DeviceNotFoundReason, Error, Result};
pub use mock::{MockTransport, MockTransportBuilder};
pub use platform::{EntityRegistry, setup_platform, setup_platform_with_timeout};
pub use reader::{UpdateOutcome, WaveReader};
pub use scan::{DiscoveredDevice, ScanOptions};
pub use sensor::{SensorDescription, SensorEntity, SensorState, description_for};
pub use traits::WaveTransport;
pub use util::{create_identifier, format_peripheral_id};

/// Reader shared between a platform owner and its entities.
pub type SharedReader = std::sync::Arc<WaveReader>;
