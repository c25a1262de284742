//! Sensor entities exposed to the host.
//!
//! One [`SensorEntity`] exists per measurement key of a configured device.
//! Entities hold no data of their own; they look values up in the shared
//! [`WaveReader`] and convert them to the configured unit system.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::Serialize;
use tracing::{debug, warn};

use airwave_types::{MeasurementKey, UnitSystem, WaveModel, convert_for_display, unit_of_measurement};

use crate::reader::{UpdateOutcome, WaveReader};

/// Attribution attached to every entity's attributes.
pub const ATTRIBUTION: &str = "Data provided by Airthings";

/// Prefix of every entity name.
pub const NAME_PREFIX: &str = "Airthings Wave";

/// Static presentation metadata for one measurement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescription {
    /// The measurement this describes.
    pub key: MeasurementKey,
    /// Human-readable name.
    pub name: &'static str,
    /// Material Design icon.
    pub icon: &'static str,
    /// Host device class, if one applies.
    pub device_class: Option<&'static str>,
}

const SENSOR_DESCRIPTIONS: [SensorDescription; 9] = [
    SensorDescription {
        key: MeasurementKey::Humidity,
        name: "Humidity",
        icon: "mdi:water-percent",
        device_class: Some("humidity"),
    },
    SensorDescription {
        key: MeasurementKey::Temperature,
        name: "Temperature",
        icon: "mdi:thermometer",
        device_class: Some("temperature"),
    },
    SensorDescription {
        key: MeasurementKey::Pressure,
        name: "Pressure",
        icon: "mdi:gauge",
        device_class: Some("pressure"),
    },
    SensorDescription {
        key: MeasurementKey::Co2,
        name: "CO2",
        icon: "mdi:molecule-co2",
        device_class: Some("carbon_dioxide"),
    },
    SensorDescription {
        key: MeasurementKey::Voc,
        name: "VOC",
        icon: "mdi:cloud",
        device_class: Some("volatile_organic_compounds"),
    },
    SensorDescription {
        key: MeasurementKey::ShortRadon,
        name: "Radon 1-day avg",
        icon: "mdi:radioactive",
        device_class: None,
    },
    SensorDescription {
        key: MeasurementKey::LongRadon,
        name: "Radon longterm avg",
        icon: "mdi:radioactive",
        device_class: None,
    },
    SensorDescription {
        key: MeasurementKey::Light,
        name: "Light",
        icon: "mdi:white-balance-sunny",
        device_class: Some("illuminance"),
    },
    SensorDescription {
        key: MeasurementKey::Vpd,
        name: "Vapor Pressure Deficit",
        icon: "mdi:water-outline",
        device_class: Some("pressure"),
    },
];

/// Look up the presentation metadata for a key.
pub fn description_for(key: MeasurementKey) -> &'static SensorDescription {
    // The table is ordered like MeasurementKey::ALL
    &SENSOR_DESCRIPTIONS[key as usize]
}

/// The value an entity currently reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorState {
    /// A stored value, already converted to the entity's unit.
    Known(f64),
    /// Never read, or the reader is gone.
    Unknown,
}

impl Serialize for SensorState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl SensorState {
    /// The numeric value, if known.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(*v),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{}", v),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One measurement of one device, as seen by the host.
#[derive(Debug, Clone)]
pub struct SensorEntity {
    reader: Weak<WaveReader>,
    address: String,
    model: WaveModel,
    description: &'static SensorDescription,
    unit_system: UnitSystem,
}

impl SensorEntity {
    /// Create an entity backed by `reader`.
    pub fn new(reader: &Arc<WaveReader>, key: MeasurementKey, unit_system: UnitSystem) -> Self {
        Self {
            reader: Arc::downgrade(reader),
            address: reader.address().to_string(),
            model: reader.model(),
            description: description_for(key),
            unit_system,
        }
    }

    /// The measurement this entity reports.
    pub fn key(&self) -> MeasurementKey {
        self.description.key
    }

    /// Display name, e.g. `Airthings Wave Humidity`.
    pub fn name(&self) -> String {
        format!("{} {}", NAME_PREFIX, self.description.name)
    }

    /// Stable identifier, `{address}-{display name}`.
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.address, self.description.name)
    }

    pub fn icon(&self) -> &'static str {
        self.description.icon
    }

    pub fn device_class(&self) -> Option<&'static str> {
        self.description.device_class
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn unit_of_measurement(&self) -> &'static str {
        unit_of_measurement(self.description.key, self.unit_system)
    }

    /// Current value in this entity's unit system.
    pub async fn state(&self) -> SensorState {
        let Some(reader) = self.reader.upgrade() else {
            return SensorState::Unknown;
        };
        match reader.get(self.description.key).await {
            Some(value) => SensorState::Known(convert_for_display(
                self.description.key,
                self.model,
                value,
                self.unit_system,
            )),
            None => SensorState::Unknown,
        }
    }

    /// Extra state attributes.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("attribution", ATTRIBUTION.to_string())])
    }

    /// Ask the reader for fresh data.
    ///
    /// Throttled and concurrent calls are no-ops. Failures are logged and
    /// swallowed; the entity keeps reporting the last stored value.
    pub async fn update(&self) {
        let Some(reader) = self.reader.upgrade() else {
            debug!("Reader for {} dropped; skipping update", self.unique_id());
            return;
        };
        match reader.update().await {
            Ok(UpdateOutcome::Updated) => debug!("{} refreshed", self.name()),
            Ok(_) => {}
            Err(e) => warn!("Could not update {} ({}): {}", self.name(), self.address, e),
        }
    }
}
