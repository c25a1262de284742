//! Core types for Airthings Wave sensor data.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Hardware revision of an Airthings Wave sensor.
///
/// The two revisions expose the same characteristic but pack it differently,
/// so the model decides both the decoder and the set of sensors offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaveModel {
    /// First generation Wave: radon, temperature, humidity.
    Wave,
    /// Wave Plus: adds pressure, CO2, VOC and light.
    #[default]
    WavePlus,
}

impl WaveModel {
    /// All supported models.
    pub const ALL: [WaveModel; 2] = [WaveModel::Wave, WaveModel::WavePlus];

    /// Measurement keys reported by this model, in display order.
    ///
    /// ```
    /// use airwave_types::{MeasurementKey, WaveModel};
    ///
    /// assert!(WaveModel::WavePlus.sensors().contains(&MeasurementKey::Voc));
    /// assert!(!WaveModel::Wave.sensors().contains(&MeasurementKey::Voc));
    /// ```
    #[must_use]
    pub fn sensors(&self) -> &'static [MeasurementKey] {
        match self {
            WaveModel::Wave => &[
                MeasurementKey::Humidity,
                MeasurementKey::Temperature,
                MeasurementKey::ShortRadon,
                MeasurementKey::LongRadon,
                MeasurementKey::Vpd,
            ],
            WaveModel::WavePlus => &MeasurementKey::ALL,
        }
    }

    /// Configuration identifier (`wave` or `wave_plus`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveModel::Wave => "wave",
            WaveModel::WavePlus => "wave_plus",
        }
    }

    /// Whether radon values decoded for this model are in pCi/L rather than Bq/m³.
    #[must_use]
    pub fn radon_in_pci(&self) -> bool {
        matches!(self, WaveModel::Wave)
    }
}

impl fmt::Display for WaveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveModel::Wave => write!(f, "Wave"),
            WaveModel::WavePlus => write!(f, "Wave Plus"),
        }
    }
}

impl FromStr for WaveModel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "wave" => Ok(WaveModel::Wave),
            "wave_plus" | "waveplus" | "plus" => Ok(WaveModel::WavePlus),
            other => Err(ParseError::InvalidValue(format!(
                "unknown model '{}' (expected 'wave' or 'wave_plus')",
                other
            ))),
        }
    }
}

/// Unit system used when presenting values.
///
/// Stored measurements are never converted; only displayed values are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(ParseError::InvalidValue(format!(
                "unknown unit system '{}' (expected 'metric' or 'imperial')",
                other
            ))),
        }
    }
}

/// A measured (or derived) quantity reported by a Wave sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MeasurementKey {
    /// Relative humidity in %.
    Humidity,
    /// Temperature in °C.
    Temperature,
    /// Atmospheric pressure in hPa.
    Pressure,
    /// CO2 concentration in ppm.
    Co2,
    /// Volatile organic compounds in ppb.
    Voc,
    /// Short-term (24 hour) radon average.
    ShortRadon,
    /// Long-term radon average.
    LongRadon,
    /// Ambient light.
    Light,
    /// Vapor pressure deficit in kPa, computed from temperature and humidity.
    Vpd,
}

impl MeasurementKey {
    /// Every key, in display order.
    pub const ALL: [MeasurementKey; 9] = [
        MeasurementKey::Humidity,
        MeasurementKey::Temperature,
        MeasurementKey::Pressure,
        MeasurementKey::Co2,
        MeasurementKey::Voc,
        MeasurementKey::ShortRadon,
        MeasurementKey::LongRadon,
        MeasurementKey::Light,
        MeasurementKey::Vpd,
    ];

    /// Stable snake_case identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::Humidity => "humidity",
            MeasurementKey::Temperature => "temperature",
            MeasurementKey::Pressure => "pressure",
            MeasurementKey::Co2 => "co2",
            MeasurementKey::Voc => "voc",
            MeasurementKey::ShortRadon => "short_radon",
            MeasurementKey::LongRadon => "long_radon",
            MeasurementKey::Light => "light",
            MeasurementKey::Vpd => "vpd",
        }
    }

    /// Whether the value is computed rather than read from the device.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        matches!(self, MeasurementKey::Vpd)
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        MeasurementKey::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| ParseError::InvalidValue(format!("unknown measurement '{}'", s)))
    }
}

/// Decoded values of one reading, keyed by measurement.
///
/// A key that is absent has no known value. Callers must treat `None` as
/// "unknown", which is distinct from a measured zero.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Measurements(BTreeMap<MeasurementKey, f64>);

impl Measurements {
    /// Create an empty set of measurements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a key, if known.
    #[must_use]
    pub fn get(&self, key: MeasurementKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// Set the value for a key, returning the previous value.
    pub fn insert(&mut self, key: MeasurementKey, value: f64) -> Option<f64> {
        self.0.insert(key, value)
    }

    /// Whether a value is known for the key.
    #[must_use]
    pub fn contains(&self, key: MeasurementKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Number of known values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no value is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over known values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(MeasurementKey, f64)> for Measurements {
    fn from_iter<I: IntoIterator<Item = (MeasurementKey, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
