//! Display units and conversions.
//!
//! Decoded values are kept in the device's native units: °C, hPa, and radon
//! in pCi/L (Wave) or Bq/m³ (Wave Plus). Conversions happen only when a
//! value is presented in a particular [`UnitSystem`].

use crate::decode::RADON_BQ_PER_PCI;
use crate::types::{MeasurementKey, UnitSystem, WaveModel};

/// hPa to inches of mercury.
const INHG_PER_HPA: f64 = 0.029_529_983;

/// Unit label for a measurement in the given system.
///
/// ```
/// use airwave_types::{MeasurementKey, UnitSystem, unit_of_measurement};
///
/// assert_eq!(unit_of_measurement(MeasurementKey::Temperature, UnitSystem::Metric), "°C");
/// assert_eq!(unit_of_measurement(MeasurementKey::Temperature, UnitSystem::Imperial), "°F");
/// ```
#[must_use]
pub fn unit_of_measurement(key: MeasurementKey, system: UnitSystem) -> &'static str {
    match (key, system) {
        (MeasurementKey::Humidity, _) => "%",
        (MeasurementKey::Temperature, UnitSystem::Metric) => "°C",
        (MeasurementKey::Temperature, UnitSystem::Imperial) => "°F",
        (MeasurementKey::Pressure, UnitSystem::Metric) => "hPa",
        (MeasurementKey::Pressure, UnitSystem::Imperial) => "inHg",
        (MeasurementKey::Co2, _) => "ppm",
        (MeasurementKey::Voc, _) => "ppb",
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Metric) => "Bq/m³",
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Imperial) => "pCi/L",
        (MeasurementKey::Light, _) => "lx",
        (MeasurementKey::Vpd, _) => "kPa",
    }
}

/// Convert a stored value decoded from `model` into the given unit system.
///
/// Wave radon is stored in pCi/L already rounded to two decimals, so its
/// metric value is reconstructed from the rounded figure and is not exact:
/// a raw word of 100 is stored as 2.70 and shown as 99.9 Bq/m³.
#[must_use]
pub fn convert_for_display(
    key: MeasurementKey,
    model: WaveModel,
    value: f64,
    system: UnitSystem,
) -> f64 {
    match (key, system) {
        (MeasurementKey::Temperature, UnitSystem::Imperial) => celsius_to_fahrenheit(value),
        (MeasurementKey::Pressure, UnitSystem::Imperial) => value * INHG_PER_HPA,
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Metric)
            if model.radon_in_pci() =>
        {
            value * RADON_BQ_PER_PCI
        }
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Imperial)
            if !model.radon_in_pci() =>
        {
            value / RADON_BQ_PER_PCI
        }
        _ => value,
    }
}

/// Convert °C to °F.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}
