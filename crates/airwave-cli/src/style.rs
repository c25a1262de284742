//! Visual styling utilities for the CLI.
//!
//! Color thresholds and helpers that color a sensor state according to
//! indoor air quality guidelines.

use owo_colors::OwoColorize;

use airwave_core::SensorState;
use airwave_types::{MeasurementKey, UnitSystem};

// ============================================================================
// Color Thresholds
// ============================================================================

/// CO2 thresholds (ppm) based on indoor air quality guidelines.
pub mod co2 {
    pub const GOOD: f64 = 800.0; // Green: < 800 ppm
    pub const MODERATE: f64 = 1000.0; // Yellow: 800-1000 ppm
    // Red: > 1000 ppm
}

/// Radon thresholds (Bq/m³).
pub mod radon {
    pub const GOOD: f64 = 100.0; // Green: < 100 Bq/m³
    pub const MODERATE: f64 = 150.0; // Yellow: 100-150 Bq/m³
    // Red: > 150 Bq/m³
}

/// VOC thresholds (ppb).
pub mod voc {
    pub const GOOD: f64 = 250.0;
    pub const MODERATE: f64 = 2000.0;
}

/// Rough air quality level of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Good,
    Moderate,
    Poor,
}

fn level(value: f64, good: f64, moderate: f64) -> Level {
    if value < good {
        Level::Good
    } else if value < moderate {
        Level::Moderate
    } else {
        Level::Poor
    }
}

/// Classify a displayed value, if the key has thresholds.
pub fn level_for(key: MeasurementKey, value: f64, units: UnitSystem) -> Option<Level> {
    match key {
        MeasurementKey::Co2 => Some(level(value, co2::GOOD, co2::MODERATE)),
        MeasurementKey::Voc => Some(level(value, voc::GOOD, voc::MODERATE)),
        MeasurementKey::ShortRadon | MeasurementKey::LongRadon => {
            let bq = match units {
                UnitSystem::Metric => value,
                UnitSystem::Imperial => value * airwave_types::decode::RADON_BQ_PER_PCI,
            };
            Some(level(bq, radon::GOOD, radon::MODERATE))
        }
        _ => None,
    }
}

/// Decimal places used when displaying a key.
pub fn precision(key: MeasurementKey, units: UnitSystem) -> usize {
    match (key, units) {
        (MeasurementKey::Co2 | MeasurementKey::Voc | MeasurementKey::Light, _) => 0,
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Metric) => 0,
        (MeasurementKey::ShortRadon | MeasurementKey::LongRadon, UnitSystem::Imperial) => 2,
        (MeasurementKey::Pressure, UnitSystem::Imperial) => 2,
        (MeasurementKey::Vpd, _) => 3,
        _ => 1,
    }
}

/// Render a state as plain text with the key's precision.
pub fn format_state(key: MeasurementKey, state: SensorState, units: UnitSystem) -> String {
    match state {
        SensorState::Known(v) => format!("{:.*}", precision(key, units), v),
        SensorState::Unknown => "unknown".to_string(),
    }
}

/// Render a state, colored by its level unless colors are disabled.
pub fn format_state_colored(
    key: MeasurementKey,
    state: SensorState,
    units: UnitSystem,
    no_color: bool,
) -> String {
    let text = format_state(key, state, units);
    if no_color {
        return text;
    }
    match state {
        SensorState::Unknown => format!("{}", text.dimmed()),
        SensorState::Known(v) => match level_for(key, v, units) {
            Some(Level::Good) => format!("{}", text.green()),
            Some(Level::Moderate) => format!("{}", text.yellow()),
            Some(Level::Poor) => format!("{}", text.red()),
            None => text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co2_levels() {
        let units = UnitSystem::Metric;
        assert_eq!(level_for(MeasurementKey::Co2, 650.0, units), Some(Level::Good));
        assert_eq!(level_for(MeasurementKey::Co2, 900.0, units), Some(Level::Moderate));
        assert_eq!(level_for(MeasurementKey::Co2, 1200.0, units), Some(Level::Poor));
        assert_eq!(level_for(MeasurementKey::Humidity, 40.0, units), None);
    }

    #[test]
    fn test_radon_levels_respect_units() {
        assert_eq!(
            level_for(MeasurementKey::ShortRadon, 120.0, UnitSystem::Metric),
            Some(Level::Moderate)
        );
        // 4.0 pCi/L is 148 Bq/m³
        assert_eq!(
            level_for(MeasurementKey::LongRadon, 4.0, UnitSystem::Imperial),
            Some(Level::Moderate)
        );
        assert_eq!(
            level_for(MeasurementKey::LongRadon, 1.0, UnitSystem::Imperial),
            Some(Level::Good)
        );
    }

    #[test]
    fn test_format_state_precision() {
        let units = UnitSystem::Metric;
        assert_eq!(
            format_state(MeasurementKey::Temperature, SensorState::Known(21.456), units),
            "21.5"
        );
        assert_eq!(
            format_state(MeasurementKey::Co2, SensorState::Known(650.0), units),
            "650"
        );
        assert_eq!(
            format_state(MeasurementKey::Vpd, SensorState::Unknown, units),
            "unknown"
        );
        assert_eq!(
            format_state(
                MeasurementKey::ShortRadon,
                SensorState::Known(2.7),
                UnitSystem::Imperial
            ),
            "2.70"
        );
    }

    #[test]
    fn test_no_color_is_plain() {
        let text = format_state_colored(
            MeasurementKey::Co2,
            SensorState::Known(1500.0),
            UnitSystem::Metric,
            true,
        );
        assert_eq!(text, "1500");
    }
}
