//! Platform configuration for one Wave sensor.
//!
//! ```toml
//! mac = "AA:BB:CC:DD:EE:FF"
//! model = "wave_plus"
//! unit_system = "metric"
//! min_update_interval = 300
//! name = "Bedroom"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use airwave_types::{UnitSystem, WaveModel};

use crate::error::{Error, Result};
use crate::util::is_valid_address;

/// Default seconds between polls.
pub const DEFAULT_MIN_UPDATE_INTERVAL_SECS: u64 = 300;

/// Smallest accepted poll interval in seconds.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 10;

/// Largest accepted poll interval in seconds (one day).
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 86_400;

fn default_min_update_interval() -> u64 {
    DEFAULT_MIN_UPDATE_INTERVAL_SECS
}

/// Configuration of one sensor platform instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Hardware address of the device (`AA:BB:CC:DD:EE:FF`).
    pub mac: String,
    /// Hardware revision.
    #[serde(default)]
    pub model: WaveModel,
    /// Unit system used for reported states.
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Minimum seconds between two polls of the device.
    #[serde(default = "default_min_update_interval")]
    pub min_update_interval: u64,
    /// Optional friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `mac` or `sensors[0].mac`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl SensorConfig {
    /// Create a config with default model, units and interval.
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            model: WaveModel::default(),
            unit_system: UnitSystem::default(),
            min_update_interval: DEFAULT_MIN_UPDATE_INTERVAL_SECS,
            name: None,
        }
    }

    #[must_use]
    pub fn model(mut self, model: WaveModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }

    #[must_use]
    pub fn min_update_interval(mut self, secs: u64) -> Self {
        self.min_update_interval = secs;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.min_update_interval)
    }

    /// Friendly name, falling back to the address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.mac)
    }

    /// Collect every problem with this config, with field paths under `prefix`.
    ///
    /// An empty prefix yields bare field names.
    pub fn validate(&self, prefix: &str) -> Vec<ValidationError> {
        let field = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            }
        };
        let mut errors = Vec::new();

        if self.mac.trim().is_empty() {
            errors.push(ValidationError {
                field: field("mac"),
                message: "device address cannot be empty".to_string(),
            });
        } else if !is_valid_address(self.mac.trim()) {
            errors.push(ValidationError {
                field: field("mac"),
                message: format!(
                    "invalid address '{}': expected format 'AA:BB:CC:DD:EE:FF'",
                    self.mac
                ),
            });
        }

        if !(MIN_UPDATE_INTERVAL_SECS..=MAX_UPDATE_INTERVAL_SECS)
            .contains(&self.min_update_interval)
        {
            errors.push(ValidationError {
                field: field("min_update_interval"),
                message: format!(
                    "interval {} is out of range ({}-{} seconds)",
                    self.min_update_interval, MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS
                ),
            });
        }

        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            errors.push(ValidationError {
                field: field("name"),
                message: "name cannot be blank when set".to_string(),
            });
        }

        errors
    }

    /// Validate and convert the problems into an [`Error::InvalidConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] listing every problem found.
    pub fn check(&self) -> Result<()> {
        let errors = self.validate("");
        if errors.is_empty() {
            return Ok(());
        }
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::invalid_config(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config: SensorConfig = serde_json::from_str(r#"{"mac":"AA:BB:CC:DD:EE:FF"}"#).unwrap();
        assert_eq!(config.model, WaveModel::WavePlus);
        assert_eq!(config.unit_system, UnitSystem::Metric);
        assert_eq!(config.min_update_interval, 300);
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert!(config.name.is_none());
        assert_eq!(config.display_name(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_full_config_parses() {
        let config: SensorConfig = serde_json::from_str(
            r#"{"mac":"aa:bb:cc:dd:ee:ff","model":"wave","unit_system":"imperial","min_update_interval":60,"name":"Cellar"}"#,
        )
        .unwrap();
        assert_eq!(config.model, WaveModel::Wave);
        assert_eq!(config.unit_system, UnitSystem::Imperial);
        assert_eq!(config.display_name(), "Cellar");
        assert!(config.validate("").is_empty());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_missing_mac_is_rejected() {
        let result: std::result::Result<SensorConfig, _> =
            serde_json::from_str(r#"{"model":"wave"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_mac() {
        let errors = SensorConfig::new("kitchen").validate("");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "mac");
        assert!(errors[0].message.contains("kitchen"));

        let errors = SensorConfig::new("  ").validate("sensors[2]");
        assert_eq!(errors[0].field, "sensors[2].mac");
        assert!(errors[0].message.contains("empty"));
    }

    #[test]
    fn test_interval_bounds() {
        assert!(SensorConfig::new("AA:BB:CC:DD:EE:FF")
            .min_update_interval(10)
            .validate("")
            .is_empty());
        let errors = SensorConfig::new("AA:BB:CC:DD:EE:FF")
            .min_update_interval(0)
            .validate("");
        assert_eq!(errors[0].field, "min_update_interval");
        assert!(SensorConfig::new("AA:BB:CC:DD:EE:FF")
            .min_update_interval(86_401)
            .check()
            .is_err());
    }

    #[test]
    fn test_check_reports_all_problems() {
        let err = SensorConfig::new("nope")
            .min_update_interval(1)
            .name(" ")
            .check()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid configuration"));
        assert!(msg.contains("mac"));
        assert!(msg.contains("min_update_interval"));
        assert!(msg.contains("name"));
    }

    #[test]
    fn test_accepts_platform_uuid() {
        let config = SensorConfig::new("6E400001-B5A3-F393-E0A9-E50E24DCCA9E");
        assert!(config.check().is_ok());
    }
}
