//! Configuration file management.
//!
//! ```toml
//! unit_system = "metric"
//!
//! [[sensors]]
//! mac = "AA:BB:CC:DD:EE:FF"
//! model = "wave_plus"
//! name = "Living room"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use airwave_core::util::addresses_match;
use airwave_core::{SensorConfig, ValidationError};
use airwave_types::{UnitSystem, WaveModel};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Unit system for sensors given only on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_system: Option<UnitSystem>,

    /// Read timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Configured sensors
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airwave")
            .join("config.toml")
    }

    /// Resolve the config path, honoring an explicit override.
    pub fn path(override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path)
    }

    /// Load config from file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        let errors = config.validate();
        if !errors.is_empty() {
            bail!(
                "Invalid config {}:\n{}",
                path.display(),
                format_validation_errors(&errors)
            );
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// An example config with one sensor.
    pub fn example() -> Self {
        Self {
            no_color: false,
            unit_system: Some(UnitSystem::Metric),
            timeout: None,
            sensors: vec![SensorConfig::new("AA:BB:CC:DD:EE:FF").name("Living room")],
        }
    }

    /// Collect every problem in the file.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (i, sensor) in self.sensors.iter().enumerate() {
            let prefix = format!("sensors[{}]", i);
            errors.extend(sensor.validate(&prefix));

            let key = airwave_core::util::normalize_address(&sensor.mac).to_lowercase();
            if !seen.insert(key) {
                errors.push(ValidationError {
                    field: format!("{}.mac", prefix),
                    message: format!("duplicate device address '{}'", sensor.mac),
                });
            }
        }

        if self.timeout == Some(0) {
            errors.push(ValidationError {
                field: "timeout".to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        errors
    }

    /// Find a configured sensor by address or name.
    pub fn find_sensor(&self, device: &str) -> Option<&SensorConfig> {
        self.sensors.iter().find(|s| {
            addresses_match(&s.mac, device)
                || s.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(device))
        })
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Work out which sensors a command should poll.
///
/// An explicit device selects the matching configured sensor, or an ad-hoc
/// one with default settings. Without a device every configured sensor is
/// used. Command-line model and unit flags override the file.
pub fn resolve_sensors(
    device: Option<&str>,
    model: Option<WaveModel>,
    units: Option<UnitSystem>,
    config: &Config,
) -> Result<Vec<SensorConfig>> {
    let mut sensors = match device {
        Some(device) => {
            let sensor = match config.find_sensor(device) {
                Some(found) => found.clone(),
                None => SensorConfig::new(device)
                    .unit_system(config.unit_system.unwrap_or_default()),
            };
            vec![sensor]
        }
        None if config.sensors.is_empty() => bail!(
            "No device specified. Use --device <ADDRESS>, set AIRWAVE_DEVICE, \
             or add [[sensors]] to the config file.\n\
             Run 'airwave scan' to find nearby devices."
        ),
        None => config.sensors.clone(),
    };

    for sensor in &mut sensors {
        if let Some(model) = model {
            sensor.model = model;
        }
        if let Some(units) = units {
            sensor.unit_system = units;
        }
    }

    for sensor in &sensors {
        sensor
            .check()
            .with_context(|| format!("Sensor '{}'", sensor.display_name()))?;
    }
    Ok(sensors)
}

/// Resolve the read timeout: an explicit flag wins, then the config file.
pub fn resolve_timeout(cmd_timeout: u64, config: &Config, default: u64) -> u64 {
    if cmd_timeout != default {
        cmd_timeout
    } else {
        config.timeout.unwrap_or(default)
    }
}
