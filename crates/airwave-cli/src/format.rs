//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use airwave_core::{DiscoveredDevice, SensorEntity, SensorState, WaveReader};
use airwave_types::{MeasurementKey, UnitSystem, WaveModel};

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            ..Default::default()
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize to JSON honoring the compact flag, with a trailing newline.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Escape a CSV field.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn format_timestamp(at: Option<OffsetDateTime>) -> Option<String> {
    at.and_then(|t| t.format(&Rfc3339).ok())
}

// ============================================================================
// Readings
// ============================================================================

/// One entity's state at the time of formatting.
#[derive(Debug, Clone, Serialize)]
pub struct EntityValue {
    pub key: MeasurementKey,
    pub name: String,
    pub unique_id: String,
    pub state: SensorState,
    pub unit: &'static str,
}

/// Everything printed for one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub name: String,
    pub address: String,
    pub model: WaveModel,
    pub unit_system: UnitSystem,
    pub updated_at: Option<String>,
    pub values: Vec<EntityValue>,
}

impl DeviceReport {
    /// Snapshot a reader through its entities.
    pub async fn collect(name: &str, reader: &WaveReader, entities: &[SensorEntity]) -> Self {
        let mut values = Vec::with_capacity(entities.len());
        for entity in entities {
            values.push(EntityValue {
                key: entity.key(),
                name: entity.name(),
                unique_id: entity.unique_id(),
                state: entity.state().await,
                unit: entity.unit_of_measurement(),
            });
        }
        Self {
            name: name.to_string(),
            address: reader.address().to_string(),
            model: reader.model(),
            unit_system: entities
                .first()
                .map(SensorEntity::unit_system)
                .unwrap_or_default(),
            updated_at: format_timestamp(reader.last_updated().await),
            values,
        }
    }
}

/// Multi-line text for one device.
#[must_use]
pub fn format_report_text(report: &DeviceReport, opts: &FormatOptions) -> String {
    let title = if opts.no_color {
        report.name.clone()
    } else {
        format!("{}", report.name.bold())
    };
    let mut output = format!("{} ({}) [{}]\n", title, report.address, report.model);

    for value in &report.values {
        let label = airwave_core::description_for(value.key).name;
        let state =
            style::format_state_colored(value.key, value.state, report.unit_system, opts.no_color);
        let unit = if value.state == SensorState::Unknown {
            ""
        } else {
            value.unit
        };
        // Pad on the uncolored width so ANSI codes don't skew alignment
        let plain = style::format_state(value.key, value.state, report.unit_system);
        let pad = 10usize.saturating_sub(plain.chars().count());
        output.push_str(&format!(
            "  {:<24}{}{} {}\n",
            label,
            " ".repeat(pad),
            state,
            unit
        ));
    }

    match &report.updated_at {
        Some(at) => output.push_str(&format!("  Updated: {}\n", at)),
        None => output.push_str("  Updated: never\n"),
    }
    output
}

/// Text for several devices, separated by blank lines.
#[must_use]
pub fn format_reports_text(reports: &[DeviceReport], opts: &FormatOptions) -> String {
    reports
        .iter()
        .map(|r| format_report_text(r, opts))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_reports_json(reports: &[DeviceReport], opts: &FormatOptions) -> Result<String> {
    match reports {
        [single] => opts.as_json(single),
        many => opts.as_json(&many),
    }
}

#[must_use]
pub fn csv_header() -> &'static str {
    "timestamp,device,address,key,value,unit\n"
}

/// One CSV row per entity.
#[must_use]
pub fn format_reports_csv(reports: &[DeviceReport], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        csv_header().to_string()
    };
    for report in reports {
        let timestamp = report.updated_at.as_deref().unwrap_or("");
        for value in &report.values {
            let state = match value.state {
                SensorState::Known(_) => {
                    style::format_state(value.key, value.state, report.unit_system)
                }
                SensorState::Unknown => String::new(),
            };
            output.push_str(&format!(
                "{},{},{},{},{},{}\n",
                timestamp,
                csv_escape(&report.name),
                csv_escape(&report.address),
                value.key,
                state,
                value.unit
            ));
        }
    }
    output
}

/// Compact single-line text used by `watch`.
#[must_use]
pub fn format_watch_line(report: &DeviceReport, opts: &FormatOptions) -> String {
    let parts: Vec<String> = report
        .values
        .iter()
        .map(|v| {
            let state =
                style::format_state_colored(v.key, v.state, report.unit_system, opts.no_color);
            match v.state {
                SensorState::Known(_) => format!("{} {}{}", v.key, state, v.unit),
                SensorState::Unknown => format!("{} {}", v.key, state),
            }
        })
        .collect();
    let at = report.updated_at.as_deref().unwrap_or("never");
    format!("[{}] {}: {}\n", at, report.name, parts.join(" | "))
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_json(devices: &[DiscoveredDevice], opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct ScanResult<'a> {
        count: usize,
        devices: Vec<DeviceJson<'a>>,
    }

    #[derive(Serialize)]
    struct DeviceJson<'a> {
        name: Option<&'a str>,
        address: &'a str,
        identifier: &'a str,
        rssi: Option<i16>,
        serial: Option<u32>,
        is_airthings: bool,
    }

    let result = ScanResult {
        count: devices.len(),
        devices: devices
            .iter()
            .map(|d| DeviceJson {
                name: d.name.as_deref(),
                address: &d.address,
                identifier: &d.identifier,
                rssi: d.rssi,
                serial: d.serial,
                is_airthings: d.is_airthings,
            })
            .collect(),
    };

    opts.as_json(&result)
}

#[must_use]
pub fn format_scan_text(devices: &[DiscoveredDevice], opts: &FormatOptions) -> String {
    if devices.is_empty() {
        return "No Airthings devices found.\n".to_string();
    }

    let count = if opts.no_color {
        devices.len().to_string()
    } else {
        format!("{}", devices.len().to_string().green().bold())
    };
    let mut output = format!("Found {} device(s)\n\n", count);
    output.push_str(&format!(
        "{:<24} {:<38} {:>10} {:>8}\n",
        "Name", "Identifier", "Serial", "RSSI"
    ));
    for device in devices {
        output.push_str(&format!(
            "{:<24} {:<38} {:>10} {:>8}\n",
            device.name.as_deref().unwrap_or("Unknown"),
            device.identifier,
            device.serial.map(|s| s.to_string()).unwrap_or_default(),
            device
                .rssi
                .map(|r| format!("{} dBm", r))
                .unwrap_or_else(|| "N/A".to_string()),
        ));
    }
    output
}

#[must_use]
pub fn format_scan_csv(devices: &[DiscoveredDevice], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "name,address,identifier,rssi,serial\n".to_string()
    };
    for device in devices {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_escape(device.name.as_deref().unwrap_or("")),
            csv_escape(&device.address),
            csv_escape(&device.identifier),
            device.rssi.map(|r| r.to_string()).unwrap_or_default(),
            device.serial.map(|s| s.to_string()).unwrap_or_default(),
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DeviceReport {
        DeviceReport {
            name: "Bedroom".to_string(),
            address: "AA:BB:CC:DD:EE:FF".to_string(),
            model: WaveModel::Wave,
            unit_system: UnitSystem::Metric,
            updated_at: Some("2026-10-16T08:00:00Z".to_string()),
            values: vec![
                EntityValue {
                    key: MeasurementKey::Humidity,
                    name: "Airthings Wave Humidity".to_string(),
                    unique_id: "AA:BB:CC:DD:EE:FF-Humidity".to_string(),
                    state: SensorState::Known(45.0),
                    unit: "%",
                },
                EntityValue {
                    key: MeasurementKey::ShortRadon,
                    name: "Airthings Wave Radon 1-day avg".to_string(),
                    unique_id: "AA:BB:CC:DD:EE:FF-Radon 1-day avg".to_string(),
                    state: SensorState::Unknown,
                    unit: "Bq/m³",
                },
            ],
        }
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_report_text() {
        let text = format_report_text(&report(), &FormatOptions::new(true));
        assert!(text.starts_with("Bedroom (AA:BB:CC:DD:EE:FF) [Wave]"));
        assert!(text.contains("Humidity"));
        assert!(text.contains("45.0 %"));
        assert!(text.contains("unknown"));
        assert!(text.contains("Updated: 2026-10-16T08:00:00Z"));
    }

    #[test]
    fn test_report_json() {
        let opts = FormatOptions::new(true).with_compact(true);
        let json = format_reports_json(&[report()], &opts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Bedroom");
        assert_eq!(value["model"], "wave");
        assert_eq!(value["values"][0]["key"], "humidity");
        assert_eq!(value["values"][0]["state"], 45.0);
        assert_eq!(value["values"][1]["state"], "unknown");
    }

    #[test]
    fn test_multiple_reports_json_is_array() {
        let opts = FormatOptions::new(true).with_compact(true);
        let json = format_reports_json(&[report(), report()], &opts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_report_csv() {
        let csv = format_reports_csv(&[report()], &FormatOptions::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,device,address,key,value,unit");
        assert_eq!(
            lines[1],
            "2026-10-16T08:00:00Z,Bedroom,AA:BB:CC:DD:EE:FF,humidity,45.0,%"
        );
        assert_eq!(
            lines[2],
            "2026-10-16T08:00:00Z,Bedroom,AA:BB:CC:DD:EE:FF,short_radon,,Bq/m³"
        );

        let no_header = format_reports_csv(&[report()], &FormatOptions::default().with_no_header(true));
        assert_eq!(no_header.lines().count(), 2);
    }

    #[test]
    fn test_watch_line() {
        let line = format_watch_line(&report(), &FormatOptions::new(true));
        assert_eq!(
            line,
            "[2026-10-16T08:00:00Z] Bedroom: humidity 45.0% | short_radon unknown\n"
        );
    }

    #[test]
    fn test_empty_scan_text() {
        assert_eq!(
            format_scan_text(&[], &FormatOptions::default()),
            "No Airthings devices found.\n"
        );
    }
}
