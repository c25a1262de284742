//! Read command implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use futures::future::join_all;
use tracing::debug;

use airwave_core::SensorConfig;

use super::MonitoredSensor;
use crate::cli::OutputFormat;
use crate::format::{
    DeviceReport, FormatOptions, format_reports_csv, format_reports_json, format_reports_text,
};
use crate::util::write_output;

/// Arguments for the read command.
pub struct ReadArgs<'a> {
    pub sensors: Vec<SensorConfig>,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_read(args: ReadArgs<'_>) -> Result<()> {
    let ReadArgs {
        sensors,
        timeout,
        format,
        output,
        quiet,
        opts,
    } = args;

    let show_progress = !quiet && matches!(format, OutputFormat::Text);
    if show_progress && sensors.len() > 1 {
        eprintln!("Reading from {} devices...", sensors.len());
    }

    let monitored = sensors
        .iter()
        .map(|config| MonitoredSensor::ble(config, timeout))
        .collect::<Result<Vec<_>>>()?;

    // Each reader owns its own connection, so sessions run in parallel
    let results = join_all(monitored.iter().map(|s| read_one(s))).await;

    let mut reports = Vec::new();
    let mut errors = Vec::new();
    for (sensor, result) in monitored.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => errors.push((sensor, e)),
        }
    }

    if !quiet {
        for (sensor, err) in &errors {
            eprintln!("Error reading {} ({}): {}", sensor.name, sensor.reader.address(), err);
        }
    }

    if reports.is_empty() {
        bail!("Failed to read from any device");
    }

    let content = match format {
        OutputFormat::Json => format_reports_json(&reports, opts)?,
        OutputFormat::Text => format_reports_text(&reports, opts),
        OutputFormat::Csv => format_reports_csv(&reports, opts),
    };

    write_output(output, &content)
}

/// Poll one sensor once. The reader is fresh, so it is never throttled.
async fn read_one(sensor: &MonitoredSensor) -> Result<DeviceReport> {
    let outcome = sensor.reader.update().await?;
    debug!("{}: {:?}", sensor.name, outcome);
    Ok(sensor.report().await)
}
