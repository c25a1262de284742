//! Watch command implementation.
//!
//! Polls every sensor through its entities, the way a host would. Each
//! reader's own throttle decides whether a tick opens a new session, so a
//! tick shorter than a sensor's interval simply reprints nothing for it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use owo_colors::OwoColorize;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use airwave_core::SensorConfig;

use super::MonitoredSensor;
use crate::cli::OutputFormat;
use crate::format::{FormatOptions, csv_header, format_reports_csv, format_watch_line};
use crate::util::append_output;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub sensors: Vec<SensorConfig>,
    pub interval: Option<u64>,
    pub count: u32,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        mut sensors,
        interval,
        count,
        timeout,
        format,
        output,
        opts,
    } = args;

    if let Some(secs) = interval {
        for sensor in &mut sensors {
            sensor.min_update_interval = secs;
        }
    }
    let tick = sensors
        .iter()
        .map(SensorConfig::interval)
        .min()
        .unwrap_or(Duration::from_secs(airwave_core::config::DEFAULT_MIN_UPDATE_INTERVAL_SECS));

    let monitored = sensors
        .iter()
        .map(|config| MonitoredSensor::ble(config, timeout))
        .collect::<Result<Vec<_>>>()?;

    print_banner(&monitored, tick, count, opts);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    let mut printed: Vec<Option<OffsetDateTime>> = vec![None; monitored.len()];
    let mut header_written = opts.no_header;
    let mut polls: u32 = 0;

    loop {
        join_all(monitored.iter().map(|s| update_entities(s))).await;
        polls += 1;

        for (sensor, last_printed) in monitored.iter().zip(printed.iter_mut()) {
            let updated = sensor.reader.last_updated().await;
            if updated.is_none() || updated == *last_printed {
                continue;
            }
            *last_printed = updated;

            let report = sensor.report().await;
            let content = match format {
                OutputFormat::Json => opts.as_json(&report)?,
                OutputFormat::Csv => {
                    let mut out = String::new();
                    if !header_written {
                        out.push_str(csv_header());
                        header_written = true;
                    }
                    out.push_str(&format_reports_csv(
                        std::slice::from_ref(&report),
                        &opts.with_no_header(true),
                    ));
                    out
                }
                OutputFormat::Text => format_watch_line(&report, opts),
            };
            append_output(output, &content)?;
        }

        if count > 0 && polls >= count {
            eprintln!("Completed {} polls.", polls);
            return Ok(());
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = tokio::time::sleep(tick) => {}
        }
    }
}

async fn update_entities(sensor: &MonitoredSensor) {
    // Entities share one reader; only the first update opens a session
    for entity in &sensor.entities {
        entity.update().await;
    }
}

fn print_banner(sensors: &[MonitoredSensor], tick: Duration, count: u32, opts: &FormatOptions) {
    for sensor in sensors {
        let header = if opts.no_color {
            format!("Watching: {} ({})", sensor.name, sensor.reader.address())
        } else {
            format!(
                "Watching: {} ({})",
                sensor.name.green(),
                sensor.reader.address().cyan()
            )
        };
        eprintln!("{}", header);
    }
    if count > 0 {
        eprintln!(
            "Interval: {}s | Count: {} | Press Ctrl+C to stop",
            tick.as_secs(),
            count
        );
    } else {
        eprintln!("Interval: {}s | Press Ctrl+C to stop", tick.as_secs());
    }
    eprintln!("{}", "-".repeat(50));
}
