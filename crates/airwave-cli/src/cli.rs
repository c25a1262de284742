//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use airwave_types::{UnitSystem, WaveModel};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Reusable device selection arguments
#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Device address or configured sensor name, or use AIRWAVE_DEVICE env var.
    /// Without it, every sensor in the config file is used.
    #[arg(short, long, env = "AIRWAVE_DEVICE")]
    pub device: Option<String>,

    /// Hardware model (wave, wave_plus); overrides the config file
    #[arg(short, long)]
    pub model: Option<WaveModel>,

    /// Read timeout in seconds
    #[arg(short = 'T', long, default_value = "10")]
    pub timeout: u64,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Report °F, inHg and pCi/L (overrides --metric and config)
    #[arg(long, conflicts_with = "metric")]
    pub imperial: bool,

    /// Report °C, hPa and Bq/m³ (overrides config)
    #[arg(long, conflicts_with = "imperial")]
    pub metric: bool,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

impl OutputArgs {
    /// Resolve the unit system: explicit flags override the configured one.
    pub fn resolve_unit_system(&self, configured: UnitSystem) -> UnitSystem {
        if self.imperial {
            UnitSystem::Imperial
        } else if self.metric {
            UnitSystem::Metric
        } else {
            configured
        }
    }

    /// Unit system forced by a flag, if any.
    pub fn unit_override(&self) -> Option<UnitSystem> {
        if self.imperial {
            Some(UnitSystem::Imperial)
        } else if self.metric {
            Some(UnitSystem::Metric)
        } else {
            None
        }
    }
}

#[derive(Parser)]
#[command(name = "airwave")]
#[command(author, version, about = "CLI for Airthings Wave indoor air quality sensors", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output (any non-false NO_COLOR value also disables it)
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Use this config file instead of the default location
    #[arg(short, long, global = true, env = "AIRWAVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for nearby Airthings devices
    Scan {
        /// Scan timeout in seconds
        #[arg(short, long, default_value = "10")]
        timeout: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// List every BLE device, not just Airthings
        #[arg(long)]
        all: bool,

        /// Omit header row in CSV output (useful for appending)
        #[arg(long)]
        no_header: bool,
    },

    /// Read current sensor values once
    Read {
        #[command(flatten)]
        device: DeviceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Continuously poll sensors
    Watch {
        #[command(flatten)]
        device: DeviceArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Polling interval in seconds (defaults to each sensor's min_update_interval)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<u64>,

        /// Number of polls before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show configuration file path
    Path,

    /// Show current configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse an interval in seconds with the same bounds as the config file.
fn parse_interval(s: &str) -> Result<u64, String> {
    use airwave_core::config::{MAX_UPDATE_INTERVAL_SECS, MIN_UPDATE_INTERVAL_SECS};

    let secs: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (MIN_UPDATE_INTERVAL_SECS..=MAX_UPDATE_INTERVAL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "Invalid interval '{}'. Valid range: {}-{} seconds",
            secs, MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS
        ))
    }
}
