//! Command-line interface for Airthings Wave indoor air quality sensors.
//!
//! The CLI drives the same platform the library exposes to a home
//! automation host: every configured sensor gets a reader and one entity
//! per measurement, and polls go through the reader's throttle.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan for nearby Airthings devices |
//! | `read` | Read current sensor values once |
//! | `watch` | Continuously poll sensors |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): Human-readable colored output
//! - **JSON**: Machine-readable JSON format
//! - **CSV**: One row per measurement, for spreadsheets and data analysis
//!
//! # Configuration
//!
//! The CLI reads `~/.config/airwave/config.toml` (or platform equivalent),
//! or the file given with `--config`:
//!
//! ```toml
//! unit_system = "metric"
//!
//! [[sensors]]
//! mac = "AA:BB:CC:DD:EE:FF"
//! model = "wave_plus"
//! min_update_interval = 300
//! name = "Living room"
//! ```
//!
//! # Environment Variables
//!
//! - `AIRWAVE_DEVICE`: Default device address (overridden by `--device` flag)
//! - `AIRWAVE_CONFIG`: Config file path (overridden by `--config` flag)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--quiet` nor `--verbose` is given
//!
//! # Examples
//!
//! ```bash
//! airwave scan
//! airwave read --device AA:BB:CC:DD:EE:FF --model wave --imperial
//! airwave watch --interval 60 --format csv --output readings.csv
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod style;
pub mod util;

// Re-export core types for convenience
pub use airwave_core;
pub use airwave_types;
