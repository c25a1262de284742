//! Command implementations for the CLI.

mod config;
mod read;
mod scan;
mod watch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use airwave_core::{
    BleTransport, ConnectionConfig, SensorConfig, SensorEntity, WaveReader,
    setup_platform_with_timeout,
};

use crate::format::DeviceReport;

pub use config::cmd_config;
pub use read::{ReadArgs, cmd_read};
pub use scan::cmd_scan;
pub use watch::{WatchArgs, cmd_watch};

/// A configured sensor with its reader and registered entities.
pub struct MonitoredSensor {
    pub name: String,
    pub reader: Arc<WaveReader>,
    pub entities: Vec<SensorEntity>,
}

impl MonitoredSensor {
    /// Set up the platform for one sensor over Bluetooth.
    pub fn ble(config: &SensorConfig, timeout: Duration) -> Result<Self> {
        let transport =
            BleTransport::with_config(ConnectionConfig::default().read_timeout(timeout));
        let mut entities = Vec::new();
        let reader = setup_platform_with_timeout(config, transport, timeout, &mut entities)
            .with_context(|| format!("Failed to set up '{}'", config.display_name()))?;
        Ok(Self {
            name: config.display_name().to_string(),
            reader,
            entities,
        })
    }

    /// Snapshot the entities for output.
    pub async fn report(&self) -> DeviceReport {
        DeviceReport::collect(&self.name, &self.reader, &self.entities).await
    }
}
