//! Bluetooth transport for Wave devices.
//!
//! [`BleTransport`] implements [`WaveTransport`] on top of btleplug. Each
//! session looks the device up, connects, discovers services, reads the
//! current-values characteristic and disconnects again.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use airwave_types::GattCharacteristic;

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::scan::{ScanOptions, find_device_with_options};
use crate::traits::WaveTransport;

/// Default timeout for BLE characteristic read operations.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE connection operations.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for service discovery.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default scan window used to locate the device before connecting.
const DEFAULT_SCAN_DURATION: Duration = Duration::from_secs(5);

/// Configuration for BLE connection timeouts.
///
/// # Example
///
/// ```
/// use airwave_core::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::default()
///     .connection_timeout(Duration::from_secs(20))
///     .read_timeout(Duration::from_secs(15));
/// assert_eq!(config.read_timeout, Duration::from_secs(15));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing a connection.
    pub connection_timeout: Duration,
    /// Default timeout for characteristic reads.
    pub read_timeout: Duration,
    /// Timeout for service discovery.
    pub discovery_timeout: Duration,
    /// How long to scan for the device before giving up.
    pub scan_duration: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            scan_duration: DEFAULT_SCAN_DURATION,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for challenging RF environments.
    ///
    /// Uses longer timeouts to accommodate thick walls or long distances.
    pub fn challenging_environment() -> Self {
        Self {
            connection_timeout: Duration::from_secs(25),
            read_timeout: Duration::from_secs(15),
            discovery_timeout: Duration::from_secs(15),
            scan_duration: Duration::from_secs(10),
        }
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the service discovery timeout.
    #[must_use]
    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Set the scan duration used to find the device.
    #[must_use]
    pub fn scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }
}

/// An open link to one peripheral.
struct Connection {
    /// Kept alive for the lifetime of the peripheral connection.
    #[allow(dead_code)]
    adapter: Adapter,
    peripheral: Peripheral,
}

/// Transport that talks to a real Wave device over Bluetooth Low Energy.
///
/// A `BleTransport` holds at most one connection. It is normally owned by a
/// [`WaveReader`](crate::WaveReader), which serializes sessions.
pub struct BleTransport {
    connection: Mutex<Option<Connection>>,
    config: ConnectionConfig,
}

impl std::fmt::Debug for BleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BleTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for BleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl BleTransport {
    /// Create a transport with default timeouts.
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::default())
    }

    /// Create a transport with custom timeouts.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self {
            connection: Mutex::new(None),
            config,
        }
    }

    /// Get the current connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Check if a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        let guard = self.connection.lock().await;
        match guard.as_ref() {
            Some(conn) => conn.peripheral.is_connected().await.unwrap_or(false),
            None => false,
        }
    }
}

fn find_characteristic(
    peripheral: &Peripheral,
    characteristic: &GattCharacteristic,
) -> Result<Characteristic> {
    peripheral
        .characteristics()
        .into_iter()
        .find(|c| c.uuid == characteristic.uuid)
        .ok_or_else(|| {
            Error::characteristic_not_found(
                characteristic.uuid.to_string(),
                peripheral.services().len(),
            )
        })
}

#[async_trait]
impl WaveTransport for BleTransport {
    #[tracing::instrument(level = "info", skip(self), fields(connect_timeout = ?self.config.connection_timeout))]
    async fn connect(&self, address: &str) -> Result<()> {
        let mut guard = self.connection.lock().await;
        if let Some(stale) = guard.take() {
            debug!("Dropping previous connection before reconnecting");
            if let Err(e) = stale.peripheral.disconnect().await {
                debug!("Disconnecting previous connection failed: {}", e);
            }
        }

        let options = ScanOptions::default()
            .duration(self.config.scan_duration)
            .all_devices();
        let (adapter, peripheral) = find_device_with_options(address, options).await?;

        // Stored before connecting so a failed attempt is still torn down by disconnect()
        *guard = Some(Connection {
            adapter,
            peripheral: peripheral.clone(),
        });

        info!("Connecting to device...");
        timeout(self.config.connection_timeout, peripheral.connect())
            .await
            .map_err(|_| Error::timeout("connect to device", self.config.connection_timeout))?
            .map_err(|e| {
                Error::connection_failed(
                    Some(address.to_string()),
                    ConnectionFailureReason::Rejected(e.to_string()),
                )
            })?;
        info!("Connected!");

        debug!("Discovering services...");
        timeout(self.config.discovery_timeout, peripheral.discover_services())
            .await
            .map_err(|_| Error::Timeout {
                operation: "discover services".to_string(),
                duration: self.config.discovery_timeout,
            })??;

        let services = peripheral.services();
        debug!("Found {} services", services.len());
        for service in &services {
            debug!("  Service: {}", service.uuid);
        }

        Ok(())
    }

    async fn read_characteristic(
        &self,
        characteristic: GattCharacteristic,
        read_timeout: Duration,
    ) -> Result<Vec<u8>> {
        let guard = self.connection.lock().await;
        let conn = guard.as_ref().ok_or(Error::NotConnected)?;

        let target = find_characteristic(&conn.peripheral, &characteristic)?;
        let data = timeout(read_timeout, conn.peripheral.read(&target))
            .await
            .map_err(|_| Error::Timeout {
                operation: format!("read characteristic {}", characteristic),
                duration: read_timeout,
            })??;

        debug!("Read {} bytes from {}", data.len(), characteristic);
        Ok(data)
    }

    #[tracing::instrument(level = "info", skip(self))]
    async fn disconnect(&self) -> Result<()> {
        let Some(conn) = self.connection.lock().await.take() else {
            return Ok(());
        };

        info!("Disconnecting from device...");
        if let Err(e) = conn.peripheral.disconnect().await {
            warn!("Disconnect failed: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}
