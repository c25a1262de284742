//! Device discovery and scanning.
//!
//! This module provides functionality to scan for Airthings Wave devices
//! and to locate a configured device by its hardware address.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::util::{addresses_match, create_identifier, format_peripheral_id};
use airwave_types::uuid::{MANUFACTURER_ID, WAVE_PLUS_SERVICE};

/// Number of scan attempts made when looking for a specific device.
const FIND_ATTEMPTS: u32 = 3;

/// Information about a discovered Wave device.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// The advertised device name, if any.
    pub name: Option<String>,
    /// The peripheral ID for connecting.
    pub id: PeripheralId,
    /// The BLE address as a string (may be zeros on macOS, use `identifier` instead).
    pub address: String,
    /// A connection identifier (peripheral ID on macOS, address on other platforms).
    pub identifier: String,
    /// RSSI signal strength.
    pub rssi: Option<i16>,
    /// Whether the advertisement looks like an Airthings device.
    pub is_airthings: bool,
    /// Serial number from the manufacturer data, if advertised.
    pub serial: Option<u32>,
}

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan for devices.
    pub duration: Duration,
    /// Only return devices that appear to be Airthings devices.
    pub filter_airthings_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            filter_airthings_only: true,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set scan duration in seconds.
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration = Duration::from_secs(secs);
        self
    }

    /// Scan for all BLE devices, not just Airthings.
    pub fn all_devices(mut self) -> Self {
        self.filter_airthings_only = false;
        self
    }
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Scan for Wave devices in range.
///
/// An empty list indicates no devices were found (not an error).
///
/// # Errors
///
/// Returns an error if no Bluetooth adapter is available or the scan could
/// not be started or stopped.
pub async fn scan_for_devices() -> Result<Vec<DiscoveredDevice>> {
    scan_with_options(ScanOptions::default()).await
}

/// Scan for devices with custom options.
pub async fn scan_with_options(options: ScanOptions) -> Result<Vec<DiscoveredDevice>> {
    let adapter = get_adapter().await?;
    scan_with_adapter(&adapter, options).await
}

/// Scan for devices using a specific adapter.
pub async fn scan_with_adapter(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<Vec<DiscoveredDevice>> {
    info!(
        "Starting BLE scan for {} seconds...",
        options.duration.as_secs()
    );

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let peripherals = adapter.peripherals().await?;
    let mut discovered = Vec::new();

    for peripheral in peripherals {
        match process_peripheral(&peripheral, options.filter_airthings_only).await {
            Ok(Some(device)) => {
                info!("Found device: {:?} ({})", device.name, device.identifier);
                discovered.push(device);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Error processing peripheral: {}", e);
            }
        }
    }

    info!("Scan complete. Found {} device(s)", discovered.len());
    Ok(discovered)
}

async fn process_peripheral(
    peripheral: &Peripheral,
    filter_airthings_only: bool,
) -> Result<Option<DiscoveredDevice>> {
    let Some(properties) = peripheral.properties().await? else {
        return Ok(None);
    };

    let is_airthings = is_airthings_device(&properties);
    if filter_airthings_only && !is_airthings {
        return Ok(None);
    }

    let id = peripheral.id();
    let address = properties.address.to_string();
    let identifier = create_identifier(&address, &id);
    let serial = properties
        .manufacturer_data
        .get(&MANUFACTURER_ID)
        .and_then(|data| parse_serial(data));

    Ok(Some(DiscoveredDevice {
        name: properties.local_name.clone(),
        id,
        address,
        identifier,
        rssi: properties.rssi,
        is_airthings,
        serial,
    }))
}

/// Serial number carried in the first four bytes of Airthings manufacturer data.
fn parse_serial(data: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

fn is_airthings_device(properties: &PeripheralProperties) -> bool {
    if properties.manufacturer_data.contains_key(&MANUFACTURER_ID) {
        return true;
    }

    if properties.services.contains(&WAVE_PLUS_SERVICE)
        || properties.service_data.contains_key(&WAVE_PLUS_SERVICE)
    {
        return true;
    }

    properties
        .local_name
        .as_ref()
        .is_some_and(|name| name.to_lowercase().contains("airthings"))
}

/// Find a specific device by address.
pub async fn find_device(address: &str) -> Result<(Adapter, Peripheral)> {
    find_device_with_options(address, ScanOptions::default()).await
}

/// Find a specific device by address with custom options.
///
/// First checks peripherals already known to the adapter, then performs up to
/// three scans of increasing length, since advertisements are easily missed.
pub async fn find_device_with_options(
    address: &str,
    options: ScanOptions,
) -> Result<(Adapter, Peripheral)> {
    let adapter = get_adapter().await?;

    debug!("Looking for device: {}", address);

    if let Some(peripheral) = find_peripheral_by_address(&adapter, address).await? {
        debug!("Found device in cache (no scan needed)");
        return Ok((adapter, peripheral));
    }

    let base_duration = Duration::from_millis((options.duration.as_millis() as u64 / 2).max(2000));

    for attempt in 1..=FIND_ATTEMPTS {
        let scan_duration = base_duration * attempt;
        debug!(
            "Scan attempt {}/{} ({}s)...",
            attempt,
            FIND_ATTEMPTS,
            scan_duration.as_secs()
        );

        adapter.start_scan(ScanFilter::default()).await?;
        sleep(scan_duration).await;
        adapter.stop_scan().await?;

        if let Some(peripheral) = find_peripheral_by_address(&adapter, address).await? {
            info!("Found device on attempt {}", attempt);
            return Ok((adapter, peripheral));
        }
    }

    warn!(
        "Device not found after {} attempts: {}",
        FIND_ATTEMPTS, address
    );
    Err(Error::device_not_found(address))
}

/// Search through known peripherals for one matching the address.
async fn find_peripheral_by_address(adapter: &Adapter, address: &str) -> Result<Option<Peripheral>> {
    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        if let Ok(Some(props)) = peripheral.properties().await {
            let peripheral_address = props.address.to_string();
            if peripheral_address != "00:00:00:00:00:00"
                && addresses_match(&peripheral_address, address)
            {
                debug!("Matched by address: {}", peripheral_address);
                return Ok(Some(peripheral));
            }

            // macOS exposes CoreBluetooth UUIDs instead of addresses
            let peripheral_id = format_peripheral_id(&peripheral.id());
            if addresses_match(&peripheral_id, address) {
                debug!("Matched by peripheral ID: {}", peripheral_id);
                return Ok(Some(peripheral));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_builder() {
        let options = ScanOptions::new().duration_secs(12).all_devices();
        assert_eq!(options.duration, Duration::from_secs(12));
        assert!(!options.filter_airthings_only);
    }

    #[test]
    fn test_scan_options_default_filters() {
        let options = ScanOptions::default();
        assert!(options.filter_airthings_only);
        assert_eq!(options.duration, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_serial() {
        assert_eq!(parse_serial(&[0xD2, 0x04, 0x00, 0x00, 0x09]), Some(1234));
        assert_eq!(parse_serial(&[0x01, 0x02]), None);
    }

    #[test]
    fn test_is_airthings_by_manufacturer_data() {
        let mut props = PeripheralProperties::default();
        assert!(!is_airthings_device(&props));

        props.manufacturer_data.insert(MANUFACTURER_ID, vec![1, 2, 3, 4]);
        assert!(is_airthings_device(&props));
    }

    #[test]
    fn test_is_airthings_by_name_or_service() {
        let mut props = PeripheralProperties::default();
        props.local_name = Some("Airthings Wave+".to_string());
        assert!(is_airthings_device(&props));

        let mut props = PeripheralProperties::default();
        props.services.push(WAVE_PLUS_SERVICE);
        assert!(is_airthings_device(&props));
    }
}
