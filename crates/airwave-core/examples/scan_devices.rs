//! Example: Scanning for Airthings Devices
//!
//! This example scans for Airthings devices using Bluetooth Low Energy and
//! prints their identifiers, serial numbers and signal strength.
//!
//! Run with: `cargo run --example scan_devices`

use airwave_core::scan::{self, ScanOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Scanning for Airthings devices...");
    println!();

    let options = ScanOptions::default().duration_secs(10);
    let devices = scan::scan_with_options(options).await?;

    if devices.is_empty() {
        println!("No Airthings devices found.");
        println!();
        println!("Make sure:");
        println!("  - Your Wave is powered on");
        println!("  - Bluetooth is enabled on this computer");
        println!("  - The device is within range");
        return Ok(());
    }

    println!("Found {} device(s):", devices.len());
    println!();
    for device in &devices {
        let name = device.name.as_deref().unwrap_or("Unknown");
        let rssi = device
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "N/A".to_string());

        println!("  {}", name);
        println!("    Identifier: {}", device.identifier);
        if let Some(serial) = device.serial {
            println!("    Serial: {}", serial);
        }
        println!("    RSSI: {}", rssi);
        println!();
    }

    Ok(())
}
