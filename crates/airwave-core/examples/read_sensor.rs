//! Example: Reading Current Sensor Values
//!
//! Connects to an Airthings Wave device once, reads the current values and
//! prints every sensor entity the platform would register.
//!
//! Run with: `cargo run --example read_sensor -- <DEVICE_ADDRESS> [wave|wave_plus]`

use std::env;

use airwave_core::{BleTransport, SensorConfig, SensorEntity, WaveModel, setup_platform};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(address) = args.get(1) else {
        eprintln!("Usage: {} <DEVICE_ADDRESS> [wave|wave_plus]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} AA:BB:CC:DD:EE:FF wave", args[0]);
        std::process::exit(1);
    };
    let model: WaveModel = match args.get(2) {
        Some(m) => m.parse()?,
        None => WaveModel::default(),
    };

    let config = SensorConfig::new(address.as_str()).model(model);
    let mut entities: Vec<SensorEntity> = Vec::new();
    let reader = setup_platform(&config, BleTransport::new(), &mut entities)?;

    println!("Reading {} at {}...", model, address);
    reader.update().await?;

    println!();
    println!("Current Readings:");
    for entity in &entities {
        println!(
            "  {:<40} {:>10} {}",
            entity.name(),
            entity.state().await.to_string(),
            entity.unit_of_measurement()
        );
    }

    Ok(())
}
