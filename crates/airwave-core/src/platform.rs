//! Sensor platform setup.
//!
//! Turns a [`SensorConfig`] into one [`WaveReader`] and the set of
//! [`SensorEntity`] values the host should register for it.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::SensorConfig;
use crate::error::Result;
use crate::reader::{DEFAULT_READ_TIMEOUT, WaveReader};
use crate::sensor::SensorEntity;
use crate::traits::WaveTransport;

/// Host-side sink for newly created entities.
pub trait EntityRegistry {
    /// Register a batch of entities belonging to one device.
    fn add_entities(&mut self, entities: Vec<SensorEntity>);
}

impl EntityRegistry for Vec<SensorEntity> {
    fn add_entities(&mut self, entities: Vec<SensorEntity>) {
        self.extend(entities);
    }
}

/// Validate `config`, build its reader and register one entity per sensor.
///
/// The returned `Arc` owns the reader; entities only hold weak references,
/// so the caller must keep it alive for as long as the entities are used.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
/// configuration does not validate. Nothing is registered in that case.
pub fn setup_platform<R: EntityRegistry + ?Sized>(
    config: &SensorConfig,
    transport: impl WaveTransport + 'static,
    registry: &mut R,
) -> Result<Arc<WaveReader>> {
    setup_platform_with_timeout(config, transport, DEFAULT_READ_TIMEOUT, registry)
}

/// Like [`setup_platform`], with a custom characteristic read timeout.
#[tracing::instrument(level = "info", skip_all, fields(mac = %config.mac, model = %config.model))]
pub fn setup_platform_with_timeout<R: EntityRegistry + ?Sized>(
    config: &SensorConfig,
    transport: impl WaveTransport + 'static,
    read_timeout: Duration,
    registry: &mut R,
) -> Result<Arc<WaveReader>> {
    config.check()?;

    let reader = Arc::new(
        WaveReader::new(config.mac.trim(), config.model, transport)
            .with_min_interval(config.interval())
            .with_read_timeout(read_timeout),
    );

    let entities: Vec<SensorEntity> = config
        .model
        .sensors()
        .iter()
        .map(|key| SensorEntity::new(&reader, *key, config.unit_system))
        .collect();

    info!("Registering {} sensors", entities.len());
    registry.add_entities(entities);
    Ok(reader)
}
