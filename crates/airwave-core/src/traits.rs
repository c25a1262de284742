//! Trait abstractions for the wireless link.
//!
//! This module provides the [`WaveTransport`] trait that abstracts over the
//! real Bluetooth stack and the mock transport used for testing. The reader
//! only ever talks to a transport through these three operations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use airwave_types::GattCharacteristic;

use crate::error::Result;

/// Connect, read and disconnect primitives for one Wave device.
///
/// A transport serves a single session at a time. Callers must call
/// [`disconnect`](Self::disconnect) after every [`connect`](Self::connect)
/// attempt, including failed ones, so that partially opened links are
/// released.
///
/// # Example
///
/// ```ignore
/// use airwave_core::{WaveTransport, Result};
/// use airwave_types::GattCharacteristic;
///
/// async fn raw_reading<T: WaveTransport>(t: &T, address: &str) -> Result<Vec<u8>> {
///     t.connect(address).await?;
///     let data = t
///         .read_characteristic(GattCharacteristic::CURRENT_VALUES, Duration::from_secs(10))
///         .await;
///     t.disconnect().await?;
///     data
/// }
/// ```
#[async_trait]
pub trait WaveTransport: Send + Sync {
    /// Open a connection to the device with the given hardware address.
    async fn connect(&self, address: &str) -> Result<()>;

    /// Read the value of a characteristic, failing after `timeout`.
    async fn read_characteristic(
        &self,
        characteristic: GattCharacteristic,
        timeout: Duration,
    ) -> Result<Vec<u8>>;

    /// Close the connection. Must be safe to call when not connected.
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<T: WaveTransport + ?Sized> WaveTransport for Arc<T> {
    async fn connect(&self, address: &str) -> Result<()> {
        (**self).connect(address).await
    }

    async fn read_characteristic(
        &self,
        characteristic: GattCharacteristic,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        (**self).read_characteristic(characteristic, timeout).await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}
