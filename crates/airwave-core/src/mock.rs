//! Mock transport implementation for testing.
//!
//! This module provides a mock transport that can be used for unit testing
//! without requiring actual BLE hardware.
//!
//! The [`MockTransport`] implements the [`WaveTransport`] trait, allowing it to
//! be handed to a [`WaveReader`](crate::WaveReader) in place of a real link.
//!
//! # Features
//!
//! - **Failure injection**: Make connect or read fail on demand
//! - **Latency simulation**: Add artificial delays to simulate slow BLE responses
//! - **Call counting**: Observe how many sessions were opened and closed

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use airwave_types::{GattCharacteristic, WaveModel};

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::traits::WaveTransport;

/// A raw Wave reading: 45 % humidity, radon 2.0 / 1.0 pCi/L, 21.5 °C.
pub fn sample_wave_reading() -> Vec<u8> {
    let mut out = vec![0x01, 90, 0x00, 0x00];
    for word in [0u16, 0, 0, 0, 74, 37, 2150, 0] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// A raw Wave Plus reading: 45 % humidity, 12 lx, radon 30 / 25 Bq/m³,
/// 21.5 °C, 1013 hPa, 650 ppm CO2, 120 ppb VOC.
pub fn sample_wave_plus_reading() -> Vec<u8> {
    let mut out = vec![0x01, 90, 0x00, 12];
    for word in [30u16, 25, 2150, 50650, 650, 120] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

/// Sample reading matching a model's layout.
pub fn sample_reading(model: WaveModel) -> Vec<u8> {
    match model {
        WaveModel::Wave => sample_wave_reading(),
        WaveModel::WavePlus => sample_wave_plus_reading(),
    }
}

/// A mock Wave transport for testing.
///
/// # Example
///
/// ```
/// use airwave_core::{MockTransport, WaveTransport};
/// use airwave_types::{GattCharacteristic, WaveModel};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let transport = MockTransport::new(WaveModel::WavePlus);
///     transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
///     let data = transport
///         .read_characteristic(GattCharacteristic::CURRENT_VALUES, Duration::from_secs(1))
///         .await
///         .unwrap();
///     assert_eq!(data.len(), 20);
///     transport.disconnect().await.unwrap();
/// }
/// ```
pub struct MockTransport {
    characteristic: GattCharacteristic,
    data: RwLock<Vec<u8>>,
    connected: AtomicBool,
    last_address: RwLock<Option<String>>,
    connect_count: AtomicU32,
    read_count: AtomicU32,
    disconnect_count: AtomicU32,
    fail_connect: AtomicBool,
    fail_read: AtomicBool,
    /// Simulated read latency in milliseconds (0 = no delay).
    read_latency_ms: AtomicU64,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("characteristic", &self.characteristic)
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .field("connect_count", &self.connect_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl MockTransport {
    /// Create a mock that serves a sample reading for the given model.
    pub fn new(model: WaveModel) -> Self {
        Self::with_data(sample_reading(model))
    }

    /// Create a mock that serves the given raw bytes.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            characteristic: GattCharacteristic::CURRENT_VALUES,
            data: RwLock::new(data),
            connected: AtomicBool::new(false),
            last_address: RwLock::new(None),
            connect_count: AtomicU32::new(0),
            read_count: AtomicU32::new(0),
            disconnect_count: AtomicU32::new(0),
            fail_connect: AtomicBool::new(false),
            fail_read: AtomicBool::new(false),
            read_latency_ms: AtomicU64::new(0),
        }
    }

    /// Replace the bytes returned by subsequent reads.
    pub async fn set_data(&self, data: Vec<u8>) {
        *self.data.write().await = data;
    }

    /// Make connect attempts fail (or succeed again).
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::Relaxed);
    }

    /// Make characteristic reads fail (or succeed again).
    pub fn set_fail_read(&self, fail: bool) {
        self.fail_read.store(fail, Ordering::Relaxed);
    }

    /// Set simulated read latency.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_read_latency(&self, latency: Duration) {
        self.read_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Whether a session is currently open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Number of connect attempts, successful or not.
    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::Relaxed)
    }

    /// Number of read attempts.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Number of disconnect calls.
    pub fn disconnect_count(&self) -> u32 {
        self.disconnect_count.load(Ordering::Relaxed)
    }

    /// Address passed to the most recent connect call.
    pub async fn last_address(&self) -> Option<String> {
        self.last_address.read().await.clone()
    }
}

#[async_trait]
impl WaveTransport for MockTransport {
    async fn connect(&self, address: &str) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::Relaxed);
        *self.last_address.write().await = Some(address.to_string());

        if self.fail_connect.load(Ordering::Relaxed) {
            return Err(Error::connection_failed(
                Some(address.to_string()),
                ConnectionFailureReason::OutOfRange,
            ));
        }
        self.connected.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn read_characteristic(
        &self,
        characteristic: GattCharacteristic,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        self.read_count.fetch_add(1, Ordering::Relaxed);

        if !self.connected.load(Ordering::Relaxed) {
            return Err(Error::NotConnected);
        }
        if characteristic.uuid != self.characteristic.uuid {
            return Err(Error::characteristic_not_found(
                characteristic.uuid.to_string(),
                1,
            ));
        }

        let latency = Duration::from_millis(self.read_latency_ms.load(Ordering::Relaxed));
        if latency > timeout {
            tokio::time::sleep(timeout).await;
            return Err(Error::timeout(
                format!("read characteristic {}", characteristic),
                timeout,
            ));
        }
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.fail_read.load(Ordering::Relaxed) {
            return Err(Error::timeout(
                format!("read characteristic {}", characteristic),
                timeout,
            ));
        }

        Ok(self.data.read().await.clone())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_count.fetch_add(1, Ordering::Relaxed);
        self.connected.store(false, Ordering::Relaxed);
        Ok(())
    }
}

/// Builder for creating mock transports with custom settings.
#[derive(Debug, Clone)]
pub struct MockTransportBuilder {
    data: Vec<u8>,
    fail_connect: bool,
    fail_read: bool,
    read_latency: Duration,
}

impl Default for MockTransportBuilder {
    fn default() -> Self {
        Self {
            data: sample_wave_plus_reading(),
            fail_connect: false,
            fail_read: false,
            read_latency: Duration::ZERO,
        }
    }
}

impl MockTransportBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the sample reading for a model.
    #[must_use]
    pub fn model(mut self, model: WaveModel) -> Self {
        self.data = sample_reading(model);
        self
    }

    /// Serve custom raw bytes.
    #[must_use]
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Fail every connect attempt.
    #[must_use]
    pub fn fail_connect(mut self, fail: bool) -> Self {
        self.fail_connect = fail;
        self
    }

    /// Fail every read.
    #[must_use]
    pub fn fail_read(mut self, fail: bool) -> Self {
        self.fail_read = fail;
        self
    }

    /// Delay each read by `latency`.
    #[must_use]
    pub fn read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = latency;
        self
    }

    /// Build the mock transport.
    #[must_use]
    pub fn build(self) -> MockTransport {
        let transport = MockTransport::with_data(self.data);
        transport.set_fail_connect(self.fail_connect);
        transport.set_fail_read(self.fail_read);
        transport.set_read_latency(self.read_latency);
        transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airwave_types::MeasurementKey;
    use uuid::uuid;

    const READ_TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_sample_readings_decode() {
        let wave = WaveModel::Wave.decode(&sample_wave_reading()).unwrap();
        assert_eq!(wave.get(MeasurementKey::Humidity), Some(45.0));
        assert_eq!(wave.get(MeasurementKey::ShortRadon), Some(2.0));
        assert_eq!(wave.get(MeasurementKey::LongRadon), Some(1.0));
        assert_eq!(wave.get(MeasurementKey::Temperature), Some(21.5));

        let plus = WaveModel::WavePlus
            .decode(&sample_wave_plus_reading())
            .unwrap();
        assert_eq!(plus.get(MeasurementKey::Light), Some(12.0));
        assert_eq!(plus.get(MeasurementKey::Pressure), Some(1013.0));
        assert_eq!(plus.get(MeasurementKey::Co2), Some(650.0));
        assert_eq!(plus.get(MeasurementKey::Voc), Some(120.0));
    }

    #[tokio::test]
    async fn test_mock_session_lifecycle() {
        let transport = MockTransport::new(WaveModel::WavePlus);
        assert!(!transport.is_connected());

        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
        assert!(transport.is_connected());
        assert_eq!(
            transport.last_address().await.as_deref(),
            Some("AA:BB:CC:DD:EE:FF")
        );

        let data = transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, READ_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(data, sample_wave_plus_reading());

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
        assert_eq!(transport.connect_count(), 1);
        assert_eq!(transport.read_count(), 1);
        assert_eq!(transport.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_read_requires_connection() {
        let transport = MockTransport::new(WaveModel::Wave);
        let result = transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, READ_TIMEOUT)
            .await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_mock_unknown_characteristic() {
        let transport = MockTransport::new(WaveModel::Wave);
        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();

        let other = GattCharacteristic {
            uuid: uuid!("00002a19-0000-1000-8000-00805f9b34fb"),
            handle: None,
        };
        let result = transport.read_characteristic(other, READ_TIMEOUT).await;
        assert!(matches!(result, Err(Error::CharacteristicNotFound { .. })));
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let transport = MockTransportBuilder::new().fail_connect(true).build();
        let err = transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap_err();
        assert!(matches!(err, Error::ConnectionFailed { .. }));
        assert!(!transport.is_connected());

        transport.set_fail_connect(false);
        transport.set_fail_read(true);
        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
        let err = transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, READ_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency_beyond_timeout() {
        let transport = MockTransportBuilder::new()
            .read_latency(Duration::from_secs(30))
            .build();
        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();

        let err = transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, READ_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { duration, .. } if duration == READ_TIMEOUT));
    }

    #[tokio::test]
    async fn test_mock_set_data() {
        let transport = MockTransportBuilder::new().model(WaveModel::Wave).build();
        transport.set_data(vec![1, 2, 3]).await;
        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
        let data = transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, READ_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }
}
