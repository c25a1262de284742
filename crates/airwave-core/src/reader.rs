//! Throttled polling reader for one Wave device.
//!
//! A [`WaveReader`] owns the transport for a single device and the last
//! decoded [`Measurements`]. Every [`update`](WaveReader::update) runs at
//! most one wireless session: connect, read the current-values
//! characteristic, decode, disconnect.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use airwave_types::{GattCharacteristic, MeasurementKey, Measurements, WaveModel};

use crate::error::Result;
use crate::traits::WaveTransport;

/// Default minimum time between two update attempts.
pub const DEFAULT_MIN_UPDATE_INTERVAL: Duration = Duration::from_secs(300);

/// Default timeout for the current-values read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// What a call to [`WaveReader::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A session ran and the measurements were replaced.
    Updated,
    /// The previous attempt was too recent; nothing was done.
    Throttled {
        /// Time left until the next attempt is allowed.
        remaining: Duration,
    },
    /// Another session on this reader is still running; nothing was done.
    InFlight,
}

impl UpdateOutcome {
    /// Whether new measurements were stored.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// Polls one Wave device and keeps its latest measurements.
pub struct WaveReader {
    address: String,
    model: WaveModel,
    transport: Arc<dyn WaveTransport>,
    read_timeout: Duration,
    min_interval: Duration,
    values: RwLock<Measurements>,
    last_updated: RwLock<Option<OffsetDateTime>>,
    /// Held for the duration of a session; stores the last attempt instant.
    session: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for WaveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveReader")
            .field("address", &self.address)
            .field("model", &self.model)
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}

impl WaveReader {
    /// Create a reader that has never been polled.
    pub fn new(
        address: impl Into<String>,
        model: WaveModel,
        transport: impl WaveTransport + 'static,
    ) -> Self {
        Self {
            address: address.into(),
            model,
            transport: Arc::new(transport),
            read_timeout: DEFAULT_READ_TIMEOUT,
            min_interval: DEFAULT_MIN_UPDATE_INTERVAL,
            values: RwLock::new(Measurements::new()),
            last_updated: RwLock::new(None),
            session: Mutex::new(None),
        }
    }

    /// Set the minimum time between update attempts.
    #[must_use]
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set the timeout for the characteristic read.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// The device address this reader polls.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The hardware model used to decode readings.
    pub fn model(&self) -> WaveModel {
        self.model
    }

    /// Minimum time between update attempts.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Last stored value for a key, or `None` if it was never read.
    pub async fn get(&self, key: MeasurementKey) -> Option<f64> {
        self.values.read().await.get(key)
    }

    /// Copy of all stored measurements.
    pub async fn snapshot(&self) -> Measurements {
        self.values.read().await.clone()
    }

    /// Wall-clock time of the last successful update.
    pub async fn last_updated(&self) -> Option<OffsetDateTime> {
        *self.last_updated.read().await
    }

    /// Poll the device unless throttled or already polling.
    ///
    /// The throttle is measured from the start of the previous attempt,
    /// successful or not. On failure the stored measurements are left
    /// untouched and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error of the session.
    #[tracing::instrument(level = "debug", skip(self), fields(address = %self.address, model = %self.model))]
    pub async fn update(&self) -> Result<UpdateOutcome> {
        let Ok(mut last_attempt) = self.session.try_lock() else {
            debug!("Session already in flight");
            return Ok(UpdateOutcome::InFlight);
        };

        let now = Instant::now();
        if let Some(previous) = *last_attempt {
            let elapsed = now.saturating_duration_since(previous);
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!("Throttled, {:?} until next poll", remaining);
                return Ok(UpdateOutcome::Throttled { remaining });
            }
        }
        *last_attempt = Some(now);

        let teardown = SessionTeardown::new(&self.transport);
        let result = self.run_session().await;
        teardown.disconnect().await;

        let values = result?;
        *self.values.write().await = values;
        *self.last_updated.write().await = Some(OffsetDateTime::now_utc());
        info!("Updated measurements from {}", self.address);
        Ok(UpdateOutcome::Updated)
    }

    async fn run_session(&self) -> Result<Measurements> {
        debug!("Connecting");
        self.transport.connect(&self.address).await?;

        debug!("Reading current values");
        let data = self
            .transport
            .read_characteristic(GattCharacteristic::CURRENT_VALUES, self.read_timeout)
            .await?;

        debug!("Decoding {} bytes", data.len());
        Ok(self.model.decode(&data)?)
    }
}

/// Disconnects the transport when a session ends, including when the
/// update future is dropped mid-session.
struct SessionTeardown {
    transport: Option<Arc<dyn WaveTransport>>,
}

impl SessionTeardown {
    fn new(transport: &Arc<dyn WaveTransport>) -> Self {
        Self {
            transport: Some(Arc::clone(transport)),
        }
    }

    async fn disconnect(mut self) {
        if let Some(transport) = self.transport.as_ref()
            && let Err(e) = transport.disconnect().await
        {
            warn!("Disconnect after session failed: {}", e);
        }
        self.transport = None;
    }
}

impl Drop for SessionTeardown {
    fn drop(&mut self) {
        let Some(transport) = self.transport.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Session cancelled, disconnecting in background");
                handle.spawn(async move {
                    if let Err(e) = transport.disconnect().await {
                        warn!("Disconnect after cancelled session failed: {}", e);
                    }
                });
            }
            Err(_) => warn!("Session cancelled outside a runtime; link left open"),
        }
    }
}
