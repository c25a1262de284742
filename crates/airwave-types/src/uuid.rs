//! Bluetooth identifiers for Airthings Wave devices.

use uuid::{Uuid, uuid};

/// Airthings company identifier used in BLE manufacturer data.
pub const MANUFACTURER_ID: u16 = 0x0334;

/// Airthings Wave Plus primary service.
pub const WAVE_PLUS_SERVICE: Uuid = uuid!("b42e1c08-ade7-11e4-89d3-123b93f75cba");

/// Current sensor values characteristic.
pub const CURRENT_VALUES: Uuid = uuid!("b42e2a68-ade7-11e4-89d3-123b93f75cba");

/// ATT handle of [`CURRENT_VALUES`] on shipped firmware.
///
/// Stable across observed devices; kept for stacks that read by handle.
pub const CURRENT_VALUES_HANDLE: u16 = 0x000d;

/// A GATT characteristic identified by UUID, with its known ATT handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattCharacteristic {
    /// Characteristic UUID.
    pub uuid: Uuid,
    /// ATT handle, if known.
    pub handle: Option<u16>,
}

impl GattCharacteristic {
    /// The characteristic carrying the packed current readings.
    pub const CURRENT_VALUES: GattCharacteristic = GattCharacteristic {
        uuid: CURRENT_VALUES,
        handle: Some(CURRENT_VALUES_HANDLE),
    };
}

impl core::fmt::Display for GattCharacteristic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.handle {
            Some(handle) => write!(f, "{} (handle 0x{:04x})", self.uuid, handle),
            None => write!(f, "{}", self.uuid),
        }
    }
}
