//! Utility functions for airwave-core.
//!
//! Address handling shared by scanning, the BLE transport and config
//! validation.

use btleplug::platform::PeripheralId;

/// Format a peripheral ID as a string.
///
/// On macOS, peripheral IDs are UUIDs. On other platforms, they are
/// MAC addresses. This function extracts the useful identifier string.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    format!("{:?}", id)
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

/// Create an identifier string from an address and peripheral ID.
///
/// On macOS where addresses are 00:00:00:00:00:00, uses the peripheral ID.
/// On other platforms, uses the Bluetooth address.
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if address == "00:00:00:00:00:00" {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

/// Check whether a string is a Bluetooth hardware address (`AA:BB:CC:DD:EE:FF`).
///
/// Hyphens are accepted as separators; case does not matter.
pub fn is_valid_mac(address: &str) -> bool {
    let parts: Vec<&str> = address.split([':', '-']).collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Check whether a string is a device identifier the BLE stack can resolve:
/// a MAC address, or a CoreBluetooth peripheral UUID on macOS.
pub fn is_valid_address(address: &str) -> bool {
    is_valid_mac(address) || uuid::Uuid::parse_str(address).is_ok()
}

/// Normalize a MAC address to upper case with colon separators.
///
/// Non-MAC identifiers are returned trimmed but otherwise unchanged.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    if is_valid_mac(trimmed) {
        trimmed.replace('-', ":").to_uppercase()
    } else {
        trimmed.to_string()
    }
}

/// Compare two identifiers ignoring case and MAC separator style.
pub fn addresses_match(a: &str, b: &str) -> bool {
    normalize_address(a).eq_ignore_ascii_case(&normalize_address(b))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any six hex octets form a MAC regardless of separator or case.
        #[test]
        fn generated_macs_are_valid(octets: [u8; 6], hyphen: bool, lower: bool) {
            let sep = if hyphen { "-" } else { ":" };
            let mut mac = octets
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(sep);
            if lower {
                mac = mac.to_lowercase();
            }
            prop_assert!(is_valid_mac(&mac));
            prop_assert!(addresses_match(&mac, &normalize_address(&mac)));
        }

        /// Normalizing twice changes nothing.
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,24}") {
            let once = normalize_address(&s);
            prop_assert_eq!(normalize_address(&once), once);
        }
    }
}
