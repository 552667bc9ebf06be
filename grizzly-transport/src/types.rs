//! Common types for transport layer

use crate::device_registry::{DEFAULT_ADDRESS, PRODUCT_ID, VENDOR_ID};

/// Device identification information
#[derive(Debug, Clone, Default)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
    /// Bus address reported by the controller, once probed
    pub address: Option<u8>,
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

/// Which controller to talk to.
///
/// `address` only matters when several controllers share the same VID/PID;
/// it is compared against the controller's ADDRESS_LIST register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub address: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl ControllerConfig {
    /// Set the bus address to select
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Value the ADDRESS_LIST register holds for this address
    pub fn address_register_value(&self) -> u8 {
        self.address.wrapping_shl(1)
    }
}
