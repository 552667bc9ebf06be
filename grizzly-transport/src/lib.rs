//! Transport layer for Grizzly Bear motor controller communication
//!
//! The controller is driven entirely through 16-byte command packets carried
//! by USB control transfers. This crate owns the packet framing
//! ([`protocol`]), the raw I/O trait ([`Transport`]) and its hidapi backend,
//! device discovery, and a monitoring middleware.
//!
//! ```text
//! [HidWiredTransport]   ← implements Transport (raw control transfers)
//!          |
//! [PrinterTransport]    ← optional, prints every packet
//!          |
//!     [grizzly::Grizzly] ← register map, typed operations
//! ```

pub mod device_registry;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_wired;

pub use device_registry::{is_grizzly, DEFAULT_ADDRESS, PRODUCT_ID, VENDOR_ID};
pub use error::{ProtocolError, TransportError};
pub use printer::{PacketFilter, PrinterConfig, PrinterTransport};
pub use protocol::{Packet, PACKET_SIZE};
pub use types::{ControllerConfig, DiscoveredDevice, TransportDeviceInfo};

pub use discovery::{DeviceDiscovery, HidDiscovery, ProbedDevice};
pub use hid_wired::HidWiredTransport;

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// A transport moves single command packets and knows nothing about
/// registers. Calls block until the underlying transfer completes or fails.
pub trait Transport: Send + Sync {
    /// Send one packet without reading anything back
    fn send(&self, packet: &Packet) -> Result<(), TransportError>;

    /// Send one packet, then read back `num_bytes` of register data
    ///
    /// The device prefixes its response with one status byte; it is
    /// stripped before returning.
    fn exchange(&self, packet: &Packet, num_bytes: usize) -> Result<Vec<u8>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check if transport is still usable
    fn is_connected(&self) -> bool;

    /// Release the device handle; later calls fail with [`TransportError::Closed`]
    fn close(&self) -> Result<(), TransportError>;
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;
