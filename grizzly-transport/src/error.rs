//! Transport and framing error types

use thiserror::Error;

/// A request that violates the packet format.
///
/// Raised locally before anything is sent to the device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Payload too large for one packet: {len} bytes (max {max}); split across sequential register addresses")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Read too large for one packet: {requested} bytes (max {max})")]
    ReadTooLarge { requested: usize, max: usize },

    #[error("Command packet must be exactly 16 bytes, got {len}")]
    PacketSize { len: usize },

    #[error("Integer width {width} exceeds {max} bytes")]
    WidthTooLarge { width: usize, max: usize },
}

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device closed")]
    Closed,

    #[error("Communication timeout")]
    Timeout,

    #[error("Short response: expected {expected} bytes, got {got}")]
    ShortResponse { expected: usize, got: usize },

    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}
