//! Controller interface error types

use grizzly_transport::{ProtocolError, TransportError};
use thiserror::Error;

/// Errors from controller operations
#[derive(Error, Debug)]
pub enum GrizzlyError {
    /// Transport layer error (stall, timeout, disconnect)
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),

    /// Request violates the packet format
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Argument outside the range the controller accepts
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation attempted after the device handle was released
    #[error("Device closed")]
    DeviceClosed,
}

impl From<TransportError> for GrizzlyError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Closed => GrizzlyError::DeviceClosed,
            TransportError::Protocol(p) => GrizzlyError::Protocol(p),
            other => GrizzlyError::Transport(other),
        }
    }
}
