//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any Transport implementation and prints every command packet and
//! response passing through it, decoded against the register map.
//!
//! # Example
//!
//! ```ignore
//! use grizzly_transport::{HidDiscovery, PrinterConfig, PrinterTransport};
//!
//! let transport = HidDiscovery::default().open_preferred()?;
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! ```

use std::str::FromStr;
use std::sync::Arc;

use crossterm::style::Stylize;

use crate::error::TransportError;
use crate::protocol::{register, CommandPacket, Packet};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Packet filter for selective display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketFilter {
    #[default]
    All,
    Writes,
    Reads,
    Register(u8),
}

impl FromStr for PacketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "writes" | "write" | "w" => Ok(Self::Writes),
            "reads" | "read" | "r" => Ok(Self::Reads),
            s if s.starts_with("reg=") || s.starts_with("0x") => {
                let hex_str = s.strip_prefix("reg=").unwrap_or(s);
                let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                u8::from_str_radix(hex_str, 16)
                    .map(Self::Register)
                    .map_err(|e| format!("Invalid register address: {}", e))
            }
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
    /// Filter for selective display
    pub filter: PacketFilter,
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    /// Create config with filter
    pub fn with_filter(mut self, filter: PacketFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Check if a packet should be shown based on filter
    pub fn should_show(&self, packet: &Packet) -> bool {
        let view = CommandPacket::view(packet);
        match self.filter {
            PacketFilter::All => true,
            PacketFilter::Writes => view.is_write(),
            PacketFilter::Reads => !view.is_write(),
            PacketFilter::Register(addr) => {
                // Multi-register transactions cover [address, address + len)
                let start = view.address() as usize;
                let end = start + view.len().max(1);
                (start..end).contains(&(addr as usize))
            }
        }
    }
}

/// Render a packet as `WR 0x90 ACCEL_LIMIT len=1 [64]`
pub fn describe_packet(packet: &Packet) -> String {
    let view = CommandPacket::view(packet);
    let addr = view.address();
    if view.is_write() {
        format!(
            "WR 0x{:02x} {} len={} {:02x?}",
            addr,
            register::name(addr),
            view.len(),
            view.payload()
        )
    } else {
        format!(
            "RD 0x{:02x} {} len={}",
            addr,
            register::name(addr),
            view.len()
        )
    }
}

/// Transport middleware that prints all commands and responses
pub struct PrinterTransport {
    inner: Arc<dyn Transport>,
    config: PrinterConfig,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>, config: PrinterConfig) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            config,
        })
    }

    /// Print a command being sent
    fn print_command(&self, packet: &Packet) {
        if !self.config.should_show(packet) {
            return;
        }
        eprintln!(
            "{} {}  {}",
            ">>>".cyan(),
            "CMD".cyan().bold(),
            describe_packet(packet)
        );
        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), packet);
        }
    }

    /// Print a response received
    fn print_response(&self, packet: &Packet, data: &[u8]) {
        if !self.config.should_show(packet) {
            return;
        }
        let addr = CommandPacket::view(packet).address();
        eprintln!(
            "{} {}  0x{:02x} {} {:02x?}",
            "<<<".green(),
            "RSP".green().bold(),
            addr,
            register::name(addr).yellow(),
            data
        );
    }
}

impl Transport for PrinterTransport {
    fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        self.print_command(packet);
        self.inner.send(packet)
    }

    fn exchange(&self, packet: &Packet, num_bytes: usize) -> Result<Vec<u8>, TransportError> {
        self.print_command(packet);
        let result = self.inner.exchange(packet, num_bytes)?;
        self.print_response(packet, &result);
        Ok(result)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn close(&self) -> Result<(), TransportError> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{encode_read, encode_write};

    #[test]
    fn test_packet_filter_parse() {
        assert_eq!(PacketFilter::from_str("all").unwrap(), PacketFilter::All);
        assert_eq!(
            PacketFilter::from_str("writes").unwrap(),
            PacketFilter::Writes
        );
        assert_eq!(PacketFilter::from_str("READ").unwrap(), PacketFilter::Reads);
        assert_eq!(
            PacketFilter::from_str("reg=0x94").unwrap(),
            PacketFilter::Register(0x94)
        );
        assert_eq!(
            PacketFilter::from_str("0x30").unwrap(),
            PacketFilter::Register(0x30)
        );
        assert!(PacketFilter::from_str("bogus").is_err());
    }

    #[test]
    fn test_filter_matches_register_range() {
        let config = PrinterConfig::default().with_filter(PacketFilter::Register(0x96));
        let uptime = encode_read(register::UPTIME, 4).unwrap();
        let mode = encode_write(register::MODE, &[0x13]).unwrap();
        assert!(config.should_show(&uptime));
        assert!(!config.should_show(&mode));
    }

    #[test]
    fn test_filter_direction() {
        let writes = PrinterConfig::default().with_filter(PacketFilter::Writes);
        let read = encode_read(register::UPTIME, 4).unwrap();
        let write = encode_write(register::MODE, &[0x13]).unwrap();
        assert!(writes.should_show(&write));
        assert!(!writes.should_show(&read));
    }

    #[test]
    fn test_describe_packet() {
        let write = encode_write(register::ACCEL_LIMIT, &[100]).unwrap();
        assert_eq!(describe_packet(&write), "WR 0x90 ACCEL_LIMIT len=1 [64]");
        let read = encode_read(register::UPTIME, 4).unwrap();
        assert_eq!(describe_packet(&read), "RD 0x94 UPTIME len=4");
    }
}
