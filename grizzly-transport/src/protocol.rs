//! Protocol constants and packet framing for Grizzly Bear motor controllers
//!
//! Every transaction is a single 16-byte command packet:
//!
//! ```text
//! byte 0       register address (first register of the range)
//! byte 1       bits 0-6: length, bit 7: write flag
//! bytes 2..16  payload (writes only), zero padded
//! ```
//!
//! The controller auto-increments the register address, so one packet reads
//! up to 127 or writes up to 14 consecutive registers.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{ProtocolError, TransportError};

/// Size of every command packet
pub const PACKET_SIZE: usize = 16;

/// Address byte plus length/flag byte
pub const HEADER_SIZE: usize = 2;

/// Largest payload that fits in one write packet
pub const MAX_WRITE_LEN: usize = PACKET_SIZE - HEADER_SIZE;

/// Largest read the 7-bit length field can express
pub const MAX_READ_LEN: usize = LENGTH_MASK as usize;

/// Byte 1, bit 7
pub const WRITE_FLAG: u8 = 0x80;

/// Byte 1, bits 0-6
pub const LENGTH_MASK: u8 = 0x7F;

/// Widest integer composed by [`le_bytes`] / [`from_le_bytes`]
pub const MAX_INT_WIDTH: usize = 4;

/// A complete command packet
pub type Packet = [u8; PACKET_SIZE];

/// USB control-transfer parameters used by the controller firmware.
///
/// These are HID class requests on interface 0: SET_REPORT for commands and
/// GET_REPORT for responses, both addressing feature reports. The low byte of
/// each `wValue` is the report id handed to hidapi.
pub mod control {
    /// bmRequestType for host-to-device class request to an interface
    pub const REQUEST_TYPE_OUT: u8 = 0x21;
    /// HID SET_REPORT
    pub const REQUEST_SET_REPORT: u8 = 0x09;
    /// Feature report, id 0
    pub const VALUE_OUT: u16 = 0x0300;

    /// bmRequestType for device-to-host class request to an interface
    pub const REQUEST_TYPE_IN: u8 = 0xA1;
    /// HID GET_REPORT
    pub const REQUEST_GET_REPORT: u8 = 0x01;
    /// Feature report, id 1
    pub const VALUE_IN: u16 = 0x0301;

    /// wIndex (interface number) for both directions
    pub const INDEX: u16 = 0;

    /// Report id prefixed to outgoing packets
    pub const OUT_REPORT_ID: u8 = (VALUE_OUT & 0xFF) as u8;
    /// Report id requested for responses
    pub const IN_REPORT_ID: u8 = (VALUE_IN & 0xFF) as u8;
}

/// Register addresses (firmware register map)
pub mod register {
    pub const MODE: u8 = 0x01;
    pub const SPEED: u8 = 0x04;
    pub const MOTOR_CURRENT: u8 = 0x10;
    pub const ENCODER_COUNT: u8 = 0x20;
    pub const P_CONSTANT: u8 = 0x30;
    pub const I_CONSTANT: u8 = 0x34;
    pub const D_CONSTANT: u8 = 0x38;
    pub const TIMEOUT: u8 = 0x80;
    pub const CURRENT_LIMIT: u8 = 0x82;
    pub const ACCEL_LIMIT: u8 = 0x90;
    pub const UPTIME: u8 = 0x94;
    pub const ENABLE_USB: u8 = 0x9A;
    /// Bus address of the controller, shifted left by one
    pub const ADDRESS_LIST: u8 = 0x9B;

    /// Get human-readable name for a register address
    pub fn name(addr: u8) -> &'static str {
        match addr {
            MODE => "MODE",
            SPEED => "SPEED",
            MOTOR_CURRENT => "MOTOR_CURRENT",
            ENCODER_COUNT => "ENCODER_COUNT",
            P_CONSTANT => "P_CONSTANT",
            I_CONSTANT => "I_CONSTANT",
            D_CONSTANT => "D_CONSTANT",
            TIMEOUT => "TIMEOUT",
            CURRENT_LIMIT => "CURRENT_LIMIT",
            ACCEL_LIMIT => "ACCEL_LIMIT",
            UPTIME => "UPTIME",
            ENABLE_USB => "ENABLE_USB",
            ADDRESS_LIST => "ADDRESS_LIST",
            _ => "UNKNOWN",
        }
    }
}

/// Address probe used during discovery: read one byte from ADDRESS_LIST
pub const GET_ADDR_PACKET: Packet = encode_read_const(register::ADDRESS_LIST, 1);

/// Wire layout of a command packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CommandPacket {
    address: u8,
    header: u8,
    payload: [u8; MAX_WRITE_LEN],
}

impl CommandPacket {
    /// View an encoded packet through its field layout
    pub fn view(packet: &Packet) -> &Self {
        zerocopy::transmute_ref!(packet)
    }

    /// First register addressed
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Number of registers read or written
    pub fn len(&self) -> usize {
        (self.header & LENGTH_MASK) as usize
    }

    /// True for a zero-length transaction
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write flag (bit 7 of byte 1)
    pub fn is_write(&self) -> bool {
        self.header & WRITE_FLAG != 0
    }

    /// Bytes carried by a write; empty for reads
    pub fn payload(&self) -> &[u8] {
        if self.is_write() {
            &self.payload[..self.len().min(MAX_WRITE_LEN)]
        } else {
            &[]
        }
    }
}

/// Build a read packet without bounds checking.
///
/// `num_bytes` is masked to the 7-bit length field. Used for compile-time
/// packets; runtime callers go through [`encode_read`].
pub const fn encode_read_const(addr: u8, num_bytes: u8) -> Packet {
    let mut packet = [0u8; PACKET_SIZE];
    packet[0] = addr;
    packet[1] = num_bytes & LENGTH_MASK;
    packet
}

/// Build a read request for `num_bytes` registers starting at `addr`
pub fn encode_read(addr: u8, num_bytes: usize) -> Result<Packet, ProtocolError> {
    if num_bytes > MAX_READ_LEN {
        return Err(ProtocolError::ReadTooLarge {
            requested: num_bytes,
            max: MAX_READ_LEN,
        });
    }
    Ok(encode_read_const(addr, num_bytes as u8))
}

/// Build a write of `data` to consecutive registers starting at `addr`
///
/// Payloads longer than [`MAX_WRITE_LEN`] are rejected; there is no
/// multi-packet write, callers split across sequential addresses.
pub fn encode_write(addr: u8, data: &[u8]) -> Result<Packet, ProtocolError> {
    if data.len() > MAX_WRITE_LEN {
        return Err(ProtocolError::PayloadTooLarge {
            len: data.len(),
            max: MAX_WRITE_LEN,
        });
    }
    let mut payload = [0u8; MAX_WRITE_LEN];
    payload[..data.len()].copy_from_slice(data);
    let packet = CommandPacket {
        address: addr,
        header: data.len() as u8 | WRITE_FLAG,
        payload,
    };
    Ok(zerocopy::transmute!(packet))
}

/// Convert a raw buffer into a packet, enforcing the 16-byte size
pub fn packet_from_slice(buf: &[u8]) -> Result<Packet, ProtocolError> {
    buf.try_into()
        .map_err(|_| ProtocolError::PacketSize { len: buf.len() })
}

/// Extract the register bytes from a GET_REPORT buffer
///
/// The controller answers a read of `num_bytes` with `num_bytes + 1` bytes;
/// byte 0 carries no register data. `got` is the length the transfer reported.
pub fn strip_response(
    buf: &[u8],
    got: usize,
    num_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let expected = num_bytes + 1;
    if got < expected || buf.len() < expected {
        return Err(TransportError::ShortResponse {
            expected,
            got: got.min(buf.len()),
        });
    }
    Ok(buf[1..expected].to_vec())
}

/// Narrow to one byte, keeping the low 8 bits (wraps for out-of-range values)
#[inline]
pub const fn to_byte(value: i64) -> u8 {
    (value & 0xFF) as u8
}

/// Split `value` into `width` little-endian bytes, discarding higher bytes
pub fn le_bytes(value: u32, width: usize) -> Result<Vec<u8>, ProtocolError> {
    if width > MAX_INT_WIDTH {
        return Err(ProtocolError::WidthTooLarge {
            width,
            max: MAX_INT_WIDTH,
        });
    }
    Ok(value.to_le_bytes()[..width].to_vec())
}

/// Compose an unsigned little-endian integer from up to four bytes
pub fn from_le_bytes(bytes: &[u8]) -> Result<u32, ProtocolError> {
    if bytes.len() > MAX_INT_WIDTH {
        return Err(ProtocolError::WidthTooLarge {
            width: bytes.len(),
            max: MAX_INT_WIDTH,
        });
    }
    let mut buf = [0u8; MAX_INT_WIDTH];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_packet_layout() {
        for n in [0usize, 1, 4, 64, 127] {
            let packet = encode_read(register::UPTIME, n).unwrap();
            assert_eq!(packet.len(), PACKET_SIZE);
            assert_eq!(packet[0], register::UPTIME);
            assert_eq!(packet[1], n as u8);
            assert_eq!(packet[1] & WRITE_FLAG, 0);
            assert!(packet[2..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_write_packet_layout() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let packet = encode_write(register::P_CONSTANT, &data).unwrap();
        assert_eq!(packet[0], 0x30);
        assert_eq!(packet[1], 4 | 0x80);
        assert_eq!(&packet[2..6], &data);
        assert!(packet[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_full_payload() {
        let data = [0xAAu8; MAX_WRITE_LEN];
        let packet = encode_write(0x40, &data).unwrap();
        assert_eq!(packet[1], 14 | 0x80);
        assert_eq!(&packet[2..], &data);
    }

    #[test]
    fn test_empty_write_sets_flag_only() {
        let packet = encode_write(register::MODE, &[]).unwrap();
        assert_eq!(packet[1], 0x80);
    }

    #[test]
    fn test_oversized_requests_rejected() {
        assert_eq!(
            encode_write(0x01, &[0u8; 15]),
            Err(ProtocolError::PayloadTooLarge { len: 15, max: 14 })
        );
        assert_eq!(
            encode_read(0x01, 128),
            Err(ProtocolError::ReadTooLarge {
                requested: 128,
                max: 127
            })
        );
    }

    #[test]
    fn test_get_addr_packet() {
        assert_eq!(GET_ADDR_PACKET[0], 0x9B);
        assert_eq!(GET_ADDR_PACKET[1], 0x01);
        assert_eq!(GET_ADDR_PACKET, encode_read(register::ADDRESS_LIST, 1).unwrap());
    }

    #[test]
    fn test_command_packet_view() {
        let packet = encode_write(register::ACCEL_LIMIT, &[100]).unwrap();
        let view = CommandPacket::view(&packet);
        assert_eq!(view.address(), 0x90);
        assert!(view.is_write());
        assert_eq!(view.len(), 1);
        assert_eq!(view.payload(), &[100]);

        let packet = encode_read(register::UPTIME, 4).unwrap();
        let view = CommandPacket::view(&packet);
        assert!(!view.is_write());
        assert_eq!(view.len(), 4);
        assert!(view.payload().is_empty());
    }

    #[test]
    fn test_strip_response() {
        let buf = [0x01, 0x10, 0x20, 0x30];
        assert_eq!(strip_response(&buf, 4, 3).unwrap(), vec![0x10, 0x20, 0x30]);
        assert_eq!(strip_response(&buf, 2, 1).unwrap(), vec![0x10]);
        // Zero-length read still needs the leading byte
        assert_eq!(strip_response(&buf, 1, 0).unwrap(), Vec::<u8>::new());
        // Trailing bytes beyond the request are ignored
        assert_eq!(strip_response(&buf, 4, 1).unwrap(), vec![0x10]);
    }

    #[test]
    fn test_strip_response_max_read() {
        let mut buf = vec![0u8; MAX_READ_LEN + 1];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = i as u8;
        }
        let data = strip_response(&buf, buf.len(), MAX_READ_LEN).unwrap();
        assert_eq!(data.len(), MAX_READ_LEN);
        assert_eq!(data[0], 1);
        assert_eq!(data[MAX_READ_LEN - 1], MAX_READ_LEN as u8);
    }

    #[test]
    fn test_strip_response_short() {
        let buf = [0x01, 0x10, 0x20, 0x30, 0x40];
        assert!(matches!(
            strip_response(&buf, 3, 4),
            Err(TransportError::ShortResponse {
                expected: 5,
                got: 3
            })
        ));
        assert!(matches!(
            strip_response(&buf, 0, 0),
            Err(TransportError::ShortResponse {
                expected: 1,
                got: 0
            })
        ));
    }

    #[test]
    fn test_packet_from_slice() {
        assert!(packet_from_slice(&[0u8; 16]).is_ok());
        assert_eq!(
            packet_from_slice(&[0u8; 15]),
            Err(ProtocolError::PacketSize { len: 15 })
        );
        assert_eq!(
            packet_from_slice(&[0u8; 17]),
            Err(ProtocolError::PacketSize { len: 17 })
        );
    }

    #[test]
    fn test_le_round_trip_boundaries() {
        for (width, values) in [
            (1usize, vec![0u32, 1, 0x7F, 0xFF]),
            (2, vec![0, 0x1FF, 0x8000, 0xFFFF]),
            (4, vec![0, 1, 0x8000_0000, 0xFFFF_FFFF]),
        ] {
            for v in values {
                let bytes = le_bytes(v, width).unwrap();
                assert_eq!(bytes.len(), width);
                assert_eq!(from_le_bytes(&bytes).unwrap(), v);
            }
        }
    }

    #[test]
    fn test_le_bytes_truncates_and_orders() {
        assert_eq!(le_bytes(0x1234_5678, 2).unwrap(), vec![0x78, 0x56]);
        assert_eq!(le_bytes(0x1234_5678, 0).unwrap(), Vec::<u8>::new());
        assert!(le_bytes(1, 5).is_err());
        assert!(from_le_bytes(&[0; 5]).is_err());
    }

    #[test]
    fn test_to_byte_wraps() {
        assert_eq!(to_byte(0x1FF), 0xFF);
        assert_eq!(to_byte(256), 0);
        assert_eq!(to_byte(-1), 0xFF);
    }

    #[test]
    fn test_control_report_ids() {
        assert_eq!(control::OUT_REPORT_ID, 0x00);
        assert_eq!(control::IN_REPORT_ID, 0x01);
    }
}
