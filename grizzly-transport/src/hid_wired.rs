//! HID transport implementation for direct USB connection

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::protocol::{self, control, Packet, PACKET_SIZE};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for a wired USB controller
///
/// Commands go out as feature report 0 (SET_REPORT, wValue 0x0300) and
/// responses come back as feature report 1 (GET_REPORT, wValue 0x0301), which
/// is exactly the control-transfer pair the firmware listens on.
pub struct HidWiredTransport {
    /// Feature interface; `None` once closed
    device: Mutex<Option<HidDevice>>,
    /// Device information
    info: TransportDeviceInfo,
}

impl HidWiredTransport {
    /// Create a new wired transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(Some(device)),
            info,
        }
    }

    /// Outbound SET_REPORT transfer
    fn write_packet(device: &HidDevice, packet: &Packet) -> Result<(), TransportError> {
        let mut report = [0u8; PACKET_SIZE + 1];
        report[0] = control::OUT_REPORT_ID;
        report[1..].copy_from_slice(packet);
        device.send_feature_report(&report)?;
        Ok(())
    }
}

impl Transport for HidWiredTransport {
    fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        let guard = self.device.lock();
        let device = guard.as_ref().ok_or(TransportError::Closed)?;
        debug!("Sending packet: {:02X?}", packet);
        Self::write_packet(device, packet)
    }

    fn exchange(&self, packet: &Packet, num_bytes: usize) -> Result<Vec<u8>, TransportError> {
        // Hold the device for both transfers so the response pairs with this request
        let guard = self.device.lock();
        let device = guard.as_ref().ok_or(TransportError::Closed)?;
        debug!("Exchanging packet: {:02X?}", packet);
        Self::write_packet(device, packet)?;

        let mut buf = vec![0u8; num_bytes + 1];
        buf[0] = control::IN_REPORT_ID;
        let got = device.get_feature_report(&mut buf)?;
        debug!("Got response: {:02X?}", &buf[..got.min(buf.len())]);
        protocol::strip_response(&buf, got, num_bytes)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        let guard = self.device.lock();
        match guard.as_ref() {
            Some(device) => device.get_product_string().is_ok(),
            None => false,
        }
    }

    fn close(&self) -> Result<(), TransportError> {
        // HidDevice closes its handle on drop
        if self.device.lock().take().is_some() {
            info!("Closed device {}", self.info.device_path);
        }
        Ok(())
    }
}
