//! Device discovery for Grizzly Bear controllers

use std::ffi::CString;
use std::sync::Arc;

use hidapi::HidApi;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::hid_wired::HidWiredTransport;
use crate::printer::{PrinterConfig, PrinterTransport};
use crate::protocol::GET_ADDR_PACKET;
use crate::types::{ControllerConfig, DiscoveredDevice, TransportDeviceInfo};
use crate::Transport;

/// Device discovery abstraction
pub trait DeviceDiscovery: Send + Sync {
    /// List currently available devices
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError>;

    /// Open a specific device
    fn open_device(&self, device: &DiscoveredDevice) -> Result<Arc<dyn Transport>, TransportError>;
}

/// Result of asking a controller for its bus address
#[derive(Debug, Clone)]
pub struct ProbedDevice {
    /// The device that was probed
    pub device: DiscoveredDevice,
    /// ADDRESS_LIST value, `None` if the probe failed
    pub address_register: Option<u8>,
}

/// HID device discovery for wired controllers
pub struct HidDiscovery {
    /// VID/PID and bus address to look for
    config: ControllerConfig,
    /// Optional printer config for monitoring mode - wraps transports automatically
    printer_config: Option<PrinterConfig>,
}

impl Default for HidDiscovery {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            printer_config: None,
        }
    }

    /// Create with printer config for monitoring mode
    /// All transports opened via open_device() will be wrapped with Printer
    pub fn with_printer_config(config: ControllerConfig, printer: PrinterConfig) -> Self {
        Self {
            config,
            printer_config: Some(printer),
        }
    }

    /// The controller selection this discovery uses
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Read the ADDRESS_LIST register through an opened transport
    ///
    /// The response's first data byte is the controller's address shifted
    /// left by one.
    pub fn probe_address(transport: &dyn Transport) -> Result<u8, TransportError> {
        let resp = transport.exchange(&GET_ADDR_PACKET, 1)?;
        resp.first()
            .copied()
            .ok_or(TransportError::ShortResponse { expected: 1, got: 0 })
    }

    /// Open every matching device and read its address register
    pub fn probe_devices(&self) -> Result<Vec<ProbedDevice>, TransportError> {
        let devices = self.list_devices()?;
        let mut probed = Vec::with_capacity(devices.len());

        for device in devices {
            let address_register = match self.open_raw(&device) {
                Ok(transport) => match Self::probe_address(&transport) {
                    Ok(value) => {
                        debug!(
                            "Probe {}: ADDRESS_LIST=0x{:02X}",
                            device.info.device_path, value
                        );
                        Some(value)
                    }
                    Err(e) => {
                        warn!("Probe {}: error {}", device.info.device_path, e);
                        None
                    }
                },
                Err(e) => {
                    warn!("Probe {}: failed to open: {}", device.info.device_path, e);
                    None
                }
            };
            probed.push(ProbedDevice {
                device,
                address_register,
            });
        }

        info!(
            "Probed {} devices: {} responsive",
            probed.len(),
            probed.iter().filter(|p| p.address_register.is_some()).count()
        );
        Ok(probed)
    }

    /// Open the controller selected by the configuration
    ///
    /// A single matching device is opened without probing. With several,
    /// the one whose ADDRESS_LIST register equals `address << 1` is chosen.
    pub fn open_preferred(&self) -> Result<Arc<dyn Transport>, TransportError> {
        let mut devices = self.list_devices()?;

        match devices.len() {
            0 => Err(TransportError::DeviceNotFound(format!(
                "No Grizzly controller found (VID={:04X} PID={:04X})",
                self.config.vendor_id, self.config.product_id
            ))),
            1 => {
                let device = devices.remove(0);
                info!("Single controller at {}", device.info.device_path);
                self.open_device(&device)
            }
            n => {
                let wanted = self.config.address_register_value();
                info!(
                    "{} controllers found, selecting address 0x{:02X}",
                    n, self.config.address
                );
                let chosen = self
                    .probe_devices()?
                    .into_iter()
                    .find(|p| p.address_register == Some(wanted))
                    .ok_or_else(|| {
                        TransportError::DeviceNotFound(format!(
                            "No controller with address 0x{:02X}",
                            self.config.address
                        ))
                    })?;
                let mut device = chosen.device;
                device.info.address = Some(self.config.address);
                self.open_device(&device)
            }
        }
    }

    /// Open without the printer wrapper (used for probing)
    fn open_raw(&self, device: &DiscoveredDevice) -> Result<HidWiredTransport, TransportError> {
        let api = HidApi::new()?;
        let path = CString::new(device.info.device_path.as_str())
            .map_err(|_| TransportError::DeviceNotFound(device.info.device_path.clone()))?;
        let hid = api.open_path(&path)?;
        Ok(HidWiredTransport::new(hid, device.info.clone()))
    }
}

impl DeviceDiscovery for HidDiscovery {
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            let vid = device_info.vendor_id();
            let pid = device_info.product_id();

            if vid != self.config.vendor_id || pid != self.config.product_id {
                continue;
            }

            let path = device_info.path().to_string_lossy().to_string();
            let serial = device_info.serial_number().map(|s| s.to_string());
            let product_name = device_info.product_string().map(|s| s.to_string());

            debug!("Found device: VID={:04X} PID={:04X} path={}", vid, pid, path);

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid,
                    pid,
                    device_path: path,
                    serial,
                    product_name,
                    address: None,
                },
            });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    fn open_device(&self, device: &DiscoveredDevice) -> Result<Arc<dyn Transport>, TransportError> {
        let transport: Arc<dyn Transport> = Arc::new(self.open_raw(device)?);
        info!("Opened controller at {}", device.info.device_path);

        Ok(match &self.printer_config {
            Some(config) => PrinterTransport::wrap(transport, config.clone()),
            None => transport,
        })
    }
}
