//! High-level interface for Grizzly Bear motor controllers
//!
//! This crate provides the register map and typed operations (mode, setpoint,
//! limits, PID gains, telemetry) on top of any [`Transport`].
//!
//! Every operation is a blocking request/response. The controller has no
//! packet ids, so [`Grizzly`] serialises transactions through its own lock and
//! performs no retries: a failed transfer is returned to the caller as-is.

pub mod error;
pub mod registers;
pub mod units;

pub use error::GrizzlyError;
pub use registers::{mode_byte, ControlMode, DriveMode, Register};
pub use units::PidConstants;

pub use grizzly_transport::{ControllerConfig, TransportDeviceInfo};

use grizzly_transport::protocol::{self, to_byte};
use grizzly_transport::{BoxedTransport, HidDiscovery, Transport};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Register client for one controller
///
/// Owns the transport for its whole lifetime. Construction runs the session
/// start sequence; [`Grizzly::close`] releases the device, after which every
/// call fails with [`GrizzlyError::DeviceClosed`].
pub struct Grizzly {
    /// `None` once closed; the lock admits one transaction at a time
    transport: Mutex<Option<BoxedTransport>>,
    /// Last uptime tick observed by `has_reset`
    last_uptime: Mutex<u32>,
}

impl Grizzly {
    /// Wrap an opened transport and initialise the session
    ///
    /// Enables USB control (EnableUSB = 1) and disables the communication
    /// watchdog (Timeout = 0).
    pub fn new(transport: BoxedTransport) -> Result<Self, GrizzlyError> {
        let grizzly = Self {
            transport: Mutex::new(Some(transport)),
            last_uptime: Mutex::new(0),
        };
        grizzly.write_as_int(Register::EnableUsb, 1, Register::EnableUsb.width())?;
        grizzly.write_as_int(Register::Timeout, 0, Register::Timeout.width())?;
        info!("Controller session initialised");
        Ok(grizzly)
    }

    /// Discover, open and initialise the controller selected by `config`
    pub fn open(config: &ControllerConfig) -> Result<Self, GrizzlyError> {
        Self::open_with(&HidDiscovery::new(*config))
    }

    /// Open through a preconfigured discovery (e.g. with monitoring enabled)
    pub fn open_with(discovery: &HidDiscovery) -> Result<Self, GrizzlyError> {
        let transport = discovery.open_preferred()?;
        Self::new(transport)
    }

    /// Run `f` against the transport while holding the transaction lock
    fn with_transport<T>(
        &self,
        f: impl FnOnce(&dyn Transport) -> Result<T, GrizzlyError>,
    ) -> Result<T, GrizzlyError> {
        let guard = self.transport.lock();
        let transport = guard.as_ref().ok_or(GrizzlyError::DeviceClosed)?;
        f(transport.as_ref())
    }

    /// Device information of the underlying transport
    pub fn device_info(&self) -> Result<TransportDeviceInfo, GrizzlyError> {
        self.with_transport(|t| Ok(t.device_info().clone()))
    }

    /// Check if the device is still reachable
    pub fn is_connected(&self) -> bool {
        self.transport
            .lock()
            .as_ref()
            .is_some_and(|t| t.is_connected())
    }

    /// Check if [`Grizzly::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.transport.lock().is_none()
    }

    /// Release the device handle
    pub fn close(&self) -> Result<(), GrizzlyError> {
        let transport = self.transport.lock().take();
        match transport {
            Some(t) => {
                t.close()?;
                info!("Controller closed");
                Ok(())
            }
            None => Err(GrizzlyError::DeviceClosed),
        }
    }

    // === Raw registers ===

    /// Write `data` to consecutive registers starting at `addr` (max 14 bytes)
    pub fn write_register(&self, addr: impl Into<u8>, data: &[u8]) -> Result<(), GrizzlyError> {
        let packet = protocol::encode_write(addr.into(), data)?;
        self.with_transport(|t| Ok(t.send(&packet)?))
    }

    /// Read `num_bytes` consecutive registers starting at `addr` (max 127)
    pub fn read_register(
        &self,
        addr: impl Into<u8>,
        num_bytes: usize,
    ) -> Result<Vec<u8>, GrizzlyError> {
        let packet = protocol::encode_read(addr.into(), num_bytes)?;
        self.with_transport(|t| Ok(t.exchange(&packet, num_bytes)?))
    }

    /// Read a little-endian unsigned integer spanning `num_bytes` registers
    pub fn read_as_int(&self, addr: impl Into<u8>, num_bytes: usize) -> Result<u32, GrizzlyError> {
        if num_bytes > protocol::MAX_INT_WIDTH {
            return Err(grizzly_transport::ProtocolError::WidthTooLarge {
                width: num_bytes,
                max: protocol::MAX_INT_WIDTH,
            }
            .into());
        }
        let buf = self.read_register(addr, num_bytes)?;
        Ok(protocol::from_le_bytes(&buf)?)
    }

    /// Write `value` as `num_bytes` little-endian bytes; higher bytes are dropped
    pub fn write_as_int(
        &self,
        addr: impl Into<u8>,
        value: u32,
        num_bytes: usize,
    ) -> Result<(), GrizzlyError> {
        let buf = protocol::le_bytes(value, num_bytes)?;
        self.write_register(addr, &buf)
    }

    // === Drive control ===

    /// Set control and drive mode
    ///
    /// The setpoint given to [`Grizzly::set_target`] is interpreted according
    /// to the control mode.
    pub fn set_mode(&self, control: ControlMode, drive: DriveMode) -> Result<(), GrizzlyError> {
        debug!("Setting mode {:?} / {:?}", control, drive);
        self.write_register(Register::Mode, &[mode_byte(control, drive)])
    }

    /// Set the drive setpoint
    ///
    /// Only the low 16 bits are kept, matching the register width. They land
    /// in payload bytes 2-3 of the 5-byte Speed write; the rest stay zero.
    pub fn set_target(&self, setpoint: i32) -> Result<(), GrizzlyError> {
        let value = setpoint as i64;
        let buf = [0, 0, to_byte(value), to_byte(value >> 8), 0];
        self.write_register(Register::Speed, &buf)
    }

    /// Limit acceleration in PWM change per millisecond (1-142)
    pub fn limit_acceleration(&self, accel: i32) -> Result<(), GrizzlyError> {
        if accel <= 0 || accel >= units::MAX_ACCEL_LIMIT {
            return Err(GrizzlyError::InvalidParameter(format!(
                "Acceleration limit must be between 1 and {}, got {}",
                units::MAX_ACCEL_LIMIT - 1,
                accel
            )));
        }
        let reg = Register::AccelLimit;
        self.write_as_int(reg, accel as u32, reg.width())
    }

    /// Limit motor current, in amps
    pub fn limit_current(&self, amps: f64) -> Result<(), GrizzlyError> {
        let raw = units::amps_to_limit(amps).ok_or_else(|| {
            GrizzlyError::InvalidParameter(format!(
                "Current limit must be a positive number of amps, got {}",
                amps
            ))
        })?;
        debug!("Current limit {} A -> raw {}", amps, raw);
        let reg = Register::CurrentLimit;
        self.write_as_int(reg, raw as u32, reg.width())
    }

    // === PID ===

    /// Store PID gains, written P, I, then D
    ///
    /// The three writes are independent: if one fails the controller may hold
    /// a mix of old and new gains. Re-read with
    /// [`Grizzly::read_pid_constants`] after an error.
    pub fn init_pid(&self, kp: f64, ki: f64, kd: f64) -> Result<(), GrizzlyError> {
        let to_fixed = |name: &str, value: f64| {
            units::to_fixed_point(value).ok_or_else(|| {
                GrizzlyError::InvalidParameter(format!(
                    "{} gain {} does not fit 16.16 fixed point",
                    name, value
                ))
            })
        };
        let p = to_fixed("P", kp)?;
        let i = to_fixed("I", ki)?;
        let d = to_fixed("D", kd)?;

        for (reg, value) in [
            (Register::PConstant, p),
            (Register::IConstant, i),
            (Register::DConstant, d),
        ] {
            self.write_as_int(reg, value as u32, reg.width())?;
        }
        Ok(())
    }

    /// Read back the stored PID gains
    pub fn read_pid_constants(&self) -> Result<PidConstants, GrizzlyError> {
        let read = |reg: Register| -> Result<f64, GrizzlyError> {
            let raw = self.read_as_int(reg, reg.width())? as i32;
            Ok(units::from_fixed_point(raw))
        };
        Ok(PidConstants::new(
            read(Register::PConstant)?,
            read(Register::IConstant)?,
            read(Register::DConstant)?,
        ))
    }

    // === Telemetry ===

    /// Raw current sensor reading
    pub fn read_raw_motor_current(&self) -> Result<u16, GrizzlyError> {
        let reg = Register::MotorCurrent;
        Ok(self.read_as_int(reg, reg.width())? as u16)
    }

    /// Motor current in amps; negative for reverse current
    pub fn read_motor_current(&self) -> Result<f64, GrizzlyError> {
        Ok(units::raw_to_amps(self.read_raw_motor_current()?))
    }

    /// Encoder count in ticks (64 per motor spindle revolution)
    pub fn read_encoder(&self) -> Result<i32, GrizzlyError> {
        let reg = Register::EncoderCount;
        Ok(self.read_as_int(reg, reg.width())? as i32)
    }

    /// Overwrite the encoder count, e.g. to re-zero the position
    pub fn write_encoder(&self, count: i32) -> Result<(), GrizzlyError> {
        let reg = Register::EncoderCount;
        self.write_as_int(reg, count as u32, reg.width())
    }

    /// Ticks since the controller booted
    pub fn read_uptime(&self) -> Result<u32, GrizzlyError> {
        self.read_as_int(Register::Uptime, Register::Uptime.width())
    }

    /// Check whether the controller rebooted since the previous call
    ///
    /// Reports a reset when the uptime counter did not advance. The stored
    /// tick count is replaced by the new reading either way. A counter that
    /// wraps all the way past the previous reading looks like no reset.
    pub fn has_reset(&self) -> Result<bool, GrizzlyError> {
        let mut last = self.last_uptime.lock();
        let current = self.read_uptime()?;
        let reset = current <= *last;
        if reset {
            debug!("Uptime went from {} to {}: controller reset", *last, current);
        }
        *last = current;
        Ok(reset)
    }

    /// Uptime recorded by the last [`Grizzly::has_reset`] call
    pub fn last_uptime(&self) -> u32 {
        *self.last_uptime.lock()
    }
}
