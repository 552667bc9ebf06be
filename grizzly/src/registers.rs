//! Register map and mode constants

use grizzly_transport::protocol::register;

/// Documented controller registers. Gaps between addresses are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    Mode = register::MODE,
    Speed = register::SPEED,
    MotorCurrent = register::MOTOR_CURRENT,
    EncoderCount = register::ENCODER_COUNT,
    PConstant = register::P_CONSTANT,
    IConstant = register::I_CONSTANT,
    DConstant = register::D_CONSTANT,
    Timeout = register::TIMEOUT,
    CurrentLimit = register::CURRENT_LIMIT,
    AccelLimit = register::ACCEL_LIMIT,
    Uptime = register::UPTIME,
    EnableUsb = register::ENABLE_USB,
    AddressList = register::ADDRESS_LIST,
}

impl Register {
    /// All registers, in address order
    pub const ALL: &'static [Register] = &[
        Register::Mode,
        Register::Speed,
        Register::MotorCurrent,
        Register::EncoderCount,
        Register::PConstant,
        Register::IConstant,
        Register::DConstant,
        Register::Timeout,
        Register::CurrentLimit,
        Register::AccelLimit,
        Register::Uptime,
        Register::EnableUsb,
        Register::AddressList,
    ];

    /// Register address
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// Number of bytes the register spans
    pub fn width(self) -> usize {
        match self {
            Register::Mode | Register::AccelLimit | Register::EnableUsb => 1,
            Register::AddressList => 1,
            Register::MotorCurrent | Register::Timeout | Register::CurrentLimit => 2,
            Register::EncoderCount | Register::Uptime => 4,
            Register::PConstant | Register::IConstant | Register::DConstant => 4,
            Register::Speed => 5,
        }
    }

    /// Look up a register by address
    pub fn from_addr(addr: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.addr() == addr)
    }

    /// Firmware name
    pub fn name(self) -> &'static str {
        register::name(self.addr())
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg.addr()
    }
}

/// Closed-loop control mode (bits 1-2 of the Mode register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlMode {
    /// Setpoint is a raw PWM drive level
    NoPid = 0x02,
    SpeedPid = 0x04,
    PositionPid = 0x06,
}

/// Braking behaviour (bits 4-5 of the Mode register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DriveMode {
    Coast = 0x00,
    Brake = 0x10,
    BrakeCoast = 0x20,
}

/// Bit 0 of the Mode register; always set when writing a mode
pub const MODE_ENABLE: u8 = 0x01;

/// Compose the Mode register byte
pub fn mode_byte(control: ControlMode, drive: DriveMode) -> u8 {
    MODE_ENABLE | control as u8 | drive as u8
}
