// CLI definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use grizzly::{ControlMode, DriveMode};
use grizzly_transport::{DEFAULT_ADDRESS, PRODUCT_ID, VENDOR_ID};

#[derive(Parser)]
#[command(name = "grizzly-ctl")]
#[command(author, version, about = "Grizzly Bear motor controller driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// USB vendor ID
    #[arg(long, global = true, default_value_t = VENDOR_ID, value_parser = parse_u16)]
    pub vid: u16,

    /// USB product ID
    #[arg(long, global = true, default_value_t = PRODUCT_ID, value_parser = parse_u16)]
    pub pid: u16,

    /// Controller bus address (used when several controllers are attached)
    #[arg(short, long, global = true, default_value_t = DEFAULT_ADDRESS, value_parser = parse_u8)]
    pub address: u8,

    /// Enable transport monitoring (prints every packet and response)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump alongside decoded output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Filter monitor output (all, writes, reads, reg=0xNN)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Query Commands ===
    /// Show device, telemetry and PID gains
    #[command(visible_alias = "i")]
    Info,

    /// List attached controllers and their bus addresses
    #[command(visible_aliases = ["ls"])]
    List,

    /// Read motor current in amps
    #[command(visible_alias = "amps")]
    Current {
        /// Also print the raw sensor value
        #[arg(long)]
        raw: bool,
    },

    /// Read encoder count
    #[command(visible_alias = "enc")]
    Encoder,

    /// Read PID gains
    ReadPid,

    /// Poll uptime and report whether the controller rebooted
    ResetCheck {
        /// Number of polls
        #[arg(short, long, default_value_t = 2)]
        count: u32,
        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },

    // === Set Commands ===
    /// Set control and drive mode
    Mode {
        #[arg(value_enum)]
        control: ControlArg,
        #[arg(value_enum, default_value_t = DriveArg::Brake)]
        drive: DriveArg,
    },

    /// Set the drive setpoint (PWM, speed or position depending on mode)
    Target {
        #[arg(allow_negative_numbers = true)]
        setpoint: i32,
    },

    /// Limit acceleration (PWM change per ms, 1-142)
    LimitAccel {
        #[arg(allow_negative_numbers = true)]
        accel: i32,
    },

    /// Limit motor current in amps
    LimitCurrent { amps: f64 },

    /// Set PID gains
    Pid {
        #[arg(allow_negative_numbers = true)]
        kp: f64,
        #[arg(allow_negative_numbers = true)]
        ki: f64,
        #[arg(allow_negative_numbers = true)]
        kd: f64,
    },

    /// Overwrite the encoder count
    WriteEncoder {
        #[arg(allow_negative_numbers = true, default_value_t = 0)]
        count: i32,
    },

    // === Raw register access ===
    /// Read raw registers
    ReadReg {
        #[arg(value_parser = parse_u8)]
        addr: u8,
        /// Number of bytes (max 127)
        #[arg(default_value_t = 1)]
        len: usize,
    },

    /// Write raw registers (max 14 bytes)
    WriteReg {
        #[arg(value_parser = parse_u8)]
        addr: u8,
        #[arg(value_parser = parse_u8, required = true)]
        data: Vec<u8>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ControlArg {
    /// Raw PWM drive
    NoPid,
    Speed,
    Position,
}

impl From<ControlArg> for ControlMode {
    fn from(arg: ControlArg) -> Self {
        match arg {
            ControlArg::NoPid => ControlMode::NoPid,
            ControlArg::Speed => ControlMode::SpeedPid,
            ControlArg::Position => ControlMode::PositionPid,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DriveArg {
    Coast,
    Brake,
    BrakeCoast,
}

impl From<DriveArg> for DriveMode {
    fn from(arg: DriveArg) -> Self {
        match arg {
            DriveArg::Coast => DriveMode::Coast,
            DriveArg::Brake => DriveMode::Brake,
            DriveArg::BrakeCoast => DriveMode::BrakeCoast,
        }
    }
}

/// Parse a decimal or 0x-prefixed hex byte
fn parse_u8(s: &str) -> Result<u8, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid byte '{s}': {e}"))
}

/// Parse a decimal or 0x-prefixed hex u16
fn parse_u16(s: &str) -> Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid value '{s}': {e}"))
}
