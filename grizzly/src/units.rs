//! Conversions between physical units and raw register values

/// Fixed-point scale of the PID constant registers (16.16)
pub const PID_SCALE: f64 = 65536.0;

/// ADC reading of the current sensor at zero current
pub const CURRENT_ZERO_OFFSET: f64 = 511.0;

/// Amps per ADC count: 5V over 1024 counts, 66 mV/A sensor
pub const AMPS_PER_COUNT: f64 = (5.0 / 1024.0) * (1000.0 / 66.0);

/// Counts per amp for the current limit register
pub const COUNTS_PER_AMP: f64 = (1024.0 / 5.0) * (66.0 / 1000.0);

/// Exclusive upper bound of the acceleration limit (PWM delta per ms)
pub const MAX_ACCEL_LIMIT: i32 = 143;

/// PID gains as stored on the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidConstants {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidConstants {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Convert a gain to 16.16 fixed point, `None` if it does not fit in an i32
pub fn to_fixed_point(value: f64) -> Option<i32> {
    let scaled = (value * PID_SCALE).round();
    if scaled.is_finite() && scaled >= i32::MIN as f64 && scaled <= i32::MAX as f64 {
        Some(scaled as i32)
    } else {
        None
    }
}

/// Convert a 16.16 fixed-point register value back to a gain
pub fn from_fixed_point(raw: i32) -> f64 {
    raw as f64 / PID_SCALE
}

/// Motor current in amps from the raw sensor reading; negative when reversed
pub fn raw_to_amps(raw: u16) -> f64 {
    AMPS_PER_COUNT * (raw as f64 - CURRENT_ZERO_OFFSET)
}

/// Current limit register value for `amps`, `None` if out of range
pub fn amps_to_limit(amps: f64) -> Option<u16> {
    if amps.is_nan() || amps <= 0.0 {
        return None;
    }
    let raw = (amps * COUNTS_PER_AMP).round();
    if raw <= u16::MAX as f64 {
        Some(raw as u16)
    } else {
        None
    }
}
