//! Set (write) command handlers.

use grizzly::{ControlMode, DriveMode, Grizzly};

use super::CommandResult;

/// Set control and drive mode
pub fn mode(grizzly: &Grizzly, control: ControlMode, drive: DriveMode) -> CommandResult {
    grizzly.set_mode(control, drive)?;
    println!(
        "Mode set to {:?} / {:?} (0x{:02X})",
        control,
        drive,
        grizzly::mode_byte(control, drive)
    );
    Ok(())
}

/// Set drive setpoint
pub fn target(grizzly: &Grizzly, setpoint: i32) -> CommandResult {
    grizzly.set_target(setpoint)?;
    println!("Target set to {setpoint}");
    Ok(())
}

/// Set acceleration limit
pub fn limit_accel(grizzly: &Grizzly, accel: i32) -> CommandResult {
    grizzly.limit_acceleration(accel)?;
    println!("Acceleration limit set to {accel}");
    Ok(())
}

/// Set current limit
pub fn limit_current(grizzly: &Grizzly, amps: f64) -> CommandResult {
    grizzly.limit_current(amps)?;
    println!("Current limit set to {amps} A");
    Ok(())
}

/// Set PID gains and read them back
pub fn pid(grizzly: &Grizzly, kp: f64, ki: f64, kd: f64) -> CommandResult {
    if let Err(e) = grizzly.init_pid(kp, ki, kd) {
        // Some gains may have landed; show what the controller holds now
        if let Ok(stored) = grizzly.read_pid_constants() {
            eprintln!(
                "Stored gains after failure: P={} I={} D={}",
                stored.kp, stored.ki, stored.kd
            );
        }
        return Err(e.into());
    }
    let stored = grizzly.read_pid_constants()?;
    println!(
        "PID set to P={} I={} D={}",
        stored.kp, stored.ki, stored.kd
    );
    Ok(())
}

/// Overwrite encoder count
pub fn write_encoder(grizzly: &Grizzly, count: i32) -> CommandResult {
    grizzly.write_encoder(count)?;
    println!("Encoder set to {count}");
    Ok(())
}
