//! Query (read-only) command handlers.

use std::thread;
use std::time::Duration;

use grizzly::Grizzly;

use super::CommandResult;

/// Show device info, telemetry and PID gains
pub fn info(grizzly: &Grizzly) -> CommandResult {
    let info = grizzly.device_info()?;
    println!("Device:  VID={:04X} PID={:04X}", info.vid, info.pid);
    println!("Path:    {}", info.device_path);
    if let Some(name) = &info.product_name {
        println!("Product: {name}");
    }
    if let Some(addr) = info.address {
        println!("Address: 0x{addr:02X}");
    }
    println!(
        "Link:    {}",
        if grizzly.is_connected() { "connected" } else { "not responding" }
    );

    println!("Uptime:  {} ticks", grizzly.read_uptime()?);
    println!("Encoder: {} ticks", grizzly.read_encoder()?);
    println!("Current: {:.3} A", grizzly.read_motor_current()?);

    let pid = grizzly.read_pid_constants()?;
    println!("PID:     P={} I={} D={}", pid.kp, pid.ki, pid.kd);
    Ok(())
}

/// Read motor current
pub fn current(grizzly: &Grizzly, raw: bool) -> CommandResult {
    let value = grizzly.read_raw_motor_current()?;
    let amps = grizzly::units::raw_to_amps(value);
    if raw {
        println!("Current: {amps:.3} A (raw {value})");
    } else {
        println!("Current: {amps:.3} A");
    }
    Ok(())
}

/// Read encoder count
pub fn encoder(grizzly: &Grizzly) -> CommandResult {
    println!("Encoder: {}", grizzly.read_encoder()?);
    Ok(())
}

/// Read PID gains
pub fn read_pid(grizzly: &Grizzly) -> CommandResult {
    let pid = grizzly.read_pid_constants()?;
    println!("P: {}", pid.kp);
    println!("I: {}", pid.ki);
    println!("D: {}", pid.kd);
    Ok(())
}

/// Poll the uptime counter and report resets
pub fn reset_check(grizzly: &Grizzly, count: u32, interval_ms: u64) -> CommandResult {
    for n in 0..count {
        if n > 0 {
            thread::sleep(Duration::from_millis(interval_ms));
        }
        let reset = grizzly.has_reset()?;
        println!(
            "[{n}] uptime={} {}",
            grizzly.last_uptime(),
            if reset { "RESET" } else { "ok" }
        );
    }
    Ok(())
}
