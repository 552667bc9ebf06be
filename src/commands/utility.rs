//! Utility command handlers (list, raw register access).

use grizzly::{Grizzly, Register};
use grizzly_transport::{is_grizzly, HidDiscovery};

use super::CommandResult;

/// List attached controllers with their bus addresses
pub fn list(discovery: &HidDiscovery) -> CommandResult {
    let probed = discovery.probe_devices()?;
    if probed.is_empty() {
        let config = discovery.config();
        println!(
            "No controllers found (VID={:04X} PID={:04X})",
            config.vendor_id, config.product_id
        );
        return Ok(());
    }
    for p in probed {
        let info = &p.device.info;
        let address = match p.address_register {
            Some(value) => format!("0x{:02X}", value >> 1),
            None => "?".to_string(),
        };
        let name = match info.product_name.as_deref() {
            Some(name) => name,
            None if is_grizzly(info.vid, info.pid) => "Grizzly Bear",
            None => "unknown",
        };
        println!(
            "{:04X}:{:04X}  address={}  {}  {}  {}",
            info.vid,
            info.pid,
            address,
            name,
            info.device_path,
            info.serial.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// Read raw registers
pub fn read_reg(grizzly: &Grizzly, addr: u8, len: usize) -> CommandResult {
    let data = grizzly.read_register(addr, len)?;
    let name = Register::from_addr(addr).map_or("", |r| r.name());
    println!("0x{addr:02X} {name} {data:02X?}");
    Ok(())
}

/// Write raw registers
pub fn write_reg(grizzly: &Grizzly, addr: u8, data: &[u8]) -> CommandResult {
    grizzly.write_register(addr, data)?;
    println!("Wrote {} bytes to 0x{addr:02X}", data.len());
    Ok(())
}
