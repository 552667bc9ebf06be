//! Command handlers for the CLI application.
//!
//! - `query`: read-only commands (info, current, encoder, read-pid, reset-check)
//! - `set`: commands that change controller state (mode, target, limits, pid)
//! - `utility`: device listing and raw register access

pub mod query;
pub mod set;
pub mod utility;

use grizzly::{Grizzly, GrizzlyError};
use tracing::warn;
use grizzly_transport::{ControllerConfig, HidDiscovery, PacketFilter, PrinterConfig};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Create printer config if monitoring is enabled
pub fn create_printer_config(
    monitor: bool,
    hex: bool,
    filter: Option<&str>,
) -> anyhow::Result<Option<PrinterConfig>> {
    if !monitor {
        return Ok(None);
    }
    let filter = match filter {
        Some(f) => f.parse::<PacketFilter>().map_err(anyhow::Error::msg)?,
        None => PacketFilter::All,
    };
    Ok(Some(
        PrinterConfig::default().with_hex(hex).with_filter(filter),
    ))
}

/// Build the discovery used by every command
pub fn discovery(config: ControllerConfig, printer_config: Option<PrinterConfig>) -> HidDiscovery {
    match printer_config {
        Some(printer) => HidDiscovery::with_printer_config(config, printer),
        None => HidDiscovery::new(config),
    }
}

/// Open the configured controller and run a closure with it
pub fn with_controller<F>(discovery: &HidDiscovery, f: F) -> CommandResult
where
    F: FnOnce(&Grizzly) -> CommandResult,
{
    let grizzly = Grizzly::open_with(discovery)?;
    finish(f(&grizzly), grizzly.close())
}

/// Combine a command result with the close that follows it
///
/// The command's own error wins; a close failure is only reported when the
/// command succeeded.
fn finish(result: CommandResult, closed: Result<(), GrizzlyError>) -> CommandResult {
    match (result, closed) {
        (Err(e), Err(close_err)) => {
            warn!("Failed to close controller: {}", close_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => Ok(closed?),
    }
}
