//! Grizzly Bear Motor Controller CLI
//!
//! A command-line interface for driving and inspecting Grizzly controllers.

use clap::Parser;
use grizzly_transport::ControllerConfig;
use tracing::debug;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::{query, set, utility, with_controller};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ControllerConfig {
        vendor_id: cli.vid,
        product_id: cli.pid,
        address: cli.address,
    };
    debug!("Using {:?}", config);

    let printer_config =
        commands::create_printer_config(cli.monitor, cli.hex, cli.filter.as_deref())?;
    let discovery = commands::discovery(config, printer_config);

    match cli.command {
        None | Some(Commands::Info) => with_controller(&discovery, query::info),
        Some(Commands::List) => utility::list(&discovery),

        // === Query Commands ===
        Some(Commands::Current { raw }) => with_controller(&discovery, |g| query::current(g, raw)),
        Some(Commands::Encoder) => with_controller(&discovery, query::encoder),
        Some(Commands::ReadPid) => with_controller(&discovery, query::read_pid),
        Some(Commands::ResetCheck { count, interval_ms }) => {
            with_controller(&discovery, |g| query::reset_check(g, count, interval_ms))
        }

        // === Set Commands ===
        Some(Commands::Mode { control, drive }) => {
            with_controller(&discovery, |g| set::mode(g, control.into(), drive.into()))
        }
        Some(Commands::Target { setpoint }) => {
            with_controller(&discovery, |g| set::target(g, setpoint))
        }
        Some(Commands::LimitAccel { accel }) => {
            with_controller(&discovery, |g| set::limit_accel(g, accel))
        }
        Some(Commands::LimitCurrent { amps }) => {
            with_controller(&discovery, |g| set::limit_current(g, amps))
        }
        Some(Commands::Pid { kp, ki, kd }) => with_controller(&discovery, |g| set::pid(g, kp, ki, kd)),
        Some(Commands::WriteEncoder { count }) => {
            with_controller(&discovery, |g| set::write_encoder(g, count))
        }

        // === Raw register access ===
        Some(Commands::ReadReg { addr, len }) => {
            with_controller(&discovery, |g| utility::read_reg(g, addr, len))
        }
        Some(Commands::WriteReg { addr, data }) => {
            with_controller(&discovery, |g| utility::write_reg(g, addr, &data))
        }
    }
}
