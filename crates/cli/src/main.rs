//! open-dpcutil CLI: command-line register access for Digilent parallel-port devices.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use open_dpcutil_core::session::Session;
use open_dpcutil_core::{device, plan, transfer};

mod native;
use native::NativeLink;

#[derive(Parser)]
#[command(
    name = "open-dpcutil",
    version,
    about = "Register access for Digilent DPCUTIL devices"
)]
struct Cli {
    /// Device name; defaults to the device table's default entry.
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the DPCUTIL device configuration dialog.
    Configure,
    /// Print the default device's name.
    DefaultDevice,
    /// Read a single register.
    Get {
        /// Register address (0-255).
        addr: u8,
    },
    /// Write a single register.
    Put {
        /// Register address (0-255).
        addr: u8,
        /// Byte value to write.
        value: u8,
    },
    /// Read and print all 256 registers.
    Dump,
    /// Apply a JSON write plan, then read back the written registers.
    Run {
        /// Path to the plan file.
        plan: PathBuf,
    },
    /// Write a starter plan file to the given path.
    InitPlan {
        /// Path for the new plan file.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Writing a plan template needs no hardware.
        Commands::InitPlan { path } => {
            plan::save_plan(&path, &plan::WritePlan::default())?;
            println!("Wrote starter plan to {}", path.display());
            Ok(())
        }
        command => {
            let session = Session::start(NativeLink::load()?)?;
            run(session.link(), command, cli.device)
        }
    }
}

fn run(link: &NativeLink, command: Commands, device: Option<String>) -> Result<()> {
    match command {
        Commands::Configure => {
            device::configure_devices(link)?;
            println!("Device table updated.");
        }
        Commands::DefaultDevice => {
            let name = target_device(link, device)?;
            println!("Default device: {name}");
        }
        Commands::Get { addr } => {
            let name = target_device(link, device)?;
            let value = transfer::get_single_register(link, addr, &name)?;
            println!("REGISTER {addr} READ: {value}");
        }
        Commands::Put { addr, value } => {
            let name = target_device(link, device)?;
            transfer::put_single_register(link, addr, value, &name)?;
            println!("REGISTER {addr} WRITE: {value}");
        }
        Commands::Dump => {
            let name = target_device(link, device)?;
            let port = transfer::DataPort::open(link, &name)?;
            for addr in 0u8..=255 {
                let value = port.get_reg(addr)?;
                println!("REGISTER {addr} READ: {value}");
            }
            port.check_first_error()?;
            port.close()?;
        }
        Commands::Run { plan: plan_path } => {
            let plan = plan::load_plan(&plan_path)?;
            let name = target_device(link, device)?;
            println!("Applying plan '{}' to {name}", plan.name);
            for write in &plan.writes {
                transfer::put_single_register(link, write.addr, write.value, &name)?;
                println!("REGISTER {} WRITE: {}", write.addr, write.value);
            }
            for write in &plan.writes {
                let value = transfer::get_single_register(link, write.addr, &name)?;
                println!("REGISTER {} READ: {}", write.addr, value);
            }
            println!("DONE!");
        }
        Commands::InitPlan { .. } => {}
    }

    Ok(())
}

/// Resolve the device to talk to: an explicit `--device` name, or the
/// device table's default entry.
fn target_device(
    link: &NativeLink,
    device: Option<String>,
) -> open_dpcutil_core::error::Result<String> {
    match device {
        Some(name) => Ok(name),
        None => {
            let device_id = device::default_device(link)?;
            device::device_name(link, device_id)
        }
    }
}
