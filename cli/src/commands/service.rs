//! `wifiprov service` — operator access to the service controller.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ServiceControl;
use crate::domain::ServiceUnit;

/// Service subcommands.
#[derive(Subcommand)]
pub enum ServiceCommand {
    /// Start a unit on boot
    Enable {
        /// Unit name, e.g. `hostapd`
        unit: String,
    },
    /// Stop starting a unit on boot
    Disable {
        /// Unit name
        unit: String,
    },
    /// Restart a unit
    Restart {
        /// Unit name
        unit: String,
    },
    /// Stop a unit
    Stop {
        /// Unit name
        unit: String,
    },
    /// Reload unit definitions from disk (daemon-reload)
    Reload,
}

/// Run the service command.
///
/// # Errors
///
/// Returns the service manager's failure, carrying its diagnostic text.
pub async fn run(app: &AppContext, cmd: ServiceCommand) -> Result<ExitCode> {
    execute(&app.service_controller(), cmd).await?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatch one subcommand to `services`.
///
/// # Errors
///
/// Propagates the controller's error unchanged.
pub async fn execute(services: &impl ServiceControl, cmd: ServiceCommand) -> Result<()> {
    match cmd {
        ServiceCommand::Enable { unit } => services.enable(&ServiceUnit::new(unit)).await,
        ServiceCommand::Disable { unit } => services.disable(&ServiceUnit::new(unit)).await,
        ServiceCommand::Restart { unit } => services.restart(&ServiceUnit::new(unit)).await,
        ServiceCommand::Stop { unit } => services.stop(&ServiceUnit::new(unit)).await,
        ServiceCommand::Reload => services.reload_unit_cache().await,
    }
}
