//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::PrivilegeMode;

/// Headless wifi provisioning through a temporary access point
#[derive(Parser)]
#[command(
    name = "wifiprov",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format (status, config, version)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log diagnostics at debug level to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file [default: $WIFIPROV_CONFIG or /etc/wifiprov/config.yaml]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How privileged commands are run: elevated (sudo) or inherited
    #[arg(long, global = true, value_name = "MODE")]
    pub privilege: Option<PrivilegeMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the device: exit if already online, otherwise start the setup access point
    Run,

    /// Show what a run would find, without changing anything
    Status,

    /// Control a service unit
    #[command(subcommand)]
    Service(commands::service::ServiceCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command
    /// fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            config,
            privilege,
            command,
        } = self;

        // These two must work without a loadable config.
        match &command {
            Command::Version => return Ok(commands::version::run(json)),
            Command::Config(commands::config::ConfigCommand::Path) => {
                return Ok(commands::config::path(config.as_deref(), json));
            }
            _ => {}
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
            privilege,
        })?;

        match command {
            Command::Run => commands::run::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Service(cmd) => commands::service::run(&app, cmd).await,
            Command::Config(_) => commands::config::show(&app),
            Command::Version => Ok(commands::version::run(json)),
        }
    }
}
