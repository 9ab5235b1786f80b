//! `wifiprov config` — show the effective configuration or where it lives.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::infra::config::YamlConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (defaults merged with the file)
    Show,
    /// Print the configuration file path
    Path,
}

/// Run `config show`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn show(app: &AppContext) -> Result<ExitCode> {
    if app.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&app.config).context("JSON serialization failed")?
        );
    } else {
        print!(
            "{}",
            serde_yaml::to_string(&app.config).context("cannot serialize config")?
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `config path`. Works even when the file is missing or invalid.
pub fn path(flag: Option<&Path>, json: bool) -> ExitCode {
    let path = YamlConfigStore::resolve(flag).path();
    if json {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        println!("{}", path.display());
    }
    ExitCode::SUCCESS
}
