//! wifiprov - headless wifi provisioning through a temporary access point

use std::process::ExitCode;

use clap::Parser;
use wifiprov_cli::cli::Cli;
use wifiprov_cli::domain::{ConfigError, LockError};
use wifiprov_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    wifiprov_cli::logging::init(cli.verbose);
    let json = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match json::format_error(&message, error_code(&e)) {
                Ok(body) if json => println!("{body}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Machine-readable code for `--json` error output.
fn error_code(err: &anyhow::Error) -> &'static str {
    if err.chain().any(|e| e.is::<LockError>()) {
        "lock_held"
    } else if err.chain().any(|e| e.is::<ConfigError>()) {
        "invalid_config"
    } else {
        "error"
    }
}
