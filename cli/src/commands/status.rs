//! `wifiprov status` — read-only report of what a run would find.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::device_status::{DeviceStatus, device_status};
use crate::infra::deps::SystemDependencyChecker;
use crate::output::{json, progress};

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the address lookup or dependency check cannot run.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let pb = progress::spinner_for(&app.output, "Checking device...");
    let status = device_status(
        &app.wifi_manager(),
        &app.probe(),
        &SystemDependencyChecker,
        &app.config.dependencies.spec(),
    )
    .await;
    let status = match status {
        Ok(status) => {
            progress::finish_clear(&pb);
            status
        }
        Err(e) => {
            progress::finish_error(&pb, "Device check failed");
            return Err(e);
        }
    };

    if app.is_json() {
        println!("{}", json::render(&status)?);
    } else {
        render_human(app, &status);
    }
    Ok(ExitCode::SUCCESS)
}

fn render_human(app: &AppContext, status: &DeviceStatus) {
    let out = &app.output;
    out.header("Device");
    out.kv("interface", status.interface.as_deref().unwrap_or("none"));
    out.kv(
        "internet",
        if status.internet { "reachable" } else { "unreachable" },
    );
    out.kv(
        "client address",
        &status
            .client_address
            .map_or_else(|| "none".to_string(), |a| a.to_string()),
    );
    if status.missing_dependencies.is_empty() {
        out.kv("dependencies", "ok");
    } else {
        out.kv("dependencies", &status.missing_dependencies.join(", "));
    }
    if status.provisioned() {
        out.success("a run would exit without changes");
    } else {
        out.warn("a run would start the setup access point");
    }
}
