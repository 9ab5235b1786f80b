//! `wifiprov run` — provision the device, or exit early if it already is.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::{
    Collaborators, ProvisionOptions, ProvisioningOrchestrator,
};
use crate::domain::{AfterConfigure, ExitOutcome};
use crate::infra::deps::SystemDependencyChecker;
use crate::infra::lock::RunLock;
use crate::output::TerminalReporter;

/// Conventional exit status after SIGINT/SIGTERM.
const INTERRUPTED: u8 = 130;

/// Run the provisioning pipeline once.
///
/// # Errors
///
/// Returns an error if the run lock is held by another live process, or if
/// the post-configuration reboot cannot be issued.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let _lock = RunLock::acquire(&app.config.lock_path)?;

    let wifi = app.wifi_manager();
    let installer = app.installer();
    let probe = app.probe();
    let listener = app.listener();
    let reporter = TerminalReporter::new(&app.output);

    let orchestrator = ProvisioningOrchestrator::new(
        Collaborators {
            wifi: &wifi,
            checker: &SystemDependencyChecker,
            installer: &installer,
            probe: &probe,
            listener: &listener,
        },
        &reporter,
        ProvisionOptions {
            ssid: app.config.access_point.ssid.clone(),
            dependencies: app.config.dependencies.spec(),
        },
    );

    let outcome = tokio::select! {
        outcome = orchestrator.run() => outcome,
        () = shutdown_signal() => {
            app.output.warn("interrupted, stopping");
            return Ok(ExitCode::from(INTERRUPTED));
        }
    };

    report(app, &outcome);

    if matches!(outcome, ExitOutcome::HandedOffToConfig(_))
        && app.config.after_configure == AfterConfigure::Reboot
    {
        app.output.step("rebooting to join the configured network");
        app.service_controller().reboot().await?;
    }

    Ok(ExitCode::from(outcome.exit_code()))
}

fn report(app: &AppContext, outcome: &ExitOutcome) {
    match outcome {
        ExitOutcome::AlreadyProvisioned(reason) => app.output.success(&reason.to_string()),
        ExitOutcome::HandedOffToConfig(done) => app
            .output
            .success(&format!("Configuration complete, joining '{}'", done.ssid)),
        ExitOutcome::Fatal(fatal) => {
            tracing::error!(step = %fatal.step, error = %fatal.error, "provisioning failed");
            app.output.error(&fatal.to_string());
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("received shutdown signal");
}
