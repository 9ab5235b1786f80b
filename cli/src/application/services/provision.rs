//! Application service — the provisioning orchestrator.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits; the outcome is returned to
//! the caller, which alone decides how the process ends.

use crate::application::ports::{
    ConfigListener, ConnectivityProbe, DependencyChecker, DependencyInstaller, ProgressReporter,
    WifiManager,
};
use crate::domain::deps::describe_missing;
use crate::domain::error::find_timeout;
use crate::domain::{
    DependencySpec, EarlyExit, ExitOutcome, FatalStep, ProvisionError, ProvisioningState, Step,
    StepResult,
};

/// Collaborators the pipeline drives, borrowed for the run.
pub struct Collaborators<'a, W, D, I, N, L> {
    pub wifi: &'a W,
    pub checker: &'a D,
    pub installer: &'a I,
    pub probe: &'a N,
    pub listener: &'a L,
}

/// Static inputs for one run.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Network name advertised in AP mode.
    pub ssid: String,
    pub dependencies: DependencySpec,
}

/// Ordered, fail-fast provisioning pipeline.
///
/// `interface → internet → deps → wifi-enabled → enable-ap → serve-config`,
/// each step returning a [`StepResult`]. No step is revisited and nothing is
/// retried except the single dependency remediation.
pub struct ProvisioningOrchestrator<'a, W, D, I, N, L, R> {
    collab: Collaborators<'a, W, D, I, N, L>,
    reporter: &'a R,
    opts: ProvisionOptions,
}

impl<'a, W, D, I, N, L, R> ProvisioningOrchestrator<'a, W, D, I, N, L, R>
where
    W: WifiManager,
    D: DependencyChecker,
    I: DependencyInstaller,
    N: ConnectivityProbe,
    L: ConfigListener,
    R: ProgressReporter,
{
    pub fn new(
        collab: Collaborators<'a, W, D, I, N, L>,
        reporter: &'a R,
        opts: ProvisionOptions,
    ) -> Self {
        Self {
            collab,
            reporter,
            opts,
        }
    }

    /// Run the pipeline once, start to finish.
    pub async fn run(&self) -> ExitOutcome {
        let mut state = ProvisioningState::new();

        while let Some(step) = state.current_step() {
            tracing::debug!(%step, "running provisioning step");
            let result = self.execute(step, &mut state).await;
            tracing::debug!(%step, ?result, "step finished");
            if let Some(outcome) = state.advance(result) {
                return outcome;
            }
        }

        // `current_step` only yields `None` after `advance` returned an outcome.
        ExitOutcome::Fatal(FatalStep {
            step: Step::CheckInterface,
            error: ProvisionError::Step("pipeline ended without an outcome".to_string()),
        })
    }

    async fn execute(&self, step: Step, state: &mut ProvisioningState) -> StepResult {
        match step {
            Step::CheckInterface => self.check_interface(state).await,
            Step::CheckInternet => self.check_internet().await,
            Step::CheckDeps => self.check_deps(state).await,
            Step::CheckWifi => match state.interface.clone() {
                Some(interface) => self.check_wifi(interface).await,
                None => missing_interface(),
            },
            Step::EnableAp => match state.interface.as_deref() {
                Some(interface) => self.enable_ap(interface).await,
                None => missing_interface(),
            },
            Step::ServeConfig => match state.interface.clone() {
                Some(interface) => self.serve_config(&interface, state).await,
                None => missing_interface(),
            },
        }
    }

    async fn check_interface(&self, state: &mut ProvisioningState) -> StepResult {
        match self.collab.wifi.current_interface().await {
            Ok(Some(interface)) => {
                self.reporter
                    .step(&format!("wireless interface {interface} found"));
                state.interface = Some(interface);
                StepResult::Continue
            }
            Ok(None) => StepResult::TerminateSuccess(EarlyExit::NoInterface),
            Err(e) => {
                tracing::warn!("interface detection failed, treating as no radio: {e:#}");
                StepResult::TerminateSuccess(EarlyExit::NoInterface)
            }
        }
    }

    async fn check_internet(&self) -> StepResult {
        self.reporter.step("checking for an existing internet connection...");
        let connectivity = self.collab.probe.check().await;
        if connectivity.is_reachable() {
            return StepResult::TerminateSuccess(EarlyExit::ExistingConnection);
        }
        tracing::debug!(?connectivity, "no internet connection");
        StepResult::Continue
    }

    async fn check_deps(&self, state: &mut ProvisioningState) -> StepResult {
        let spec = &self.opts.dependencies;
        let missing = match self.collab.checker.check(spec).await {
            Ok(missing) if missing.is_empty() => return StepResult::Continue,
            Ok(missing) => missing,
            Err(e) => return fatal(&e),
        };

        if state.remediation_attempted {
            return StepResult::TerminateFatal(ProvisionError::DependenciesUnsatisfied {
                missing: describe_missing(&missing),
                detail: None,
            });
        }
        state.remediation_attempted = true;

        self.reporter.warn(&format!(
            "One or more dependencies missing ({}), attempting to install dependencies.",
            describe_missing(&missing).join(", ")
        ));
        if let Err(e) = self.collab.installer.install(&missing).await {
            if let Some(timeout) = find_timeout(&e) {
                return StepResult::TerminateFatal(ProvisionError::Timeout(timeout.to_string()));
            }
            return StepResult::TerminateFatal(ProvisionError::DependenciesUnsatisfied {
                missing: describe_missing(&missing),
                detail: Some(format!("{e:#}")),
            });
        }

        match self.collab.checker.check(spec).await {
            Ok(still) if still.is_empty() => {
                self.reporter.success("dependencies installed");
                StepResult::Continue
            }
            Ok(still) => StepResult::TerminateFatal(ProvisionError::DependenciesUnsatisfied {
                missing: describe_missing(&still),
                detail: None,
            }),
            Err(e) => fatal(&e),
        }
    }

    async fn check_wifi(&self, interface: String) -> StepResult {
        match self.collab.wifi.client_address(&interface).await {
            Ok(Some(address)) => {
                StepResult::TerminateSuccess(EarlyExit::AlreadyClient { interface, address })
            }
            Ok(None) => {
                self.reporter
                    .step("Wifi is not enabled, Enabling AP for self-configure");
                StepResult::Continue
            }
            Err(e) => fatal(&e),
        }
    }

    async fn enable_ap(&self, interface: &str) -> StepResult {
        let ssid = &self.opts.ssid;
        self.reporter
            .step(&format!("enabling access point '{ssid}' on {interface}..."));
        match self.collab.wifi.enable_access_point(interface, ssid).await {
            Ok(()) => {
                self.reporter.success("AP Enable Success!");
                StepResult::Continue
            }
            Err(e) => match find_timeout(&e) {
                Some(timeout) => {
                    StepResult::TerminateFatal(ProvisionError::Timeout(timeout.to_string()))
                }
                None => StepResult::TerminateFatal(ProvisionError::AccessPoint(format!("{e:#}"))),
            },
        }
    }

    async fn serve_config(&self, interface: &str, state: &mut ProvisioningState) -> StepResult {
        self.reporter
            .step("waiting for network credentials from the setup page...");
        match self.collab.listener.serve(self.collab.wifi, interface).await {
            Ok(completion) => {
                self.reporter
                    .success(&format!("client mode configured for '{}'", completion.ssid));
                state.completion = Some(completion);
                StepResult::Continue
            }
            Err(e) => fatal(&e),
        }
    }
}

fn fatal(err: &anyhow::Error) -> StepResult {
    StepResult::TerminateFatal(ProvisionError::from_step_failure(err))
}

fn missing_interface() -> StepResult {
    StepResult::TerminateFatal(ProvisionError::Step(
        "no wireless interface recorded by the interface check".to_string(),
    ))
}
