//! Provisioning state machine: steps, per-step outcomes and the run outcome.
//!
//! Pure data and transitions. The orchestrator in
//! `application::services::provision` drives it; nothing here performs I/O or
//! decides to end the process.

use std::fmt;
use std::net::IpAddr;

use crate::domain::error::{FatalStep, ProvisionError};

// ── Steps ─────────────────────────────────────────────────────────────────────

/// One pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CheckInterface,
    CheckInternet,
    CheckDeps,
    CheckWifi,
    EnableAp,
    ServeConfig,
}

impl Step {
    /// Every step in the only order the pipeline runs them.
    pub const ORDER: [Step; 6] = [
        Step::CheckInterface,
        Step::CheckInternet,
        Step::CheckDeps,
        Step::CheckWifi,
        Step::EnableAp,
        Step::ServeConfig,
    ];

    /// Short name used in progress lines and fatal diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CheckInterface => "interface",
            Self::CheckInternet => "internet",
            Self::CheckDeps => "deps",
            Self::CheckWifi => "wifi-enabled",
            Self::EnableAp => "enable-ap",
            Self::ServeConfig => "serve-config",
        }
    }

    /// The step that follows this one, or `None` after `ServeConfig`.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        let idx = Self::ORDER.iter().position(|s| *s == self)?;
        Self::ORDER.get(idx + 1).copied()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Running(Step),
    Done,
    Fatal,
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// A legitimate reason to stop before touching the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarlyExit {
    /// No wireless interface on this device.
    NoInterface,
    /// Some route to the internet already works.
    ExistingConnection,
    /// The wifi client role is already configured.
    AlreadyClient { interface: String, address: IpAddr },
}

impl fmt::Display for EarlyExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInterface => f.write_str("No wireless interface exists. Exiting."),
            Self::ExistingConnection => {
                f.write_str("There is an existing internet connection. Exiting.")
            }
            Self::AlreadyClient { interface, address } => {
                write!(f, "Wifi is enabled on {interface}, and IP {address} assigned")
            }
        }
    }
}

/// Reported by the configuration listener once client mode was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCompletion {
    /// SSID the device was configured to join.
    pub ssid: String,
}

/// Tagged outcome of one step. Exactly one per step invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    TerminateSuccess(EarlyExit),
    TerminateFatal(ProvisionError),
}

/// Final result of `run()`. Ending the process is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    AlreadyProvisioned(EarlyExit),
    HandedOffToConfig(ConfigCompletion),
    Fatal(FatalStep),
}

impl ExitOutcome {
    /// Process exit code: 0 on success, 2 for a fatal timeout, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::AlreadyProvisioned(_) | Self::HandedOffToConfig(_) => 0,
            Self::Fatal(fatal) if fatal.error.is_timeout() => 2,
            Self::Fatal(_) => 1,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Process-scoped provisioning state: the step pointer plus what earlier
/// steps produced. Advances monotonically and is discarded at exit.
#[derive(Debug, Clone)]
pub struct ProvisioningState {
    stage: Stage,
    completed: Vec<Step>,
    /// Interface reported by `CheckInterface`.
    pub interface: Option<String>,
    /// Set once the single dependency remediation was tried.
    pub remediation_attempted: bool,
    /// Set by `ServeConfig` before it continues.
    pub completion: Option<ConfigCompletion>,
}

impl Default for ProvisioningState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisioningState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::Init,
            completed: Vec::new(),
            interface: None,
            remediation_attempted: false,
            completion: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Steps that have produced a result so far, in order.
    #[must_use]
    pub fn completed(&self) -> &[Step] {
        &self.completed
    }

    /// The step to execute next, if the run is still in progress.
    ///
    /// Leaves `Init` on first call.
    pub fn current_step(&mut self) -> Option<Step> {
        if self.stage == Stage::Init {
            self.stage = Stage::Running(Step::CheckInterface);
        }
        match self.stage {
            Stage::Running(step) => Some(step),
            _ => None,
        }
    }

    /// Record the current step's result and move forward.
    ///
    /// Returns the final outcome once a terminal stage is reached. Calling
    /// this outside `Running` is a no-op returning `None`.
    pub fn advance(&mut self, result: StepResult) -> Option<ExitOutcome> {
        let Stage::Running(step) = self.stage else {
            return None;
        };
        self.completed.push(step);

        match result {
            StepResult::Continue => match step.next() {
                Some(next) => {
                    self.stage = Stage::Running(next);
                    None
                }
                None => Some(self.finish_handoff(step)),
            },
            StepResult::TerminateSuccess(reason) => {
                self.stage = Stage::Done;
                Some(ExitOutcome::AlreadyProvisioned(reason))
            }
            StepResult::TerminateFatal(error) => {
                self.stage = Stage::Fatal;
                Some(ExitOutcome::Fatal(FatalStep { step, error }))
            }
        }
    }

    fn finish_handoff(&mut self, step: Step) -> ExitOutcome {
        if let Some(completion) = self.completion.take() {
            self.stage = Stage::Done;
            ExitOutcome::HandedOffToConfig(completion)
        } else {
            self.stage = Stage::Fatal;
            ExitOutcome::Fatal(FatalStep {
                step,
                error: ProvisionError::Step(
                    "configuration listener finished without reporting completion".to_string(),
                ),
            })
        }
    }
}
