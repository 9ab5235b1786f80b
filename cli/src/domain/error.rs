//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::pipeline::Step;
use crate::domain::service::ServiceAction;

// ── Command errors ────────────────────────────────────────────────────────────

/// An external command exceeded its allowed wait and was killed.
///
/// Raised by the command runner so callers can tell "slow" from "broken" by
/// searching the `anyhow` chain.
#[derive(Debug, Clone, Error)]
#[error("{program} timed out after {}s", .after.as_secs())]
pub struct CommandTimeout {
    pub program: String,
    pub after: Duration,
}

/// Find a [`CommandTimeout`] anywhere in an error's source chain.
#[must_use]
pub fn find_timeout(err: &anyhow::Error) -> Option<&CommandTimeout> {
    err.chain().find_map(|e| e.downcast_ref::<CommandTimeout>())
}

// ── Service control errors ────────────────────────────────────────────────────

/// Failure of a single service-manager command.
#[derive(Debug, Error)]
pub enum ServiceControlError {
    #[error("systemctl {action} {unit} failed ({status}): {stderr}")]
    Failed {
        action: ServiceAction,
        unit: String,
        status: String,
        stderr: String,
    },

    #[error("systemctl {action} {unit} timed out after {}s", .after.as_secs())]
    Timeout {
        action: ServiceAction,
        unit: String,
        after: Duration,
    },
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Why a provisioning run ended fatally.
///
/// Diagnostics from collaborators are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("dependencies unsatisfied: missing {}{}", .missing.join(", "), detail_suffix(.detail.as_deref()))]
    DependenciesUnsatisfied {
        missing: Vec<String>,
        detail: Option<String>,
    },

    #[error("AP Enable ERROR: {0}")]
    AccessPoint(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Step(String),
}

impl ProvisionError {
    /// Classify a collaborator failure, keeping timeouts distinct.
    #[must_use]
    pub fn from_step_failure(err: &anyhow::Error) -> Self {
        match find_timeout(err) {
            Some(t) => Self::Timeout(t.to_string()),
            None => Self::Step(format!("{err:#}")),
        }
    }

    /// Returns `true` for the bounded-wait variant.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(" ({d})")).unwrap_or_default()
}

/// A fatal outcome pinned to the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step}: {error}")]
pub struct FatalStep {
    pub step: Step,
    pub error: ProvisionError,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while validating a loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },

    #[error("{key} must not be empty")]
    Empty { key: String },
}

// ── Run lock errors ───────────────────────────────────────────────────────────

/// Errors from the process-level run lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("another wifiprov run holds {path} (pid {pid}, since {since})")]
    Held {
        path: String,
        pid: u32,
        since: String,
    },

    #[error("run lock {path} is being written by another run ({age_secs}s old), retry shortly")]
    InFlight { path: String, age_secs: u64 },
}
