//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared wire types —
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use wifiprov_common::{NetworkCredentials, WifiNetwork};

use crate::domain::{
    ConfigCompletion, DependencySpec, MissingDependency, ServiceUnit, WifiprovConfig,
};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of probing the well-known external host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    Reachable,
    /// DNS failure, refused, unroutable, timed out or malformed target.
    Unreachable(String),
}

impl Connectivity {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable)
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout the child process must be killed and the error chain must
    /// contain a `domain::CommandTimeout`.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Service Control Port ──────────────────────────────────────────────────────

/// Service-manager lifecycle commands for a named unit.
///
/// Operations on a unit already in the requested state succeed. Failures carry
/// a `domain::ServiceControlError` with the command's diagnostic text.
#[allow(async_fn_in_trait)]
pub trait ServiceControl {
    /// Mark the unit to start on boot.
    async fn enable(&self, unit: &ServiceUnit) -> Result<()>;
    /// Reverse `enable`.
    async fn disable(&self, unit: &ServiceUnit) -> Result<()>;
    /// Stop and start the unit.
    async fn restart(&self, unit: &ServiceUnit) -> Result<()>;
    /// Stop the unit.
    async fn stop(&self, unit: &ServiceUnit) -> Result<()>;
    /// Tell the service manager unit definitions changed on disk.
    async fn reload_unit_cache(&self) -> Result<()>;
}

// ── Wifi Port ─────────────────────────────────────────────────────────────────

/// Radio control: detection, client state and mode switching.
#[allow(async_fn_in_trait)]
pub trait WifiManager {
    /// Name of an available wireless interface, or `None` when the device
    /// has no radio.
    async fn current_interface(&self) -> Result<Option<String>>;
    /// The address assigned to `interface` in its client role, if any.
    async fn client_address(&self, interface: &str) -> Result<Option<IpAddr>>;
    /// Switch the radio into access-point mode advertising `ssid`.
    ///
    /// Re-running while already in AP mode must be safe.
    async fn enable_access_point(&self, interface: &str, ssid: &str) -> Result<()>;
    /// Networks visible from `interface`.
    async fn scan(&self, interface: &str) -> Result<Vec<WifiNetwork>>;
    /// Leave AP mode and join the operator's network, persistently.
    async fn enable_client(&self, interface: &str, credentials: &NetworkCredentials)
    -> Result<()>;
}

// ── Dependency Ports ──────────────────────────────────────────────────────────

/// Verifies required executables and persisted files.
#[allow(async_fn_in_trait)]
pub trait DependencyChecker {
    /// Everything in `spec` that is missing. Empty means satisfied.
    async fn check(&self, spec: &DependencySpec) -> Result<Vec<MissingDependency>>;
}

/// Installs missing dependencies through the system package manager.
#[allow(async_fn_in_trait)]
pub trait DependencyInstaller {
    async fn install(&self, missing: &[MissingDependency]) -> Result<()>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts the internet connectivity check so application services can be
/// tested without real network access. Implementations must bound the wait.
#[allow(async_fn_in_trait)]
pub trait ConnectivityProbe {
    async fn check(&self) -> Connectivity;
}

// ── Config Listener Port ──────────────────────────────────────────────────────

/// Short-lived operator-facing service that collects network credentials.
#[allow(async_fn_in_trait)]
pub trait ConfigListener {
    /// Serve until the operator's credentials were applied through
    /// `wifi.enable_client`, then report completion.
    async fn serve<W: WifiManager>(&self, wifi: &W, interface: &str) -> Result<ConfigCompletion>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the static configuration.
pub trait ConfigStore {
    /// Load the config, falling back to defaults when no file exists.
    fn load(&self) -> Result<WifiprovConfig>;
    /// Location the config is read from.
    fn path(&self) -> PathBuf;
}
