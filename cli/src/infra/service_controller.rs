//! Infrastructure implementation of the `ServiceControl` port.
//!
//! `SystemctlController<R>` routes every systemctl call through a
//! `CommandRunner`, prefixing `sudo` when configured for elevated privilege.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceControl};
use crate::domain::error::find_timeout;
use crate::domain::service::{SYSTEMCTL, systemctl_args};
use crate::domain::{PrivilegeMode, ServiceAction, ServiceControlError, ServiceUnit};

/// Label used in diagnostics for commands that take no unit.
const UNIT_CACHE: &str = "unit-cache";

/// systemd-backed service controller.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct SystemctlController<R: CommandRunner> {
    runner: R,
    privilege: PrivilegeMode,
    timeout: Duration,
}

impl<R: CommandRunner> SystemctlController<R> {
    pub fn new(runner: R, privilege: PrivilegeMode, timeout: Duration) -> Self {
        Self {
            runner,
            privilege,
            timeout,
        }
    }

    /// Reboot the machine. Used after a completed handoff.
    ///
    /// # Errors
    ///
    /// Returns an error if systemctl cannot be run or refuses.
    pub async fn reboot(&self) -> Result<()> {
        let (program, args) = self.privilege.command(SYSTEMCTL, &["reboot"]);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let out = self
            .runner
            .run_with_timeout(&program, &refs, self.timeout)
            .await
            .context("systemctl reboot")?;
        anyhow::ensure!(
            out.status.success(),
            "systemctl reboot failed: {}",
            diagnostic(&out)
        );
        Ok(())
    }

    async fn invoke(&self, action: ServiceAction, unit: Option<&ServiceUnit>) -> Result<()> {
        let args = systemctl_args(action, unit);
        let (program, full) = self.privilege.command(SYSTEMCTL, &args);
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let unit_name = unit.map_or(UNIT_CACHE, ServiceUnit::name).to_string();

        match self.runner.run_with_timeout(&program, &refs, self.timeout).await {
            // systemctl itself is idempotent: enabling an enabled unit or
            // restarting a stopped one exits 0, and that is passed through.
            Ok(out) if out.status.success() => {
                tracing::debug!(%action, unit = %unit_name, "service command succeeded");
                Ok(())
            }
            Ok(out) => Err(ServiceControlError::Failed {
                action,
                unit: unit_name,
                status: out.status.to_string(),
                stderr: diagnostic(&out),
            }
            .into()),
            Err(e) if find_timeout(&e).is_some() => Err(e.context(ServiceControlError::Timeout {
                action,
                unit: unit_name,
                after: self.timeout,
            })),
            Err(e) => Err(e.context(format!("systemctl {action} {unit_name}"))),
        }
    }
}

impl<R: CommandRunner> ServiceControl for SystemctlController<R> {
    async fn enable(&self, unit: &ServiceUnit) -> Result<()> {
        self.invoke(ServiceAction::Enable, Some(unit)).await
    }

    async fn disable(&self, unit: &ServiceUnit) -> Result<()> {
        self.invoke(ServiceAction::Disable, Some(unit)).await
    }

    async fn restart(&self, unit: &ServiceUnit) -> Result<()> {
        self.invoke(ServiceAction::Restart, Some(unit)).await
    }

    async fn stop(&self, unit: &ServiceUnit) -> Result<()> {
        self.invoke(ServiceAction::Stop, Some(unit)).await
    }

    async fn reload_unit_cache(&self) -> Result<()> {
        self.invoke(ServiceAction::DaemonReload, None).await
    }
}

/// The command's own words: stderr, or stdout when stderr is empty.
pub(crate) fn diagnostic(out: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    } else {
        stderr.to_string()
    }
}
