//! Dependency infrastructure — `which`/filesystem checks and package-manager
//! installs.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, DependencyChecker, DependencyInstaller};
use crate::domain::config::DependencyConfig;
use crate::domain::{DependencySpec, MissingDependency, PrivilegeMode};
use crate::infra::command_runner::INSTALL_TIMEOUT;
use crate::infra::service_controller::diagnostic;

/// Looks executables up on `PATH` and checks files exist.
pub struct SystemDependencyChecker;

impl DependencyChecker for SystemDependencyChecker {
    async fn check(&self, spec: &DependencySpec) -> Result<Vec<MissingDependency>> {
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || {
            let mut missing: Vec<MissingDependency> = spec
                .executables
                .iter()
                .filter(|name| which::which(name.as_str()).is_err())
                .map(|name| MissingDependency::Executable(name.clone()))
                .collect();
            missing.extend(
                spec.files
                    .iter()
                    .filter(|path| !path.exists())
                    .map(|path| MissingDependency::File(path.clone())),
            );
            missing
        })
        .await
        .context("dependency check task panicked")
    }
}

/// Installs the configured package set with the configured package manager.
///
/// The package list comes from config, not from the missing items, since
/// binaries and packages rarely share names (`dhcpd` ships in `dhcp`).
pub struct PackageInstaller<R: CommandRunner> {
    runner: R,
    privilege: PrivilegeMode,
    install_command: Vec<String>,
    packages: Vec<String>,
    timeout: Duration,
}

impl<R: CommandRunner> PackageInstaller<R> {
    pub fn new(runner: R, privilege: PrivilegeMode, config: &DependencyConfig) -> Self {
        Self {
            runner,
            privilege,
            install_command: config.install_command.clone(),
            packages: config.packages.clone(),
            timeout: INSTALL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<R: CommandRunner> DependencyInstaller for PackageInstaller<R> {
    async fn install(&self, missing: &[MissingDependency]) -> Result<()> {
        let Some((program, base)) = self.install_command.split_first() else {
            anyhow::bail!("no install command configured");
        };
        let args: Vec<&str> = base
            .iter()
            .chain(self.packages.iter())
            .map(String::as_str)
            .collect();
        let (program, full) = self.privilege.command(program, &args);
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();

        tracing::info!(
            missing = ?missing.iter().map(ToString::to_string).collect::<Vec<_>>(),
            command = %format!("{program} {}", full.join(" ")),
            "installing dependencies"
        );
        let out = self
            .runner
            .run_with_timeout(&program, &refs, self.timeout)
            .await
            .context("running package manager")?;
        anyhow::ensure!(
            out.status.success(),
            "package manager exited with {}: {}",
            out.status,
            diagnostic(&out)
        );
        Ok(())
    }
}
