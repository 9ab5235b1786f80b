//! Atomic writes for generated system configuration files.
//!
//! Files land via temp file + rename so a crash never leaves a half-written
//! hostapd or wpa_supplicant config behind. Under [`PrivilegeMode::Elevated`]
//! the content is staged in the process's temp dir and moved into place with
//! `sudo install` + `sudo mv`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::domain::PrivilegeMode;
use crate::infra::service_controller::diagnostic;

/// Permissions for files that may contain a passphrase.
pub const SECRET_MODE: u32 = 0o600;
/// Permissions for files without secrets.
pub const PUBLIC_MODE: u32 = 0o644;

/// Write `content` to `path` atomically with the given permission bits.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the temp
/// file cannot be written or renamed.
pub fn write_atomic(path: &Path, content: &str, mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("creating directory {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("creating temp file in {}", parent.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("writing temp file for {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting permissions on {}", tmp.path().display()))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

/// Writes config files with the privilege the run was configured for.
pub struct ConfigFileWriter<'a, R: CommandRunner> {
    runner: &'a R,
    privilege: PrivilegeMode,
}

impl<'a, R: CommandRunner> ConfigFileWriter<'a, R> {
    pub fn new(runner: &'a R, privilege: PrivilegeMode) -> Self {
        Self { runner, privilege }
    }

    /// Write `content` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written, or if an elevated
    /// `install`/`mv` exits non-zero.
    pub async fn write(&self, path: &Path, content: String, mode: u32) -> Result<()> {
        tracing::debug!(path = %path.display(), privilege = %self.privilege, "writing config file");
        match self.privilege {
            PrivilegeMode::Inherited => {
                let dest = path.to_path_buf();
                tokio::task::spawn_blocking(move || write_atomic(&dest, &content, mode))
                    .await
                    .context("config write task panicked")?
            }
            PrivilegeMode::Elevated => self.write_elevated(path, content, mode).await,
        }
    }

    async fn write_elevated(&self, path: &Path, content: String, mode: u32) -> Result<()> {
        let staged = tokio::task::spawn_blocking(move || -> Result<tempfile::TempPath> {
            let mut tmp = tempfile::NamedTempFile::new().context("creating staging file")?;
            tmp.write_all(content.as_bytes())
                .context("writing staging file")?;
            Ok(tmp.into_temp_path())
        })
        .await
        .context("config staging task panicked")??;

        let staged_str = staged.to_string_lossy().into_owned();
        let dest = path.to_string_lossy().into_owned();
        let partial = format!("{dest}.wifiprov-tmp");
        let mode = format!("{mode:o}");

        self.elevated("install", &["-D", "-m", &mode, &staged_str, &partial])
            .await
            .with_context(|| format!("installing {dest}"))?;
        self.elevated("mv", &["-f", &partial, &dest])
            .await
            .with_context(|| format!("finalizing {dest}"))?;
        drop(staged);
        Ok(())
    }

    async fn elevated(&self, program: &str, args: &[&str]) -> Result<()> {
        let (program, full) = self.privilege.command(program, args);
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let out = self.runner.run(&program, &refs).await?;
        anyhow::ensure!(out.status.success(), "{}", diagnostic(&out));
        Ok(())
    }
}
