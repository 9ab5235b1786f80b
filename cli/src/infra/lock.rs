//! Single-instance guard for `wifiprov run`.
//!
//! The lock is a JSON file holding the owner's PID and acquisition time. It is
//! staged in the lock's directory and linked into place without clobbering,
//! so it never exists half-written. A lock whose owner no longer exists is
//! reclaimed; so is an unreadable one once it is older than
//! [`UNREADABLE_GRACE`]. Dropping the guard removes the file if it is still
//! ours.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::LockError;

/// How long an empty or unparseable lock file is presumed to belong to a run
/// still writing it.
pub const UNREADABLE_GRACE: Duration = Duration::from_secs(10);

/// Contents of the lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl LockInfo {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }

    fn owner_alive(&self) -> bool {
        Path::new(&format!("/proc/{}", self.pid)).exists()
    }
}

/// Held run lock. Released on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    info: LockInfo,
}

impl RunLock {
    /// Take the lock at `path`, reclaiming it from a dead owner.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Held`] when a live process owns the lock,
    /// [`LockError::InFlight`] when a recent lock cannot be read yet, or an
    /// I/O error if the file cannot be created.
    pub fn acquire(path: &Path) -> Result<Self> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;

        // Two passes: the second runs after removing a stale lock.
        for _ in 0..2 {
            let info = LockInfo::current();
            let mut staged = tempfile::NamedTempFile::new_in(&parent)
                .with_context(|| format!("staging lock in {}", parent.display()))?;
            serde_json::to_writer(&mut staged, &info).context("serializing lock")?;

            match staged.persist_noclobber(path) {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), pid = info.pid, "run lock acquired");
                    return Ok(Self {
                        path: path.to_path_buf(),
                        info,
                    });
                }
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    Self::reclaim_if_stale(path)?;
                }
                Err(e) => {
                    return Err(e.error).with_context(|| format!("creating lock {}", path.display()));
                }
            }
        }
        anyhow::bail!("could not acquire lock {} after reclaiming it", path.display())
    }

    /// Who holds the lock at `path`, if anyone.
    #[must_use]
    pub fn holder(path: &Path) -> Option<LockInfo> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reclaim_if_stale(path: &Path) -> Result<()> {
        match Self::holder(path) {
            Some(info) if info.owner_alive() => {
                return Err(LockError::Held {
                    path: path.display().to_string(),
                    pid: info.pid,
                    since: info.acquired_at.to_rfc3339(),
                }
                .into());
            }
            Some(info) => {
                tracing::warn!(path = %path.display(), pid = info.pid, "reclaiming run lock of dead process");
            }
            None => match lock_age(path) {
                Some(age) if age < UNREADABLE_GRACE => {
                    return Err(LockError::InFlight {
                        path: path.display().to_string(),
                        age_secs: age.as_secs(),
                    }
                    .into());
                }
                _ => tracing::warn!(path = %path.display(), "reclaiming unreadable run lock"),
            },
        }

        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing stale lock {}", path.display())),
        }
    }
}

/// Time since the lock file was last modified. A future mtime counts as new.
fn lock_age(path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(modified.elapsed().unwrap_or_default())
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if Self::holder(&self.path).as_ref() != Some(&self.info) {
            tracing::warn!(path = %self.path.display(), "run lock was replaced, leaving it in place");
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release run lock");
        }
    }
}
