//! Required system dependencies and what is missing from them.

use std::fmt;
use std::path::PathBuf;

/// Executables and persisted files a run needs. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencySpec {
    pub executables: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// One unsatisfied requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MissingDependency {
    Executable(String),
    File(PathBuf),
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(name) => f.write_str(name),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Render a missing list for messages, e.g. `"hostapd, /etc/dhcpd.conf"`.
#[must_use]
pub fn describe_missing(missing: &[MissingDependency]) -> Vec<String> {
    missing.iter().map(ToString::to_string).collect()
}
