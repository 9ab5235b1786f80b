//! Service units, service-manager actions and privilege modes.
//!
//! Pure argv construction only; execution lives in `infra::service_controller`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Program used to escalate when running in [`PrivilegeMode::Elevated`].
pub const SUDO: &str = "sudo";
/// The service manager front-end.
pub const SYSTEMCTL: &str = "systemctl";

/// An OS service unit, identified by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceUnit(String);

impl ServiceUnit {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Substitute the `{interface}` placeholder, e.g. `dhcpcd@{interface}`.
    #[must_use]
    pub fn for_interface(&self, interface: &str) -> Self {
        Self(expand_interface(&self.0, interface))
    }
}

impl fmt::Display for ServiceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceUnit {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Replace every `{interface}` occurrence in a unit name or path template.
#[must_use]
pub fn expand_interface(template: &str, interface: &str) -> String {
    template.replace("{interface}", interface)
}

/// A service-manager lifecycle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Enable,
    Disable,
    Restart,
    Stop,
    DaemonReload,
}

impl ServiceAction {
    /// The systemctl verb for this action.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Restart => "restart",
            Self::Stop => "stop",
            Self::DaemonReload => "daemon-reload",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// How external commands acquire the privilege they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeMode {
    /// Prefix every command with `sudo`.
    #[default]
    Elevated,
    /// The process already runs with enough privilege (e.g. as root under systemd).
    Inherited,
}

impl PrivilegeMode {
    /// Build the final `(program, args)` pair for a command under this mode.
    #[must_use]
    pub fn command(self, program: &str, args: &[&str]) -> (String, Vec<String>) {
        match self {
            Self::Elevated => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(program.to_string());
                full.extend(args.iter().map(ToString::to_string));
                (SUDO.to_string(), full)
            }
            Self::Inherited => (
                program.to_string(),
                args.iter().map(ToString::to_string).collect(),
            ),
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elevated => f.write_str("elevated"),
            Self::Inherited => f.write_str("inherited"),
        }
    }
}

impl FromStr for PrivilegeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elevated" => Ok(Self::Elevated),
            "inherited" => Ok(Self::Inherited),
            other => Err(format!(
                "unknown privilege mode '{other}' (expected elevated or inherited)"
            )),
        }
    }
}

/// Build the systemctl argv for `action`, without any privilege prefix.
///
/// `unit` is ignored for [`ServiceAction::DaemonReload`].
#[must_use]
pub fn systemctl_args(action: ServiceAction, unit: Option<&ServiceUnit>) -> Vec<&str> {
    match (action, unit) {
        (ServiceAction::DaemonReload, _) | (_, None) => vec![action.verb()],
        (_, Some(unit)) => vec![action.verb(), unit.name()],
    }
}
