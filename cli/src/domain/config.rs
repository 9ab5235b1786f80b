//! Domain types and validators for wifiprov configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use wifiprov_common::{MAX_PASSPHRASE_LEN, MAX_SSID_BYTES, MIN_PASSPHRASE_LEN};

use crate::domain::deps::DependencySpec;
use crate::domain::error::ConfigError;
use crate::domain::service::{PrivilegeMode, ServiceUnit, expand_interface};

// ── Constants ────────────────────────────────────────────────────────────────

/// Default config location on the device.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wifiprov/config.yaml";
/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "WIFIPROV_CONFIG";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `/etc/wifiprov/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiprovConfig {
    /// Wireless interface to manage. Auto-detected when unset.
    pub interface: Option<String>,
    pub access_point: AccessPointConfig,
    pub client: ClientConfig,
    pub connectivity: ConnectivityConfig,
    pub dependencies: DependencyConfig,
    pub server: ServerConfig,
    pub service: ServiceConfig,
    /// Process-level run lock.
    pub lock_path: PathBuf,
    /// What `wifiprov run` does after the operator configured the device.
    pub after_configure: AfterConfigure,
}

impl Default for WifiprovConfig {
    fn default() -> Self {
        Self {
            interface: None,
            access_point: AccessPointConfig::default(),
            client: ClientConfig::default(),
            connectivity: ConnectivityConfig::default(),
            dependencies: DependencyConfig::default(),
            server: ServerConfig::default(),
            service: ServiceConfig::default(),
            lock_path: PathBuf::from("/run/wifiprov.lock"),
            after_configure: AfterConfigure::default(),
        }
    }
}

/// Settings for the temporary setup network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPointConfig {
    pub ssid: String,
    /// WPA2 passphrase. `None` advertises an open network.
    pub passphrase: Option<String>,
    /// Static address the device takes on the AP interface (/24).
    pub address: Ipv4Addr,
    pub channel: u8,
    pub hostapd_conf: PathBuf,
    pub dhcpd_conf: PathBuf,
    /// Units restarted to bring the AP up, in order.
    pub services: Vec<ServiceUnit>,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: "MyDeviceSetup".to_string(),
            passphrase: None,
            address: Ipv4Addr::new(192, 168, 44, 1),
            channel: 6,
            hostapd_conf: PathBuf::from("/etc/hostapd/hostapd.conf"),
            dhcpd_conf: PathBuf::from("/etc/dhcpd.conf"),
            services: vec![
                ServiceUnit::new("hostapd"),
                ServiceUnit::new("dhcpd4@{interface}"),
            ],
        }
    }
}

/// Settings applied when the device switches back to client mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path template; `{interface}` is substituted.
    pub wpa_supplicant_conf: String,
    /// Units enabled and restarted for client mode, in order.
    pub services: Vec<ServiceUnit>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            wpa_supplicant_conf: "/etc/wpa_supplicant/wpa_supplicant-{interface}.conf".to_string(),
            services: vec![
                ServiceUnit::new("wpa_supplicant@{interface}"),
                ServiceUnit::new("dhcpcd@{interface}"),
            ],
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn wpa_supplicant_path(&self, interface: &str) -> PathBuf {
        PathBuf::from(expand_interface(&self.wpa_supplicant_conf, interface))
    }
}

/// The well-known host probed to detect an existing connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            host: "www.google.com".to_string(),
            port: 80,
            timeout_secs: 5,
        }
    }
}

impl ConnectivityConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Required executables/files and how to install what is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub binaries: Vec<String>,
    pub files: Vec<PathBuf>,
    pub packages: Vec<String>,
    /// Package manager argv; `packages` are appended.
    pub install_command: Vec<String>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            binaries: vec!["dhcpd".into(), "hostapd".into(), "iw".into()],
            files: Vec::new(),
            packages: vec!["dhcp".into(), "hostapd".into(), "iw".into()],
            install_command: vec![
                "pacman".into(),
                "-Sy".into(),
                "--noconfirm".into(),
                "--needed".into(),
            ],
        }
    }
}

impl DependencyConfig {
    #[must_use]
    pub fn spec(&self) -> DependencySpec {
        DependencySpec {
            executables: self.binaries.clone(),
            files: self.files.clone(),
        }
    }
}

/// Where the configuration listener binds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 80,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Service-manager access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub privilege: PrivilegeMode,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            privilege: PrivilegeMode::default(),
            timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Action after a successful handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterConfigure {
    #[default]
    Reboot,
    Exit,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found.
pub fn validate_config(config: &WifiprovConfig) -> Result<()> {
    let ap = &config.access_point;

    if ap.ssid.is_empty() {
        return Err(empty("access_point.ssid"));
    }
    if ap.ssid.len() > MAX_SSID_BYTES {
        return Err(invalid(
            "access_point.ssid",
            &ap.ssid,
            "SSIDs are at most 32 bytes",
        ));
    }
    if ap.ssid.chars().any(char::is_control) {
        return Err(invalid(
            "access_point.ssid",
            &ap.ssid.escape_debug().to_string(),
            "SSIDs must not contain control characters",
        ));
    }
    if let Some(pass) = &ap.passphrase {
        let len = pass.chars().count();
        if !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&len) {
            return Err(invalid(
                "access_point.passphrase",
                &format!("<{len} characters>"),
                "WPA2 passphrases are 8 to 63 characters",
            ));
        }
    }
    if !(1..=14).contains(&ap.channel) {
        return Err(invalid(
            "access_point.channel",
            &ap.channel.to_string(),
            "Valid values: 1-14",
        ));
    }
    if ap.address.is_unspecified() || ap.address.is_loopback() || ap.address.is_broadcast() {
        return Err(invalid(
            "access_point.address",
            &ap.address.to_string(),
            "Use a private unicast address such as 192.168.44.1",
        ));
    }
    if ap.services.is_empty() {
        return Err(empty("access_point.services"));
    }
    if let Some(iface) = &config.interface {
        if iface.is_empty() || iface.contains('/') {
            return Err(invalid("interface", iface, "Use a name such as wlan0"));
        }
    }
    if config.connectivity.host.is_empty() {
        return Err(empty("connectivity.host"));
    }
    if config.connectivity.timeout_secs == 0 {
        return Err(invalid(
            "connectivity.timeout_secs",
            "0",
            "The probe needs a bounded, non-zero wait",
        ));
    }
    if config.service.timeout_secs == 0 {
        return Err(invalid(
            "service.timeout_secs",
            "0",
            "Service commands need a bounded, non-zero wait",
        ));
    }
    if config.dependencies.install_command.is_empty() {
        return Err(empty("dependencies.install_command"));
    }
    Ok(())
}

fn empty(key: &str) -> anyhow::Error {
    ConfigError::Empty {
        key: key.to_string(),
    }
    .into()
}

fn invalid(key: &str, value: &str, hint: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
