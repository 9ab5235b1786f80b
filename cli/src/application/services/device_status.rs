//! Application service — read-only device status report.
//!
//! Runs the same detection the orchestrator does, without changing anything.

use std::net::IpAddr;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{ConnectivityProbe, DependencyChecker, WifiManager};
use crate::domain::DependencySpec;
use crate::domain::deps::describe_missing;

/// Snapshot reported by `wifiprov status`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeviceStatus {
    pub interface: Option<String>,
    pub internet: bool,
    pub client_address: Option<IpAddr>,
    pub missing_dependencies: Vec<String>,
}

impl DeviceStatus {
    /// `true` when a run would exit early without touching the radio.
    #[must_use]
    pub fn provisioned(&self) -> bool {
        self.interface.is_none() || self.internet || self.client_address.is_some()
    }
}

/// Collect the device status.
///
/// # Errors
///
/// Returns an error if the dependency check or the client-address lookup
/// cannot run.
pub async fn device_status(
    wifi: &impl WifiManager,
    probe: &impl ConnectivityProbe,
    checker: &impl DependencyChecker,
    spec: &DependencySpec,
) -> Result<DeviceStatus> {
    let interface = wifi.current_interface().await.unwrap_or_else(|e| {
        tracing::warn!("interface detection failed: {e:#}");
        None
    });
    let internet = probe.check().await.is_reachable();
    let client_address = match &interface {
        Some(iface) => wifi.client_address(iface).await?,
        None => None,
    };
    let missing = checker.check(spec).await?;

    Ok(DeviceStatus {
        interface,
        internet,
        client_address,
        missing_dependencies: describe_missing(&missing),
    })
}
