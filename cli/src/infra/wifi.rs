//! Infrastructure implementation of the `WifiManager` port.
//!
//! Radio detection reads sysfs. Addressing goes through `ip`, scanning
//! through `iw`, and mode switches render hostapd/dhcpd/wpa_supplicant
//! configs and drive the units listed in the config via `ServiceControl`.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wifiprov_common::{NetworkCredentials, WifiNetwork};

use crate::application::ports::{CommandRunner, ServiceControl, WifiManager};
use crate::domain::config::{AccessPointConfig, ClientConfig};
use crate::domain::{PrivilegeMode, WifiprovConfig, network, templates};
use crate::infra::fs::{ConfigFileWriter, PUBLIC_MODE, SECRET_MODE};
use crate::infra::service_controller::diagnostic;

/// Where the kernel lists network interfaces.
pub const SYSFS_NET: &str = "/sys/class/net";

/// Wifi manager backed by `ip`, `iw`, sysfs and the service manager.
pub struct SystemWifiManager<R: CommandRunner, S: ServiceControl> {
    runner: R,
    services: S,
    privilege: PrivilegeMode,
    interface: Option<String>,
    access_point: AccessPointConfig,
    client: ClientConfig,
    sysfs_root: PathBuf,
}

impl<R: CommandRunner, S: ServiceControl> SystemWifiManager<R, S> {
    pub fn new(runner: R, services: S, config: &WifiprovConfig) -> Self {
        Self {
            runner,
            services,
            privilege: config.service.privilege,
            interface: config.interface.clone(),
            access_point: config.access_point.clone(),
            client: config.client.clone(),
            sysfs_root: PathBuf::from(SYSFS_NET),
        }
    }

    /// Read interfaces from `root` instead of `/sys/class/net` (used in tests).
    #[must_use]
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }

    fn is_wireless(&self, name: &str) -> bool {
        self.sysfs_root.join(name).join("wireless").exists()
    }

    async fn ip(&self, args: &[&str]) -> Result<()> {
        let (program, full) = self.privilege.command("ip", args);
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let out = self
            .runner
            .run(&program, &refs)
            .await
            .with_context(|| format!("ip {}", args.join(" ")))?;
        anyhow::ensure!(
            out.status.success(),
            "ip {} failed: {}",
            args.join(" "),
            diagnostic(&out)
        );
        Ok(())
    }

    /// Flush the interface and give it the setup network's static address.
    async fn assign_ap_address(&self, interface: &str) -> Result<()> {
        let cidr = format!("{}/24", self.access_point.address);
        self.ip(&["link", "set", "dev", interface, "down"]).await?;
        self.ip(&["addr", "flush", "dev", interface]).await?;
        self.ip(&["addr", "add", &cidr, "dev", interface]).await?;
        self.ip(&["link", "set", "dev", interface, "up"]).await
    }
}

impl<R: CommandRunner, S: ServiceControl> WifiManager for SystemWifiManager<R, S> {
    async fn current_interface(&self) -> Result<Option<String>> {
        if let Some(name) = &self.interface {
            return Ok(self.is_wireless(name).then(|| name.clone()));
        }

        let mut entries = match tokio::fs::read_dir(&self.sysfs_root).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %self.sysfs_root.display(), error = %e, "cannot list interfaces");
                return Ok(None);
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names.into_iter().find(|n| self.is_wireless(n)))
    }

    async fn client_address(&self, interface: &str) -> Result<Option<IpAddr>> {
        let out = self
            .runner
            .run("ip", &["-4", "-o", "addr", "show", "dev", interface])
            .await
            .context("querying interface address")?;
        anyhow::ensure!(
            out.status.success(),
            "ip addr show {interface} failed: {}",
            diagnostic(&out)
        );
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(network::client_address(&stdout, self.access_point.address))
    }

    async fn enable_access_point(&self, interface: &str, ssid: &str) -> Result<()> {
        let ap = AccessPointConfig {
            ssid: ssid.to_string(),
            ..self.access_point.clone()
        };
        tracing::info!(interface, ssid, "enabling access point");

        // A client-mode supplicant holding the radio prevents hostapd from
        // starting. Stopping a unit that is not running succeeds.
        for unit in &self.client.services {
            let unit = unit.for_interface(interface);
            if let Err(e) = self.services.stop(&unit).await {
                tracing::warn!(%unit, error = %format!("{e:#}"), "could not stop client unit");
            }
        }

        let writer = ConfigFileWriter::new(&self.runner, self.privilege);
        writer
            .write(
                &ap.hostapd_conf,
                templates::hostapd_conf(interface, &ap),
                SECRET_MODE,
            )
            .await
            .context("writing hostapd config")?;
        writer
            .write(&ap.dhcpd_conf, templates::dhcpd_conf(&ap), PUBLIC_MODE)
            .await
            .context("writing dhcpd config")?;

        self.assign_ap_address(interface).await?;

        self.services.reload_unit_cache().await?;
        for unit in &ap.services {
            self.services.restart(&unit.for_interface(interface)).await?;
        }
        Ok(())
    }

    async fn scan(&self, interface: &str) -> Result<Vec<WifiNetwork>> {
        let (program, full) = self.privilege.command("iw", &["dev", interface, "scan"]);
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        let out = self.runner.run(&program, &refs).await.context("scanning")?;
        anyhow::ensure!(
            out.status.success(),
            "iw dev {interface} scan failed: {}",
            diagnostic(&out)
        );
        let networks = network::parse_iw_scan(&String::from_utf8_lossy(&out.stdout));
        tracing::debug!(interface, count = networks.len(), "scan complete");
        Ok(networks)
    }

    async fn enable_client(
        &self,
        interface: &str,
        credentials: &NetworkCredentials,
    ) -> Result<()> {
        credentials.validate()?;
        tracing::info!(interface, ssid = %credentials.ssid, "switching to client mode");

        let writer = ConfigFileWriter::new(&self.runner, self.privilege);
        writer
            .write(
                &self.client.wpa_supplicant_path(interface),
                templates::wpa_supplicant_conf(credentials),
                SECRET_MODE,
            )
            .await
            .context("writing wpa_supplicant config")?;

        for unit in &self.access_point.services {
            let unit = unit.for_interface(interface);
            self.services.stop(&unit).await?;
            self.services.disable(&unit).await?;
        }

        self.ip(&["addr", "flush", "dev", interface]).await?;

        for unit in &self.client.services {
            let unit = unit.for_interface(interface);
            self.services.enable(&unit).await?;
            self.services.restart(&unit).await?;
        }
        Ok(())
    }
}
