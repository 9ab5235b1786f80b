//! Parsers for `ip` and `iw` output — pure functions, no I/O, no async.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`
//! sockets.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::LazyLock;

use regex::Regex;
use wifiprov_common::{Security, WifiNetwork};

/// `inet 192.168.1.20/24` in `ip -4 -o addr show` output.
static INET_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"\binet\s+(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})/\d{1,2}").expect("valid regex")
});

/// `signal: -45.00 dBm` in `iw dev <iface> scan` output.
static SIGNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^\s*signal:\s*(-?\d+(?:\.\d+)?)\s*dBm").expect("valid regex")
});

/// Every IPv4 address listed in `ip -4 -o addr show dev <iface>` output.
#[must_use]
pub fn parse_ipv4_addresses(output: &str) -> Vec<Ipv4Addr> {
    INET_RE
        .captures_iter(output)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect()
}

/// The address that proves the interface is a configured wifi client.
///
/// Link-local addresses and the device's own access-point address (left over
/// from an interrupted earlier run) do not count.
#[must_use]
pub fn client_address(output: &str, ap_address: Ipv4Addr) -> Option<IpAddr> {
    parse_ipv4_addresses(output)
        .into_iter()
        .find(|addr| *addr != ap_address && !addr.is_link_local())
        .map(IpAddr::V4)
}

#[derive(Default)]
struct ScanEntry {
    ssid: Option<String>,
    signal: Option<f32>,
    privacy: bool,
    wpa: bool,
    rsn: bool,
}

impl ScanEntry {
    fn into_network(self) -> Option<WifiNetwork> {
        let ssid = self.ssid.filter(|s| !s.is_empty())?;
        let security = if self.rsn {
            Security::Wpa2
        } else if self.wpa {
            Security::Wpa
        } else if self.privacy {
            Security::Wep
        } else {
            Security::Open
        };
        Some(WifiNetwork {
            ssid,
            signal_dbm: self.signal,
            security,
        })
    }
}

/// Parse `iw dev <iface> scan` output into visible networks.
///
/// Hidden networks are dropped, duplicate SSIDs keep the strongest signal and
/// the result is sorted strongest first.
#[must_use]
pub fn parse_iw_scan(output: &str) -> Vec<WifiNetwork> {
    let mut entries = Vec::new();
    let mut current: Option<ScanEntry> = None;

    for line in output.lines() {
        if line.starts_with("BSS ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(ScanEntry::default());
            continue;
        }
        let Some(entry) = current.as_mut() else {
            continue;
        };
        let trimmed = line.trim();
        if let Some(ssid) = trimmed.strip_prefix("SSID:") {
            entry.ssid = Some(ssid.trim().to_string());
        } else if let Some(caps) = SIGNAL_RE.captures(line) {
            entry.signal = caps.get(1).and_then(|m| m.as_str().parse().ok());
        } else if trimmed.starts_with("capability:") && trimmed.contains("Privacy") {
            entry.privacy = true;
        } else if trimmed.starts_with("RSN:") {
            entry.rsn = true;
        } else if trimmed.starts_with("WPA:") {
            entry.wpa = true;
        }
    }
    if let Some(entry) = current {
        entries.push(entry);
    }

    let mut best: HashMap<String, WifiNetwork> = HashMap::new();
    for network in entries.into_iter().filter_map(ScanEntry::into_network) {
        let stronger = best.get(&network.ssid).is_none_or(|seen| {
            network.signal_dbm.unwrap_or(f32::MIN) > seen.signal_dbm.unwrap_or(f32::MIN)
        });
        if stronger {
            best.insert(network.ssid.clone(), network);
        }
    }

    let mut networks: Vec<WifiNetwork> = best.into_values().collect();
    networks.sort_by(|a, b| {
        b.signal_dbm
            .unwrap_or(f32::MIN)
            .total_cmp(&a.signal_dbm.unwrap_or(f32::MIN))
            .then_with(|| a.ssid.cmp(&b.ssid))
    });
    networks
}
