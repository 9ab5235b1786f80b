//! Config file rendering for hostapd, dhcpd and wpa_supplicant.
//!
//! Each function returns the file content as a `String`. The caller is
//! responsible for writing to disk.

#![allow(clippy::format_push_string)]

use std::fmt::Write as _;
use std::net::Ipv4Addr;

use wifiprov_common::NetworkCredentials;

use crate::domain::config::AccessPointConfig;

const HEADER: &str = "# Generated by wifiprov - DO NOT EDIT\n";

/// First and last host handed out by the setup network's DHCP server.
const DHCP_RANGE: (u8, u8) = (10, 50);

/// The /24 network containing `address`.
#[must_use]
pub fn subnet_of(address: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = address.octets();
    Ipv4Addr::new(a, b, c, 0)
}

/// Generate `hostapd.conf` for the setup access point.
#[must_use]
pub fn hostapd_conf(interface: &str, ap: &AccessPointConfig) -> String {
    let mut out = String::from(HEADER);
    out.push_str(&format!("interface={interface}\n"));
    out.push_str("driver=nl80211\n");
    out.push_str(&format!("ssid={}\n", ap.ssid));
    out.push_str("hw_mode=g\n");
    out.push_str(&format!("channel={}\n", ap.channel));
    out.push_str("auth_algs=1\n");
    out.push_str("wmm_enabled=0\n");
    if let Some(pass) = &ap.passphrase {
        out.push_str("wpa=2\n");
        out.push_str(&format!("wpa_passphrase={pass}\n"));
        out.push_str("wpa_key_mgmt=WPA-PSK\n");
        out.push_str("rsn_pairwise=CCMP\n");
    }
    out
}

/// Generate an ISC `dhcpd.conf` serving the AP's /24.
#[must_use]
pub fn dhcpd_conf(ap: &AccessPointConfig) -> String {
    let [a, b, c, _] = ap.address.octets();
    let subnet = subnet_of(ap.address);
    let first = Ipv4Addr::new(a, b, c, DHCP_RANGE.0);
    let last = Ipv4Addr::new(a, b, c, DHCP_RANGE.1);

    let mut out = String::from(HEADER);
    out.push_str("ddns-update-style none;\n");
    out.push_str("default-lease-time 600;\n");
    out.push_str("max-lease-time 7200;\n");
    out.push_str("authoritative;\n\n");
    out.push_str(&format!("subnet {subnet} netmask 255.255.255.0 {{\n"));
    out.push_str(&format!("  range {first} {last};\n"));
    out.push_str(&format!("  option routers {};\n", ap.address));
    out.push_str("}\n");
    out
}

/// Generate a `wpa_supplicant` config joining the operator's network.
///
/// SSIDs containing quotes or backslashes are written in hex form.
#[must_use]
pub fn wpa_supplicant_conf(credentials: &NetworkCredentials) -> String {
    let mut out = String::from(HEADER);
    out.push_str("ctrl_interface=/run/wpa_supplicant\n");
    out.push_str("update_config=1\n\n");
    out.push_str("network={\n");
    out.push_str(&format!("    ssid={}\n", ssid_value(&credentials.ssid)));
    if credentials.is_open() {
        out.push_str("    key_mgmt=NONE\n");
    } else {
        out.push_str(&format!("    psk=\"{}\"\n", credentials.passphrase));
    }
    out.push_str("}\n");
    out
}

fn ssid_value(ssid: &str) -> String {
    if ssid.contains(['"', '\\']) {
        ssid.bytes().fold(String::new(), |mut hex, b| {
            let _ = write!(hex, "{b:02x}");
            hex
        })
    } else {
        format!("\"{ssid}\"")
    }
}
