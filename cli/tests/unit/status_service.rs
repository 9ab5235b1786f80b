//! Tests for the read-only device status report.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use wifiprov_cli::application::services::device_status::device_status;
use wifiprov_cli::domain::DependencySpec;

use crate::mocks::{Answer, FakeChecker, FakeProbe, FakeWifi, call_log, calls, missing_exe};

#[tokio::test]
async fn test_unprovisioned_device_reports_missing_and_not_provisioned() {
    let log = call_log();
    let wifi = FakeWifi::unprovisioned(&log);
    let probe = FakeProbe::offline(&log);
    let checker = FakeChecker::new(&log, vec![vec![missing_exe("hostapd")]]);

    let status = device_status(&wifi, &probe, &checker, &DependencySpec::default())
        .await
        .expect("status");

    assert_eq!(status.interface.as_deref(), Some("wlan0"));
    assert!(!status.internet);
    assert_eq!(status.client_address, None);
    assert_eq!(status.missing_dependencies, vec!["hostapd".to_string()]);
    assert!(!status.provisioned());
}

#[tokio::test]
async fn test_client_address_marks_device_provisioned_without_side_effects() {
    let log = call_log();
    let mut wifi = FakeWifi::unprovisioned(&log);
    wifi.address = Answer::Ok(Some(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))));
    let probe = FakeProbe::offline(&log);
    let checker = FakeChecker::satisfied(&log);

    let status = device_status(&wifi, &probe, &checker, &DependencySpec::default())
        .await
        .expect("status");

    assert!(status.provisioned());
    let calls = calls(&log);
    assert!(
        !calls.iter().any(|c| c.starts_with("wifi.enable") || c.starts_with("deps.install")),
        "status must not change anything: {calls:?}"
    );
}

#[tokio::test]
async fn test_no_interface_skips_address_lookup() {
    let log = call_log();
    let mut wifi = FakeWifi::unprovisioned(&log);
    wifi.interface = Answer::Ok(None);
    let probe = FakeProbe::offline(&log);
    let checker = FakeChecker::satisfied(&log);

    let status = device_status(&wifi, &probe, &checker, &DependencySpec::default())
        .await
        .expect("status");

    assert_eq!(status.interface, None);
    assert!(status.provisioned());
    assert!(!calls(&log).iter().any(|c| c.starts_with("wifi.client_address")));
}

#[test]
fn test_status_serializes_for_json_output() {
    let status = wifiprov_cli::application::services::device_status::DeviceStatus {
        interface: Some("wlan0".into()),
        internet: true,
        client_address: None,
        missing_dependencies: Vec::new(),
    };
    let value = serde_json::to_value(&status).expect("json");
    assert_eq!(value["interface"], "wlan0");
    assert_eq!(value["internet"], true);
    assert!(value["client_address"].is_null());
}
