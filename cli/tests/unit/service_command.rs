//! Tests for the `service` command dispatch.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wifiprov_cli::commands::service::{ServiceCommand, execute};

use crate::mocks::{RecordingServices, call_log, calls};

#[tokio::test]
async fn test_each_subcommand_maps_to_one_controller_call() {
    let cases = [
        (ServiceCommand::Enable { unit: "hostapd".into() }, "enable hostapd"),
        (ServiceCommand::Disable { unit: "dhcpd4".into() }, "disable dhcpd4"),
        (
            ServiceCommand::Restart {
                unit: "wpa_supplicant@wlan0".into(),
            },
            "restart wpa_supplicant@wlan0",
        ),
        (ServiceCommand::Stop { unit: "hostapd".into() }, "stop hostapd"),
        (ServiceCommand::Reload, "daemon-reload"),
    ];

    for (cmd, expected) in cases {
        let log = call_log();
        execute(&RecordingServices::new(&log), cmd)
            .await
            .expect("execute");
        assert_eq!(calls(&log), vec![expected]);
    }
}
