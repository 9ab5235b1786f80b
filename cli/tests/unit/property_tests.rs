//! Property-based tests for pipeline ordering and exit conditions.
//!
//! Uses `proptest` to drive the orchestrator through arbitrary combinations
//! of collaborator answers.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::fn_params_excessive_bools)]

use std::net::{IpAddr, Ipv4Addr};

use proptest::prelude::*;
use wifiprov_cli::application::services::provision::{
    Collaborators, ProvisionOptions, ProvisioningOrchestrator,
};
use wifiprov_cli::domain::{DependencySpec, ExitOutcome, ProvisioningState, Step, StepResult};

use crate::mocks::{
    Answer, FakeChecker, FakeInstaller, FakeListener, FakeProbe, FakeWifi, RecordingReporter,
    call_log, calls, missing_exe,
};

/// Which step a recorded call belongs to.
fn step_of(call: &str) -> Option<Step> {
    if call == "wifi.current_interface" {
        Some(Step::CheckInterface)
    } else if call == "probe.check" {
        Some(Step::CheckInternet)
    } else if call.starts_with("deps.") {
        Some(Step::CheckDeps)
    } else if call.starts_with("wifi.client_address") {
        Some(Step::CheckWifi)
    } else if call.starts_with("wifi.enable_access_point") {
        Some(Step::EnableAp)
    } else if call.starts_with("listener.") || call.starts_with("wifi.enable_client") {
        Some(Step::ServeConfig)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
struct World {
    has_interface: bool,
    online: bool,
    missing_at_start: bool,
    install_succeeds: bool,
    install_fixes: bool,
    has_address: bool,
    ap_succeeds: bool,
}

fn world() -> impl Strategy<Value = World> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(has_interface, online, missing_at_start, install_succeeds, install_fixes, has_address, ap_succeeds)| World {
                has_interface,
                online,
                missing_at_start,
                install_succeeds,
                install_fixes,
                has_address,
                ap_succeeds,
            },
        )
}

/// Run the orchestrator once against `w`; return its outcome and call log.
fn simulate(w: &World) -> (ExitOutcome, Vec<String>) {
    let log = call_log();

    let mut wifi = FakeWifi::unprovisioned(&log);
    if !w.has_interface {
        wifi.interface = Answer::Ok(None);
    }
    if w.has_address {
        wifi.address = Answer::Ok(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))));
    }
    if !w.ap_succeeds {
        wifi.enable_ap = Answer::Fail("radio busy");
    }

    let checker = if w.missing_at_start {
        let after = if w.install_fixes {
            Vec::new()
        } else {
            vec![missing_exe("hostapd")]
        };
        FakeChecker::new(&log, vec![vec![missing_exe("hostapd")], after])
    } else {
        FakeChecker::satisfied(&log)
    };

    let mut installer = FakeInstaller::ok(&log);
    if !w.install_succeeds {
        installer.answer = Answer::Fail("mirror unreachable");
    }

    let probe = if w.online {
        FakeProbe::online(&log)
    } else {
        FakeProbe::offline(&log)
    };
    let listener = FakeListener::submitting(&log, "HomeNet", "correcthorse");
    let reporter = RecordingReporter::default();

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let outcome = rt.block_on(
        ProvisioningOrchestrator::new(
            Collaborators {
                wifi: &wifi,
                checker: &checker,
                installer: &installer,
                probe: &probe,
                listener: &listener,
            },
            &reporter,
            ProvisionOptions {
                ssid: "MyDeviceSetup".to_string(),
                dependencies: DependencySpec::default(),
            },
        )
        .run(),
    );
    (outcome, calls(&log))
}

proptest! {
    /// Steps are only ever visited in declared order, never revisited.
    #[test]
    fn prop_steps_run_in_declared_order(w in world()) {
        let (_, calls) = simulate(&w);
        let steps: Vec<Step> = calls.iter().filter_map(|c| step_of(c)).collect();
        let mut seen: Vec<Step> = steps.clone();
        seen.dedup();
        prop_assert_eq!(&seen[..], &Step::ORDER[..seen.len()], "calls: {:?}", calls);
    }

    /// An existing connection ends the run before the radio is touched.
    #[test]
    fn prop_online_never_enables_ap(w in world()) {
        let (outcome, calls) = simulate(&w);
        if w.has_interface && w.online {
            prop_assert!(outcome.is_success());
            prop_assert!(!calls.iter().any(|c| c.starts_with("wifi.enable_access_point")));
            prop_assert!(!calls.iter().any(|c| c.starts_with("listener.")));
        }
    }

    /// Without a radio, the dependency check never runs.
    #[test]
    fn prop_no_interface_skips_dependency_check(w in world()) {
        let (outcome, calls) = simulate(&w);
        if !w.has_interface {
            prop_assert!(outcome.is_success());
            prop_assert!(!calls.iter().any(|c| c.starts_with("deps.")));
        }
    }

    /// An assigned client address means AP activation never happens.
    #[test]
    fn prop_client_address_skips_ap(w in world()) {
        let (_, calls) = simulate(&w);
        if calls.iter().any(|c| c.starts_with("wifi.client_address")) && w.has_address {
            prop_assert!(!calls.iter().any(|c| c.starts_with("wifi.enable_access_point")));
        }
    }

    /// Remediation is attempted at most once, and an unresolved gap stops the
    /// run before AP activation.
    #[test]
    fn prop_remediation_at_most_once(w in world()) {
        let (outcome, calls) = simulate(&w);
        let installs = calls.iter().filter(|c| c.starts_with("deps.install")).count();
        prop_assert!(installs <= 1);

        let unresolved = w.missing_at_start && !(w.install_succeeds && w.install_fixes);
        if w.has_interface && !w.online && unresolved {
            prop_assert!(!outcome.is_success());
            prop_assert!(!calls.iter().any(|c| c.starts_with("wifi.enable_access_point")));
        }
    }
}

#[test]
fn test_all_steps_succeeding_observe_exact_order() {
    let w = World {
        has_interface: true,
        online: false,
        missing_at_start: false,
        install_succeeds: true,
        install_fixes: true,
        has_address: false,
        ap_succeeds: true,
    };
    let (outcome, calls) = simulate(&w);
    assert!(matches!(outcome, ExitOutcome::HandedOffToConfig(_)));

    let mut steps: Vec<Step> = calls.iter().filter_map(|c| step_of(c)).collect();
    steps.dedup();
    assert_eq!(steps, Step::ORDER.to_vec());
}

proptest! {
    /// Driving the bare state machine with `Continue` visits every step once.
    #[test]
    fn prop_state_machine_continue_visits_each_step(stop_at in 0usize..6) {
        let mut state = ProvisioningState::new();
        let mut visited = Vec::new();
        while let Some(step) = state.current_step() {
            visited.push(step);
            let result = if visited.len() - 1 == stop_at {
                StepResult::TerminateFatal(wifiprov_cli::domain::ProvisionError::Step("x".into()))
            } else {
                StepResult::Continue
            };
            if state.advance(result).is_some() {
                break;
            }
        }
        prop_assert_eq!(&visited[..], &Step::ORDER[..=stop_at]);
        prop_assert_eq!(state.completed(), &Step::ORDER[..=stop_at]);
    }
}
