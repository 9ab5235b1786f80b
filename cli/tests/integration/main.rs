//! Integration tests for the wifiprov CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them touch the radio or the service manager.

mod cli_tests;
mod config_command;
