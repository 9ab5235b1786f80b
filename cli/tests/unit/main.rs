//! Unit tests for the wifiprov CLI
//!
//! These tests use fake collaborators and run fast without external I/O.

mod architecture;
mod property_tests;
mod service_command;
mod status_service;
