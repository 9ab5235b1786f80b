//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, sysfs and
//! config-file access, the service manager, the TCP probe, the run lock and
//! the HTTP configuration listener.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod assets;
pub mod command_runner;
pub mod config;
pub mod deps;
pub mod fs;
pub mod listener;
pub mod lock;
pub mod network;
pub mod service_controller;
pub mod wifi;
