//! Command implementations

pub mod config;
pub mod run;
pub mod service;
pub mod status;
pub mod version;
