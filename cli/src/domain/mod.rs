//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`
//! sockets. All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod deps;
pub mod error;
pub mod network;
pub mod pipeline;
pub mod service;
pub mod templates;

pub use config::{AfterConfigure, WifiprovConfig, validate_config};
pub use deps::{DependencySpec, MissingDependency};
pub use error::{
    CommandTimeout, ConfigError, FatalStep, LockError, ProvisionError, ServiceControlError,
};
pub use pipeline::{
    ConfigCompletion, EarlyExit, ExitOutcome, ProvisioningState, Stage, Step, StepResult,
};
pub use service::{PrivilegeMode, ServiceAction, ServiceUnit};
