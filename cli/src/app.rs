//! Application context — unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the resolved config store and the
//! loaded configuration, and builds the infrastructure adapters from them so
//! command handlers never assemble runners or controllers themselves.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::{PrivilegeMode, WifiprovConfig};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::deps::PackageInstaller;
use crate::infra::listener::HttpConfigListener;
use crate::infra::network::TcpConnectivityProbe;
use crate::infra::service_controller::SystemctlController;
use crate::infra::wifi::SystemWifiManager;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit `--config` path.
    pub config: Option<PathBuf>,
    /// `--privilege` override for the configured privilege mode.
    pub privilege: Option<PrivilegeMode>,
}

/// The service controller used by every command.
pub type Controller = SystemctlController<TokioCommandRunner>;
/// The wifi manager used by `run` and `status`.
pub type Wifi = SystemWifiManager<TokioCommandRunner, Controller>;

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Where the configuration was read from.
    pub config_store: YamlConfigStore,
    /// Loaded, validated configuration with CLI overrides applied.
    pub config: WifiprovConfig,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed
    /// or validated.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let config_store = YamlConfigStore::resolve(flags.config.as_deref());
        let mut config = config_store.load()?;
        if let Some(privilege) = flags.privilege {
            config.service.privilege = privilege;
        }

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
            config,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Command runner bounded by the configured service timeout.
    #[must_use]
    pub fn runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::new(self.config.service.timeout())
    }

    #[must_use]
    pub fn service_controller(&self) -> Controller {
        SystemctlController::new(
            self.runner(),
            self.config.service.privilege,
            self.config.service.timeout(),
        )
    }

    #[must_use]
    pub fn wifi_manager(&self) -> Wifi {
        SystemWifiManager::new(self.runner(), self.service_controller(), &self.config)
    }

    #[must_use]
    pub fn installer(&self) -> PackageInstaller<TokioCommandRunner> {
        PackageInstaller::new(
            self.runner(),
            self.config.service.privilege,
            &self.config.dependencies,
        )
    }

    #[must_use]
    pub fn probe(&self) -> TcpConnectivityProbe {
        TcpConnectivityProbe::from_config(&self.config.connectivity)
    }

    #[must_use]
    pub fn listener(&self) -> HttpConfigListener {
        HttpConfigListener::new(self.config.server.socket_addr())
    }
}
