//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` so the provisioning orchestrator can emit progress
//! lines without depending on any presentation type. Every line is mirrored
//! to `tracing` at `info`, which keeps a journal record when stdout is
//! discarded under systemd.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
///
/// All three are suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        tracing::info!(target: "wifiprov::progress", "{message}");
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        tracing::info!(target: "wifiprov::progress", "{message}");
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "wifiprov::progress", "{message}");
        self.ctx.warn(message);
    }
}
