//! Diagnostic logging setup.
//!
//! Progress lines for operators go through `output`; this is the `tracing`
//! side, always written to stderr so stdout stays clean for `--json`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` selects `debug` for this
/// crate and everything else stays at `warn`.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "warn,wifiprov_cli=debug,tower_http=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
