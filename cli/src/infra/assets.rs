//! Embedded setup UI — the static files served by the configuration listener.
//!
//! At compile time, `include_dir!` embeds everything under `cli/assets/ui/`.

use include_dir::{Dir, include_dir};

static UI_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/ui");

/// Page served at `/`.
pub const INDEX: &str = "index.html";

/// Return the raw bytes of a single embedded UI file.
#[must_use]
pub fn get_asset(name: &str) -> Option<&'static [u8]> {
    UI_ASSETS.get_file(name).map(|f| f.contents())
}

/// MIME type for an asset, by extension.
#[must_use]
pub fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
