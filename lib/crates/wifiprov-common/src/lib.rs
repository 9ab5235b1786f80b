//! Wire types shared between the wifiprov configuration listener and any UI
//! that talks to it.

pub mod types;

pub use types::*;
