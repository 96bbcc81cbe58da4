//! Port definitions (trait abstractions).
//!
//! Traits that abstract infrastructure away from the bridge runtime:
//! the native delivery subsystem and the UI-side progress sink.

mod asset_pack;
mod progress_sink;

pub use asset_pack::{AssetPackManagerPort, PackLocation, PackStateListener, PackStateUpdate};
pub use progress_sink::{NoopProgressSink, ProgressSink};
