//! Core domain types and port definitions for the pack delivery bridge.
//!
//! This crate holds everything the bridge runtime and platform adapters
//! share: the status vocabulary and its native mapping, progress event
//! payloads, the error taxonomy, and the port traits for the native
//! delivery subsystem and the UI-side progress sink. No runtime machinery
//! lives here.

#![deny(unused_crate_dependencies)]

pub mod errors;
pub mod events;
pub mod ports;
pub mod status;

// Re-export commonly used types for convenience
pub use errors::{
    BridgeError, CODE_DOWNLOAD_FAILED, CODE_INVALID_ARGUMENT, CODE_NATIVE_EXCEPTION,
    PackManagerError,
};
pub use events::PackProgress;
pub use ports::{
    AssetPackManagerPort, NoopProgressSink, PackLocation, PackStateListener, PackStateUpdate,
    ProgressSink,
};
pub use status::{DeliveryStatus, NativePackStatus};

// Silence unused dev-dependency warnings until we add runtime-based tests
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
