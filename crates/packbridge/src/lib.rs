//! Bridge runtime between a host application's method channel and the
//! native on-demand pack delivery subsystem.
//!
//! # Architecture
//!
//! - **`PackBridge`**: facade owning the command worker and the publisher
//! - **`CommandDispatcher`**: validates and routes one command at a time
//! - **`ResponseGuard`**: exactly-once reply delivery per command
//! - **`ProgressPublisher`**: single-subscriber progress stream, marshalled
//!   off the native callback context
//!
//! The native subsystem itself is a black box behind
//! [`AssetPackManagerPort`](packbridge_core::AssetPackManagerPort).

#![deny(unused_crate_dependencies)]

mod bridge;
mod config;
mod dispatcher;
mod guard;
mod method;
mod publisher;

pub use bridge::PackBridge;
pub use config::BridgeConfig;
pub use dispatcher::CommandDispatcher;
pub use guard::ResponseGuard;
pub use method::{
    METHOD_CANCEL_DOWNLOAD, METHOD_GET_PACK_PATH, METHOD_GET_PACK_SIZE, METHOD_GET_PACK_STATUS,
    METHOD_REQUEST_DOWNLOAD, MethodCall, MethodOutcome,
};
pub use publisher::{ChannelProgressSink, ProgressPublisher};

// Re-export commonly used core types so adapters need only one dependency.
pub use packbridge_core::{
    AssetPackManagerPort, BridgeError, DeliveryStatus, NativePackStatus, NoopProgressSink,
    PackLocation, PackManagerError, PackProgress, PackStateListener, PackStateUpdate, ProgressSink,
};

// Silence unused dev-dependency warnings until we add timing-based tests
#[cfg(test)]
use tokio_test as _;
