//! Native delivery subsystem port definition.
//!
//! This port is the bridge's only view of the platform service that
//! actually transfers and installs packs. Its internal download, caching
//! and retry logic is a black box; the trait exposes just the calls the
//! bridge needs.
//!
//! # Design
//!
//! - Only core domain types in signatures
//! - Listener registration is append-only: the native layer is not assumed
//!   to offer a reliable unregister primitive

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::PackManagerError;
use crate::status::NativePackStatus;

/// Local install location of a pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackLocation {
    /// Filesystem path of the pack's assets.
    pub assets_path: PathBuf,
}

impl PackLocation {
    /// Create a location from an assets path.
    pub fn new(assets_path: impl Into<PathBuf>) -> Self {
        Self {
            assets_path: assets_path.into(),
        }
    }
}

/// Raw state report delivered by the native subsystem's listener callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackStateUpdate {
    /// Name of the pack this update concerns.
    pub pack_name: String,
    /// Raw native status.
    pub status: NativePackStatus,
    /// Bytes downloaded so far.
    pub bytes_downloaded: u64,
    /// Total bytes to download; `0` when unknown.
    pub total_bytes: u64,
}

/// Callback registered with the native subsystem for state updates.
///
/// Invoked zero or more times, on an unspecified execution context.
pub type PackStateListener = Box<dyn Fn(PackStateUpdate) + Send + Sync>;

/// Port for the native on-demand pack delivery subsystem.
///
/// # Usage
///
/// ```ignore
/// let manager: Arc<dyn AssetPackManagerPort> = /* platform adapter */;
///
/// if manager.pack_location("pack_a1_unit_01").await?.is_some() {
///     // already installed
/// } else {
///     manager.fetch(vec!["pack_a1_unit_01".to_string()]).await?;
/// }
/// ```
#[async_trait]
pub trait AssetPackManagerPort: Send + Sync {
    /// Query the local install location of a pack.
    ///
    /// Returns `None` when the pack is not installed. Effectively
    /// synchronous from the bridge's point of view.
    async fn pack_location(
        &self,
        pack_name: &str,
    ) -> Result<Option<PackLocation>, PackManagerError>;

    /// Ask the native subsystem to begin fetching the given packs.
    ///
    /// Resolves when the native layer reports terminal success or failure
    /// for the fetch request; progress arrives separately through the
    /// registered listener.
    async fn fetch(&self, pack_names: Vec<String>) -> Result<(), PackManagerError>;

    /// Request cancellation of in-flight downloads.
    ///
    /// Advisory: the native layer confirms receipt of the request, not
    /// actual cessation. Callers observe the terminal status via the
    /// listener.
    async fn cancel(&self, pack_names: Vec<String>) -> Result<(), PackManagerError>;

    /// Register a state-update listener with the native subsystem.
    ///
    /// Registration is append-only; the bridge registers at most one
    /// listener over its lifetime and never assumes it can unregister.
    fn register_listener(&self, listener: PackStateListener) -> Result<(), PackManagerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_location_from_str() {
        let location = PackLocation::new("/data/packs/unit_01/assets");
        assert_eq!(
            location.assets_path,
            PathBuf::from("/data/packs/unit_01/assets")
        );
    }
}
