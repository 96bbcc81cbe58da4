//! Progress event payloads pushed to UI-side subscribers.
//!
//! # Wire Format
//!
//! Events use camelCase keys to match the host application's channel
//! contract:
//!
//! ```json
//! { "packName": "pack_a1_unit_02", "status": "downloading",
//!   "bytesDownloaded": 1000, "totalBytes": 5000 }
//! ```

use serde::{Deserialize, Serialize};

use crate::status::DeliveryStatus;

/// One download progress update for a single pack.
///
/// Produced from every native status callback while a subscription is
/// active; never buffered or replayed to late subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackProgress {
    /// Name of the pack this update concerns.
    #[serde(rename = "packName")]
    pub pack_name: String,
    /// Mapped public status.
    pub status: DeliveryStatus,
    /// Bytes downloaded so far.
    #[serde(rename = "bytesDownloaded")]
    pub bytes_downloaded: u64,
    /// Total bytes to download; `0` when the native layer does not know.
    #[serde(rename = "totalBytes")]
    pub total_bytes: u64,
}

impl PackProgress {
    /// Create a progress event.
    pub fn new(
        pack_name: impl Into<String>,
        status: DeliveryStatus,
        bytes_downloaded: u64,
        total_bytes: u64,
    ) -> Self {
        Self {
            pack_name: pack_name.into(),
            status,
            bytes_downloaded,
            total_bytes,
        }
    }

    /// Whether this event ends the pack's download lifecycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lock down wire keys to prevent frontend subscription mismatches.
    ///
    /// The host application reads these exact keys from the event stream;
    /// if this test fails, the UI-side decoder must change in lockstep.
    #[test]
    fn wire_keys_are_stable() {
        let event = PackProgress::new("pack_a1_unit_02", DeliveryStatus::Downloading, 1000, 5000);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"packName\":\"pack_a1_unit_02\""));
        assert!(json.contains("\"status\":\"downloading\""));
        assert!(json.contains("\"bytesDownloaded\":1000"));
        assert!(json.contains("\"totalBytes\":5000"));
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let event = PackProgress::new("unit_01", DeliveryStatus::Installed, 5000, 5000);
        let parsed: PackProgress =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(parsed, event);
        assert!(parsed.is_terminal());
    }
}
