//! Pack status vocabulary and the native → public status mapping.
//!
//! The native delivery subsystem distinguishes transfer sub-phases and
//! network-wait states that the UI never needs. Everything collapses into
//! the six-value [`DeliveryStatus`] vocabulary so the UI contract stays
//! stable across native library upgrades.

use serde::{Deserialize, Serialize};

/// Raw status reported by the native delivery subsystem for a pack.
///
/// Decoded from the subsystem's integer wire codes. Codes added by future
/// native library versions decode to [`NativePackStatus::Other`] rather
/// than failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativePackStatus {
    /// Status could not be determined by the native layer.
    Unknown,
    /// Download has been requested but not yet started.
    Pending,
    /// Bytes are being downloaded.
    Downloading,
    /// Download finished, assets are being moved into place.
    Transferring,
    /// Pack is fully downloaded and installed.
    Completed,
    /// Download failed.
    Failed,
    /// Download was cancelled.
    Canceled,
    /// Download is waiting for a suitable network connection.
    WaitingForNetwork,
    /// Pack is not installed and no download is in flight.
    NotInstalled,
    /// A status code this bridge version does not know about.
    Other(i32),
}

impl NativePackStatus {
    /// Decode a native wire code. Total; unrecognized codes become `Other`.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Pending,
            2 => Self::Downloading,
            3 => Self::Transferring,
            4 => Self::Completed,
            5 => Self::Failed,
            6 => Self::Canceled,
            7 => Self::WaitingForNetwork,
            8 => Self::NotInstalled,
            other => Self::Other(other),
        }
    }
}

/// Public download status vocabulary exposed to the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Download requested, not yet transferring bytes.
    Pending,
    /// Bytes are moving (includes transfer and network-wait sub-phases).
    Downloading,
    /// Pack is installed locally.
    Installed,
    /// Download failed or was cancelled.
    Failed,
    /// Pack is not installed.
    NotInstalled,
    /// The native layer reported something this bridge does not recognize.
    Unknown,
}

impl DeliveryStatus {
    /// Map a native status into the public vocabulary.
    ///
    /// Pure and total: every native value, including codes from future
    /// native library versions, maps to exactly one public status.
    #[must_use]
    pub const fn from_native(native: NativePackStatus) -> Self {
        match native {
            NativePackStatus::Pending => Self::Pending,
            NativePackStatus::Downloading
            | NativePackStatus::Transferring
            | NativePackStatus::WaitingForNetwork => Self::Downloading,
            NativePackStatus::Completed => Self::Installed,
            NativePackStatus::Failed | NativePackStatus::Canceled => Self::Failed,
            NativePackStatus::NotInstalled => Self::NotInstalled,
            NativePackStatus::Unknown | NativePackStatus::Other(_) => Self::Unknown,
        }
    }

    /// String representation used on the wire and in command responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Installed => "installed",
            Self::Failed => "failed",
            Self::NotInstalled => "not_installed",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this status ends a download's lifecycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Installed | Self::Failed)
    }
}
