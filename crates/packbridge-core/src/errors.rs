//! Bridge error taxonomy.
//!
//! These errors are designed to be serializable and to carry the wire-level
//! error code strings the host application matches on. Foreign errors are
//! captured as strings rather than wrapped, so nothing here depends on
//! non-serializable types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire error code for argument validation failures.
pub const CODE_INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
/// Wire error code for native fetch failures.
pub const CODE_DOWNLOAD_FAILED: &str = "DOWNLOAD_FAILED";
/// Wire error code for faults caught at the dispatcher boundary.
pub const CODE_NATIVE_EXCEPTION: &str = "NATIVE_EXCEPTION";

/// Error reported to the caller of a bridge command.
///
/// Nothing in this taxonomy is retried by the bridge itself; recovery
/// policy belongs to the caller.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum BridgeError {
    /// The command was missing or malformed a required argument.
    ///
    /// Detected before any native call is made.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was missing or malformed.
        message: String,
    },

    /// The native subsystem reported a download failure.
    #[error("Download failed: {message}")]
    DownloadFailed {
        /// The native error message, verbatim.
        message: String,
    },

    /// An unexpected fault was caught at the dispatcher boundary.
    #[error("Native exception: {message}")]
    Native {
        /// The underlying message.
        message: String,
        /// A string rendering of the failure for diagnostics.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl BridgeError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a download-failed error carrying the native message.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create a native-exception error.
    pub fn native(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Native {
            message: message.into(),
            details,
        }
    }

    /// Wrap an opaque native failure, keeping a debug rendering as details.
    #[must_use]
    pub fn from_native_failure(err: &PackManagerError) -> Self {
        Self::Native {
            message: err.to_string(),
            details: Some(format!("{err:?}")),
        }
    }

    /// The wire-level error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => CODE_INVALID_ARGUMENT,
            Self::DownloadFailed { .. } => CODE_DOWNLOAD_FAILED,
            Self::Native { .. } => CODE_NATIVE_EXCEPTION,
        }
    }

    /// The human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message }
            | Self::DownloadFailed { message }
            | Self::Native { message, .. } => message,
        }
    }

    /// Diagnostic details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Native { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

/// Opaque failure returned by the native delivery subsystem port.
///
/// The native layer is a black box; all the bridge gets is a message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PackManagerError {
    /// The native failure message.
    pub message: String,
}

impl PackManagerError {
    /// Create a native failure from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wire_contract() {
        assert_eq!(
            BridgeError::invalid_argument("Pack name is required").code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            BridgeError::download_failed("network error").code(),
            "DOWNLOAD_FAILED"
        );
        assert_eq!(
            BridgeError::native("boom", None).code(),
            "NATIVE_EXCEPTION"
        );
    }

    #[test]
    fn native_failure_keeps_message_and_details() {
        let native = PackManagerError::new("listener detached");
        let err = BridgeError::from_native_failure(&native);
        assert_eq!(err.message(), "listener detached");
        assert!(err.details().unwrap().contains("listener detached"));
    }

    #[test]
    fn error_serialization_roundtrip() {
        let err = BridgeError::download_failed("network error");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("network error"));

        let parsed: BridgeError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
