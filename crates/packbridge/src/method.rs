//! Method-channel call and outcome types.
//!
//! A [`MethodCall`] mirrors one inbound command from the host application's
//! method channel: a method name plus a JSON argument map. A
//! [`MethodOutcome`] is the single reply the caller observes.

use serde_json::Value;

use packbridge_core::BridgeError;

/// Method name for querying install status.
pub const METHOD_GET_PACK_STATUS: &str = "getPackStatus";
/// Method name for starting a download.
pub const METHOD_REQUEST_DOWNLOAD: &str = "requestDownload";
/// Method name for querying the installed assets path.
pub const METHOD_GET_PACK_PATH: &str = "getPackPath";
/// Method name for querying pack size (not wired in the native layer).
pub const METHOD_GET_PACK_SIZE: &str = "getPackSize";
/// Method name for cancelling a download.
pub const METHOD_CANCEL_DOWNLOAD: &str = "cancelDownload";

/// Argument key carrying the pack name.
const ARG_PACK_NAME: &str = "packName";

/// One inbound command from the method channel.
#[derive(Clone, Debug)]
pub struct MethodCall {
    /// Wire method name.
    pub method: String,
    /// JSON argument map, if any.
    pub arguments: Option<Value>,
}

impl MethodCall {
    /// Create a call with arguments.
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments: Some(arguments),
        }
    }

    /// Create a call without arguments.
    pub fn without_arguments(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: None,
        }
    }

    /// Extract the `packName` argument, if present and a non-empty string.
    #[must_use]
    pub fn pack_name(&self) -> Option<&str> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get(ARG_PACK_NAME))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// The single reply delivered for one [`MethodCall`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodOutcome {
    /// The command succeeded; the payload may be `Value::Null`.
    Success(Value),
    /// The command failed with a wire-coded error.
    Error {
        /// Wire error code (`INVALID_ARGUMENT`, `DOWNLOAD_FAILED`, ...).
        code: String,
        /// Human-readable message.
        message: Option<String>,
        /// Diagnostic details, if any.
        details: Option<String>,
    },
    /// The method name is not recognized by this bridge version.
    ///
    /// Distinct from both success and error so callers can detect protocol
    /// drift between UI and bridge versions.
    NotImplemented,
}

impl MethodOutcome {
    /// Build an error outcome from a bridge error.
    #[must_use]
    pub fn from_error(err: &BridgeError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: Some(err.message().to_string()),
            details: err.details().map(ToString::to_string),
        }
    }

    /// Whether this outcome is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
