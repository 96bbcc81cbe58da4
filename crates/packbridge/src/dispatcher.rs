//! Command dispatcher.
//!
//! Routes one inbound [`MethodCall`] at a time: validates arguments,
//! invokes the native port, and completes the command's [`ResponseGuard`]
//! exactly once. No fault escapes the dispatch boundary; anything the
//! routing does not map specifically becomes a `NATIVE_EXCEPTION` reply.

use std::sync::Arc;

use serde_json::{Value, json};

use packbridge_core::{AssetPackManagerPort, BridgeError, PackManagerError};

use crate::guard::ResponseGuard;
use crate::method::{
    METHOD_CANCEL_DOWNLOAD, METHOD_GET_PACK_PATH, METHOD_GET_PACK_SIZE, METHOD_GET_PACK_STATUS,
    METHOD_REQUEST_DOWNLOAD, MethodCall,
};

/// Dispatches method-channel commands against the native delivery port.
pub struct CommandDispatcher {
    manager: Arc<dyn AssetPackManagerPort>,
}

impl CommandDispatcher {
    /// Create a dispatcher over the native port.
    pub fn new(manager: Arc<dyn AssetPackManagerPort>) -> Self {
        Self { manager }
    }

    /// Process one command, completing `response` exactly once.
    ///
    /// For `requestDownload` the completion may arrive from a spawned task
    /// after this method has returned; every other command is completed
    /// before returning.
    pub async fn dispatch(&self, call: MethodCall, response: Arc<ResponseGuard>) {
        if let Err(err) = self.route(&call, &response).await {
            tracing::debug!(method = %call.method, code = err.code(), "command failed");
            // No-op if a handler already completed the guard.
            response.error(&err);
        }
    }

    async fn route(
        &self,
        call: &MethodCall,
        response: &Arc<ResponseGuard>,
    ) -> Result<(), BridgeError> {
        match call.method.as_str() {
            METHOD_GET_PACK_STATUS => self.get_pack_status(call, response).await,
            METHOD_REQUEST_DOWNLOAD => self.request_download(call, response),
            METHOD_GET_PACK_PATH => self.get_pack_path(call, response).await,
            METHOD_GET_PACK_SIZE => {
                // The native layer exposes no size query; the host treats a
                // null payload as "size unknown".
                response.success(Value::Null);
                Ok(())
            }
            METHOD_CANCEL_DOWNLOAD => self.cancel_download(call, response).await,
            _ => {
                tracing::debug!(method = %call.method, "unrecognized method");
                response.not_implemented();
                Ok(())
            }
        }
    }

    /// `getPackStatus`: installed if the native layer knows a local location.
    async fn get_pack_status(
        &self,
        call: &MethodCall,
        response: &Arc<ResponseGuard>,
    ) -> Result<(), BridgeError> {
        let pack_name = required_pack_name(call)?;
        let location = self
            .manager
            .pack_location(pack_name)
            .await
            .map_err(native)?;

        let status = if location.is_some() {
            "installed"
        } else {
            "not_installed"
        };
        response.success(json!(status));
        Ok(())
    }

    /// `requestDownload`: start the fetch and complete from a spawned task.
    ///
    /// The command loop must not wait on the native fetch, so the guard is
    /// handed to the completion task and this handler returns immediately.
    fn request_download(
        &self,
        call: &MethodCall,
        response: &Arc<ResponseGuard>,
    ) -> Result<(), BridgeError> {
        let pack_name = required_pack_name(call)?.to_string();
        let manager = Arc::clone(&self.manager);
        let guard = Arc::clone(response);

        tokio::spawn(async move {
            match manager.fetch(vec![pack_name.clone()]).await {
                Ok(()) => {
                    tracing::debug!(pack = %pack_name, "fetch accepted");
                    // Caller observes progress via the stream, not here.
                    guard.success(Value::Null);
                }
                Err(err) => {
                    tracing::warn!(pack = %pack_name, error = %err, "fetch failed");
                    guard.error(&BridgeError::download_failed(err.message));
                }
            }
        });
        Ok(())
    }

    /// `getPackPath`: assets path of the installed pack, or null.
    async fn get_pack_path(
        &self,
        call: &MethodCall,
        response: &Arc<ResponseGuard>,
    ) -> Result<(), BridgeError> {
        let pack_name = required_pack_name(call)?;
        let location = self
            .manager
            .pack_location(pack_name)
            .await
            .map_err(native)?;

        let payload = location.map_or(Value::Null, |loc| {
            json!(loc.assets_path.to_string_lossy())
        });
        response.success(payload);
        Ok(())
    }

    /// `cancelDownload`: advisory; succeeds once the request is issued.
    async fn cancel_download(
        &self,
        call: &MethodCall,
        response: &Arc<ResponseGuard>,
    ) -> Result<(), BridgeError> {
        let pack_name = required_pack_name(call)?;
        self.manager
            .cancel(vec![pack_name.to_string()])
            .await
            .map_err(native)?;

        response.success(Value::Null);
        Ok(())
    }
}

/// Validate the `packName` argument before touching the native port.
fn required_pack_name(call: &MethodCall) -> Result<&str, BridgeError> {
    call.pack_name()
        .ok_or_else(|| BridgeError::invalid_argument("Pack name is required"))
}

/// Map an unclassified native failure to the `NATIVE_EXCEPTION` boundary.
fn native(err: PackManagerError) -> BridgeError {
    BridgeError::from_native_failure(&err)
}
