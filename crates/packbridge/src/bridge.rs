//! Bridge facade.
//!
//! [`PackBridge`] ties the pieces together: a single dedicated worker task
//! drains inbound commands through the [`CommandDispatcher`], and the
//! [`ProgressPublisher`] carries the event stream. Commands never run on
//! the caller's context, so a slow native call cannot block it.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use packbridge_core::{AssetPackManagerPort, BridgeError, PackProgress, ProgressSink};

use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::guard::ResponseGuard;
use crate::method::{MethodCall, MethodOutcome};
use crate::publisher::{ChannelProgressSink, ProgressPublisher};

/// One queued command with its reply channel.
struct PendingCommand {
    call: MethodCall,
    reply: oneshot::Sender<MethodOutcome>,
}

/// Bridge between the host application's method channel and the native
/// pack delivery subsystem.
///
/// Construct once per bridge lifetime, within a tokio runtime.
///
/// # Usage
///
/// ```ignore
/// let bridge = PackBridge::new(manager, BridgeConfig::default());
///
/// let mut progress = bridge.subscribe_channel();
/// let outcome = bridge
///     .invoke(MethodCall::new("requestDownload", json!({ "packName": "unit_02" })))
///     .await;
/// ```
pub struct PackBridge {
    commands_tx: mpsc::Sender<PendingCommand>,
    publisher: ProgressPublisher,
}

impl PackBridge {
    /// Create the bridge and spawn its command worker.
    pub fn new(manager: Arc<dyn AssetPackManagerPort>, config: BridgeConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(config.command_buffer);
        let dispatcher = CommandDispatcher::new(Arc::clone(&manager));

        tokio::spawn(run_commands(commands_rx, dispatcher));

        Self {
            commands_tx,
            publisher: ProgressPublisher::new(manager),
        }
    }

    /// Issue one command and await its single outcome.
    ///
    /// Every call observes exactly one reply. If the worker is gone (the
    /// runtime is shutting down), a `NATIVE_EXCEPTION` outcome is
    /// synthesized instead of panicking.
    pub async fn invoke(&self, call: MethodCall) -> MethodOutcome {
        let (reply, rx) = oneshot::channel();
        if self
            .commands_tx
            .send(PendingCommand { call, reply })
            .await
            .is_err()
        {
            return worker_gone();
        }

        rx.await.unwrap_or_else(|_| worker_gone())
    }

    /// Install a progress sink; replaces any previous subscriber.
    pub fn subscribe(&self, sink: Arc<dyn ProgressSink>) {
        self.publisher.subscribe(sink);
    }

    /// Stop forwarding progress events.
    pub fn unsubscribe(&self) {
        self.publisher.unsubscribe();
    }

    /// Subscribe with a channel-backed sink and return its receiver.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<PackProgress> {
        let (sink, rx) = ChannelProgressSink::channel();
        self.publisher.subscribe(Arc::new(sink));
        rx
    }

    /// Whether a progress subscriber is currently installed.
    pub fn is_subscribed(&self) -> bool {
        self.publisher.is_subscribed()
    }
}

/// The command worker loop: one command validated, executed, and completed
/// (or handed to its async completion task) before the next is taken.
async fn run_commands(
    mut commands_rx: mpsc::Receiver<PendingCommand>,
    dispatcher: CommandDispatcher,
) {
    while let Some(PendingCommand { call, reply }) = commands_rx.recv().await {
        let guard = Arc::new(ResponseGuard::new(call.method.clone(), reply));
        dispatcher.dispatch(call, guard).await;
    }
    tracing::debug!("command channel closed; bridge worker exiting");
}

fn worker_gone() -> MethodOutcome {
    MethodOutcome::from_error(&BridgeError::native(
        "bridge command worker is not running",
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use packbridge_core::{PackLocation, PackManagerError, PackStateListener};

    struct IdleManager;

    #[async_trait]
    impl AssetPackManagerPort for IdleManager {
        async fn pack_location(
            &self,
            _pack_name: &str,
        ) -> Result<Option<PackLocation>, PackManagerError> {
            Ok(None)
        }

        async fn fetch(&self, _pack_names: Vec<String>) -> Result<(), PackManagerError> {
            Ok(())
        }

        async fn cancel(&self, _pack_names: Vec<String>) -> Result<(), PackManagerError> {
            Ok(())
        }

        fn register_listener(&self, _listener: PackStateListener) -> Result<(), PackManagerError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn invoke_delivers_exactly_one_outcome() {
        let bridge = PackBridge::new(Arc::new(IdleManager), BridgeConfig::default());
        let outcome = bridge
            .invoke(MethodCall::new(
                "getPackStatus",
                json!({ "packName": "unit_01" }),
            ))
            .await;
        assert_eq!(outcome, MethodOutcome::Success(json!("not_installed")));
    }

    #[test]
    fn invoke_after_worker_shutdown_synthesizes_error() {
        // Host the bridge's tasks on a runtime the test can tear down.
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = {
            let _guard = runtime.enter();
            PackBridge::new(Arc::new(IdleManager), BridgeConfig::default())
        };
        // Waits for the worker task to be dropped, unlike `shutdown_background`.
        runtime.shutdown_timeout(std::time::Duration::from_secs(1));

        let driver = tokio::runtime::Runtime::new().unwrap();
        let outcome = driver.block_on(bridge.invoke(MethodCall::new(
            "getPackStatus",
            json!({ "packName": "unit_01" }),
        )));
        match outcome {
            MethodOutcome::Error { code, message, .. } => {
                assert_eq!(code, "NATIVE_EXCEPTION");
                assert_eq!(message.as_deref(), Some("bridge command worker is not running"));
            }
            other => panic!("expected synthesized error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn subscribe_state_tracks_lifecycle() {
        let bridge = PackBridge::new(Arc::new(IdleManager), BridgeConfig::default());
        assert!(!bridge.is_subscribed());
        let _rx = bridge.subscribe_channel();
        assert!(bridge.is_subscribed());
        bridge.unsubscribe();
        assert!(!bridge.is_subscribed());
    }
}
