//! Single-completion guard for command replies.
//!
//! The reply primitive for a command is a bare oneshot sender with no
//! protection against double invocation: the native subsystem may drive
//! both an immediate synchronous path and a deferred callback for the same
//! logical request, and the dispatcher's own error boundary can race a
//! completion already in flight. The guard makes whichever completion wins
//! the only one the caller observes.

use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::oneshot;

use packbridge_core::BridgeError;

use crate::method::MethodOutcome;

/// Wraps one command's reply sender so exactly one completion reaches the
/// caller.
///
/// The first of [`success`](Self::success), [`error`](Self::error), or
/// [`not_implemented`](Self::not_implemented) consumes the sender; every
/// later call, from any thread, is a silent no-op.
pub struct ResponseGuard {
    reply: Mutex<Option<oneshot::Sender<MethodOutcome>>>,
    method: String,
}

impl ResponseGuard {
    /// Wrap the reply sender for the given method.
    pub fn new(method: impl Into<String>, reply: oneshot::Sender<MethodOutcome>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            method: method.into(),
        }
    }

    /// Complete with a success payload.
    pub fn success(&self, value: Value) {
        self.complete(MethodOutcome::Success(value));
    }

    /// Complete with an error.
    pub fn error(&self, err: &BridgeError) {
        self.complete(MethodOutcome::from_error(err));
    }

    /// Complete with the not-implemented signal.
    pub fn not_implemented(&self) {
        self.complete(MethodOutcome::NotImplemented);
    }

    /// Whether a completion has already been delivered.
    pub fn is_consumed(&self) -> bool {
        self.reply.lock().is_ok_and(|slot| slot.is_none())
    }

    fn complete(&self, outcome: MethodOutcome) {
        let sender = match self.reply.lock() {
            Ok(mut slot) => slot.take(),
            // A panicked completer cannot leave the slot half-written; the
            // sender is either still there or already consumed. Treat a
            // poisoned lock as consumed.
            Err(_) => None,
        };

        match sender {
            Some(tx) => {
                if tx.send(outcome).is_err() {
                    tracing::debug!(method = %self.method, "caller dropped before reply");
                }
            }
            None => {
                tracing::trace!(method = %self.method, "suppressed duplicate completion");
            }
        }
    }
}
