//! Progress publisher.
//!
//! Owns the single active sink and republishes native status callbacks to
//! it as mapped [`PackProgress`] events. Native callbacks fire on an
//! unspecified context, so raw updates are handed off through a channel
//! and delivered by a forwarding task running on the bridge runtime; the
//! callback never touches the sink directly.
//!
//! # Lifecycle
//!
//! `Unsubscribed -> Subscribed` on [`subscribe`](ProgressPublisher::subscribe),
//! back on [`unsubscribe`](ProgressPublisher::unsubscribe). The native
//! listener is registered on the first subscribe that succeeds and is never
//! unregistered: the native layer offers no reliable unregister primitive,
//! so unsubscribing only stops forwarding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use packbridge_core::{
    AssetPackManagerPort, DeliveryStatus, PackProgress, PackStateUpdate, ProgressSink,
};

type SinkSlot = Arc<RwLock<Option<Arc<dyn ProgressSink>>>>;

/// Republishes native pack-state callbacks to at most one subscriber.
pub struct ProgressPublisher {
    manager: Arc<dyn AssetPackManagerPort>,
    sink: SinkSlot,
    listener_registered: AtomicBool,
    updates_tx: mpsc::UnboundedSender<PackStateUpdate>,
}

impl ProgressPublisher {
    /// Create a publisher and spawn its forwarding task.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(manager: Arc<dyn AssetPackManagerPort>) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let sink: SinkSlot = Arc::new(RwLock::new(None));

        tokio::spawn(forward_updates(updates_rx, Arc::clone(&sink)));

        Self {
            manager,
            sink,
            listener_registered: AtomicBool::new(false),
            updates_tx,
        }
    }

    /// Install `sink` as the active subscriber and arm the native listener.
    ///
    /// Replaces any previous sink atomically. A listener-registration
    /// failure is swallowed: the stream stays silent rather than failing
    /// the subscribe, and registration is retried on the next subscribe.
    pub fn subscribe(&self, sink: Arc<dyn ProgressSink>) {
        {
            let mut slot = self.sink.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            *slot = Some(sink);
        }
        self.ensure_listener();
    }

    /// Drop the active sink; subsequent events are discarded.
    ///
    /// Native-side de-registration is not attempted.
    pub fn unsubscribe(&self) {
        let mut slot = self.sink.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }

    /// Whether a sink is currently installed.
    pub fn is_subscribed(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    /// Register the native listener at most once over this publisher's
    /// lifetime.
    fn ensure_listener(&self) {
        if self
            .listener_registered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let updates_tx = self.updates_tx.clone();
        let listener = Box::new(move |update: PackStateUpdate| {
            // Fires on the native worker context; hand off, never deliver.
            let _ = updates_tx.send(update);
        });

        if let Err(err) = self.manager.register_listener(listener) {
            tracing::warn!(error = %err, "pack listener registration failed; stream stays silent");
            // Allow a later subscribe to retry.
            self.listener_registered.store(false, Ordering::SeqCst);
        }
    }
}

/// Drain raw updates, map them, and deliver to the current sink, if any.
async fn forward_updates(mut updates_rx: mpsc::UnboundedReceiver<PackStateUpdate>, sink: SinkSlot) {
    while let Some(update) = updates_rx.recv().await {
        let event = PackProgress::new(
            update.pack_name,
            DeliveryStatus::from_native(update.status),
            update.bytes_downloaded,
            update.total_bytes,
        );

        let current = sink
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        match current {
            Some(sink) => sink.send(event),
            None => {
                tracing::trace!(pack = %event.pack_name, "no subscriber; progress event dropped");
            }
        }
    }
}

/// Channel-backed sink: forwards events into an unbounded mpsc sender.
///
/// Useful for subscribers that want to consume the stream as a receiver.
#[derive(Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<PackProgress>,
}

impl ChannelProgressSink {
    /// Create a sink/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PackProgress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn send(&self, event: PackProgress) {
        if self.tx.send(event).is_err() {
            tracing::debug!("progress receiver dropped");
        }
    }

    fn clone_box(&self) -> Box<dyn ProgressSink> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    use packbridge_core::{NativePackStatus, PackLocation, PackManagerError, PackStateListener};

    /// Fake native port that captures the registered listener so tests can
    /// inject callbacks from arbitrary threads.
    #[derive(Default)]
    struct ListenerHarness {
        listener: Mutex<Option<PackStateListener>>,
        fail_registration: AtomicBool,
        registrations: Counter,
    }

    #[derive(Default)]
    struct Counter(std::sync::atomic::AtomicUsize);

    impl Counter {
        fn bump(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl ListenerHarness {
        fn emit(&self, update: PackStateUpdate) {
            let guard = self.listener.lock().unwrap();
            let listener = guard.as_ref().expect("listener registered");
            listener(update);
        }
    }

    #[async_trait]
    impl AssetPackManagerPort for ListenerHarness {
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

        fn register_listener(&self, listener: PackStateListener) -> Result<(), PackManagerError> {
            self.registrations.bump();
            if self.fail_registration.load(Ordering::SeqCst) {
                return Err(PackManagerError::new("listener registration unavailable"));
            }
            *self.listener.lock().unwrap() = Some(listener);
            Ok(())
        }
    }

    /// Sink that captures delivered events.
    #[derive(Clone, Default)]
    struct CapturingSink {
        events: Arc<Mutex<Vec<PackProgress>>>,
    }

    impl ProgressSink for CapturingSink {
        fn send(&self, event: PackProgress) {
            self.events.lock().unwrap().push(event);
        }

        fn clone_box(&self) -> Box<dyn ProgressSink> {
            Box::new(self.clone())
        }
    }

    fn update(pack: &str, status: NativePackStatus, downloaded: u64, total: u64) -> PackStateUpdate {
        PackStateUpdate {
            pack_name: pack.to_string(),
            status,
            bytes_downloaded: downloaded,
            total_bytes: total,
        }
    }

    async fn wait_for_events(sink: &CapturingSink, count: usize) -> Vec<PackProgress> {
        for _ in 0..100 {
            if sink.events.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        sink.events.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn callbacks_are_mapped_and_delivered_in_order() {
        let harness = Arc::new(ListenerHarness::default());
        let publisher = ProgressPublisher::new(Arc::clone(&harness) as _);

        let sink = CapturingSink::default();
        publisher.subscribe(Arc::new(sink.clone()));

        harness.emit(update("unit_02", NativePackStatus::Transferring, 1000, 5000));
        harness.emit(update("unit_02", NativePackStatus::Completed, 5000, 5000));

        let events = wait_for_events(&sink, 2).await;
        assert_eq!(
            events,
            vec![
                PackProgress::new("unit_02", DeliveryStatus::Downloading, 1000, 5000),
                PackProgress::new("unit_02", DeliveryStatus::Installed, 5000, 5000),
            ]
        );
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery_despite_native_emissions() {
        let harness = Arc::new(ListenerHarness::default());
        let publisher = ProgressPublisher::new(Arc::clone(&harness) as _);

        let sink = CapturingSink::default();
        publisher.subscribe(Arc::new(sink.clone()));
        harness.emit(update("unit_02", NativePackStatus::Downloading, 10, 100));
        wait_for_events(&sink, 1).await;

        publisher.unsubscribe();
        assert!(!publisher.is_subscribed());
        harness.emit(update("unit_02", NativePackStatus::Downloading, 50, 100));
        harness.emit(update("unit_02", NativePackStatus::Completed, 100, 100));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resubscribe_rearms_delivery_to_the_new_sink() {
        let harness = Arc::new(ListenerHarness::default());
        let publisher = ProgressPublisher::new(Arc::clone(&harness) as _);

        let first = CapturingSink::default();
        publisher.subscribe(Arc::new(first.clone()));
        publisher.unsubscribe();

        let second = CapturingSink::default();
        publisher.subscribe(Arc::new(second.clone()));
        harness.emit(update("unit_01", NativePackStatus::Pending, 0, 0));

        let events = wait_for_events(&second, 1).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, DeliveryStatus::Pending);
        assert!(first.events.lock().unwrap().is_empty());
        // Still a single native listener across the whole cycle.
        assert_eq!(harness.registrations.get(), 1);
    }

    #[tokio::test]
    async fn registration_failure_is_swallowed_and_retried() {
        let harness = Arc::new(ListenerHarness::default());
        harness.fail_registration.store(true, Ordering::SeqCst);
        let publisher = ProgressPublisher::new(Arc::clone(&harness) as _);

        // Subscribe does not fail; the stream is simply silent.
        let sink = CapturingSink::default();
        publisher.subscribe(Arc::new(sink.clone()));
        assert_eq!(harness.registrations.get(), 1);
        assert!(harness.listener.lock().unwrap().is_none());

        // Next subscribe retries and succeeds.
        harness.fail_registration.store(false, Ordering::SeqCst);
        publisher.subscribe(Arc::new(sink.clone()));
        assert_eq!(harness.registrations.get(), 2);

        harness.emit(update("unit_01", NativePackStatus::Completed, 1, 1));
        let events = wait_for_events(&sink, 1).await;
        assert_eq!(events[0].status, DeliveryStatus::Installed);
    }

    #[tokio::test]
    async fn channel_sink_pair_delivers() {
        let (sink, mut rx) = ChannelProgressSink::channel();
        sink.send(PackProgress::new("unit_01", DeliveryStatus::Failed, 0, 0));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, DeliveryStatus::Failed);
    }
}
