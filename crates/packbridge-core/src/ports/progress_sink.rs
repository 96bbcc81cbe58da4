//! Progress sink trait for UI-side event delivery.
//!
//! This module defines the abstraction the publisher delivers mapped
//! progress events into. Implementations handle transport details
//! (channels, platform event streams, SSE, etc.).

use crate::events::PackProgress;

/// Trait for delivering progress events to the active subscriber.
///
/// # Implementations
///
/// - [`NoopProgressSink`] - For tests and contexts without a subscriber
/// - Transport-specific implementations (channel-backed, platform stream)
pub trait ProgressSink: Send + Sync {
    /// Deliver one progress event.
    ///
    /// Implementations should hand the event off asynchronously or buffer
    /// it. This method must not block the calling context.
    fn send(&self, event: PackProgress);

    /// Clone this sink into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn ProgressSink>` without requiring
    /// the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn ProgressSink>;
}

/// A no-op progress sink for tests and subscriber-less contexts.
///
/// Discards every event.
#[derive(Debug, Clone, Default)]
pub struct NoopProgressSink;

impl NoopProgressSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressSink for NoopProgressSink {
    fn send(&self, _event: PackProgress) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn ProgressSink> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DeliveryStatus;
    use std::sync::Arc;

    #[test]
    fn noop_sink_discards() {
        let sink = NoopProgressSink::new();
        sink.send(PackProgress::new(
            "unit_01",
            DeliveryStatus::Downloading,
            1,
            2,
        ));
    }

    #[test]
    fn noop_sink_clone_box() {
        let sink = NoopProgressSink::new();
        let _boxed: Box<dyn ProgressSink> = sink.clone_box();
    }

    #[test]
    fn arc_sink_is_object_safe() {
        let sink: Arc<dyn ProgressSink> = Arc::new(NoopProgressSink::new());
        sink.send(PackProgress::new("unit_01", DeliveryStatus::Installed, 2, 2));
    }
}
