//! Bridge configuration.

/// Configuration for creating a [`PackBridge`](crate::PackBridge).
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Capacity of the inbound command channel.
    ///
    /// Commands beyond this bound apply back-pressure to callers rather
    /// than growing without limit.
    pub command_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { command_buffer: 16 }
    }
}

impl BridgeConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command channel capacity.
    #[must_use]
    pub const fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_is_sane() {
        assert_eq!(BridgeConfig::default().command_buffer, 16);
    }

    #[test]
    fn builder_overrides() {
        let config = BridgeConfig::new().with_command_buffer(4);
        assert_eq!(config.command_buffer, 4);
    }
}
