//! Per-registry configuration.

use std::time::Duration;

/// Settings for a [`Registry`](crate::Registry).
///
/// There is no environment or file layer: registries are configured in code at
/// construction time.
///
/// ```rust
/// use process_singleton::{Registry, RegistryConfig};
/// use std::time::Duration;
///
/// let registry = Registry::with_config(
///     RegistryConfig::default()
///         .with_name("services")
///         .with_wait_timeout(Duration::from_secs(5)),
/// );
/// assert_eq!(registry.config().name, "services");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Label attached to log records emitted by the registry.
    pub name: &'static str,
    /// Upper bound on how long a caller blocks on another thread's in-flight
    /// construction. `None` waits until that construction finishes or fails.
    pub wait_timeout: Option<Duration>,
}

impl RegistryConfig {
    pub const fn new() -> Self {
        Self {
            name: "default",
            wait_timeout: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
