//! Datasource configuration

use std::time::Duration;

/// Configuration for a [`Datasource`](super::Datasource).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridsource_lib::DatasourceConfig;
///
/// let config = DatasourceConfig::default().with_latency(Duration::from_millis(50));
/// let instant = DatasourceConfig::no_latency();
/// ```
#[derive(Debug, Clone)]
pub struct DatasourceConfig {
    /// Delay before a row request completes, simulating a server round trip.
    ///
    /// Default: 200 milliseconds
    pub latency: Duration,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(200),
        }
    }
}

impl DatasourceConfig {
    /// Creates a new datasource config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Creates a config that completes requests without delay.
    pub fn no_latency() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}
