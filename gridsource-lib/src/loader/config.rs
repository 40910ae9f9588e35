//! Loader configuration

use std::time::Duration;

/// Sample dataset of Olympic medal winners.
pub const OLYMPIC_WINNERS_URL: &str = "https://www.ag-grid.com/example-assets/olympic-winners.json";

/// Configuration for a [`DatasetLoader`](super::DatasetLoader).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridsource_lib::loader::LoaderConfig;
///
/// let config = LoaderConfig::default().with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Request timeout for remote sources. `None` waits indefinitely.
    ///
    /// Default: 30 seconds
    pub timeout: Option<Duration>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl LoaderConfig {
    /// Creates a new loader config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables the request timeout.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}
