//! Layout persistence configuration

use std::time::Duration;

/// Key the current layout is saved under.
pub const COLUMN_STATE_KEY: &str = "columnState";

/// Key the reset layout is read from.
pub const RESET_COLUMN_STATE_KEY: &str = "resetColumnState";

/// Configuration for layout persistence.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridsource_lib::layout::LayoutConfig;
///
/// let config = LayoutConfig::default()
///     .with_state_key("athletes.columnState")
///     .with_debounce(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Key the current layout is written to and restored from.
    ///
    /// Default: `columnState`
    pub state_key: String,

    /// Key the reset layout is read from. Separate from `state_key`.
    ///
    /// Default: `resetColumnState`
    pub reset_key: String,

    /// Quiet period after the last layout event before the layout is saved.
    ///
    /// Default: 300 milliseconds
    pub debounce: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            state_key: COLUMN_STATE_KEY.to_string(),
            reset_key: RESET_COLUMN_STATE_KEY.to_string(),
            debounce: Duration::from_millis(300),
        }
    }
}

impl LayoutConfig {
    /// Creates a new layout config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key the current layout is saved under.
    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    /// Sets the key the reset layout is read from.
    pub fn with_reset_key(mut self, key: impl Into<String>) -> Self {
        self.reset_key = key.into();
        self
    }

    /// Sets the save debounce period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
