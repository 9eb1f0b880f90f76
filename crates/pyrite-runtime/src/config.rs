//! Runtime limits.

/// Default maximum call depth.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Settings both backends honour.
///
/// # Examples
///
/// ```
/// use pyrite_runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::default().with_max_call_depth(64);
/// assert_eq!(config.max_call_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Most calls that may be active at once. A call beyond this fails
    /// with `RecursionLimit`.
    pub max_call_depth: usize,
}

impl RuntimeConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Sets the maximum call depth.
    #[must_use]
    pub const fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}
