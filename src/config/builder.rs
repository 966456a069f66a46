//! Fluent builder for [`EngineConfig`]
//!
//! Every field has a production default, so `build()` is infallible; out of
//! range values are clamped rather than rejected.

use std::time::Duration;

use super::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_HIGHLIGHT_WINDOW, DEFAULT_INDEX_SCAN_BATCH,
    DEFAULT_PAGE_SIZE, DEFAULT_REFRESH_INTERVAL, DEFAULT_SUGGESTION_LIMIT, EngineConfig,
    MAX_PAGE_SIZE,
};

/// Builder for [`EngineConfig`]
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    refresh_interval: Duration,
    default_page_size: usize,
    max_page_size: usize,
    index_scan_batch: usize,
    query_timeout: Option<Duration>,
    fuzzy_threshold: f32,
    highlight_window: usize,
    suggestion_limit: usize,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    /// Create a builder preloaded with production defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            index_scan_batch: DEFAULT_INDEX_SCAN_BATCH,
            query_timeout: None,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            highlight_window: DEFAULT_HIGHLIGHT_WINDOW,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    /// Maximum index age before a rebuild is forced
    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Page size applied when a query passes 0
    #[must_use]
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Upper bound applied to requested page sizes
    #[must_use]
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Records fetched per store round-trip during an index scan
    #[must_use]
    pub fn index_scan_batch(mut self, batch: usize) -> Self {
        self.index_scan_batch = batch;
        self
    }

    /// Deadline for one query resolution; `None` disables the deadline
    #[must_use]
    pub fn query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Per-field score ceiling for a fuzzy match to count
    #[must_use]
    pub fn fuzzy_threshold(mut self, threshold: f32) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Highlight fragment width in characters
    #[must_use]
    pub fn highlight_window(mut self, window: usize) -> Self {
        self.highlight_window = window;
        self
    }

    /// Cap on merged suggestions
    #[must_use]
    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Finalize the configuration, clamping out-of-range values
    #[must_use]
    pub fn build(self) -> EngineConfig {
        let max_page_size = self.max_page_size.max(1);
        EngineConfig {
            refresh_interval: self.refresh_interval,
            default_page_size: self.default_page_size.clamp(1, max_page_size),
            max_page_size,
            index_scan_batch: self.index_scan_batch.max(1),
            query_timeout: self.query_timeout,
            fuzzy_threshold: self.fuzzy_threshold.clamp(0.0, 1.0),
            highlight_window: self.highlight_window.max(16),
            suggestion_limit: self.suggestion_limit.max(1),
        }
    }
}
