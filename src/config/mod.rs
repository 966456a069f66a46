//! Engine configuration
//!
//! This module provides the [`EngineConfig`] struct and its builder for
//! tuning query resolution with validation and sensible defaults.

pub mod builder;

pub use builder::EngineConfigBuilder;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default staleness budget for the in-memory index
pub(crate) const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
/// Default page size when a query passes 0
pub(crate) const DEFAULT_PAGE_SIZE: usize = 20;
/// Hard upper bound on page size
pub(crate) const MAX_PAGE_SIZE: usize = 100;
/// Records fetched per store round-trip during an index scan
pub(crate) const DEFAULT_INDEX_SCAN_BATCH: usize = 500;
/// Per-field score ceiling for a fuzzy match to count
pub(crate) const DEFAULT_FUZZY_THRESHOLD: f32 = 0.45;
/// Highlight fragment width in characters
pub(crate) const DEFAULT_HIGHLIGHT_WINDOW: usize = 90;
/// Default cap on merged suggestions
pub(crate) const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Tunables for the search engine
///
/// Construct with [`EngineConfig::builder`]; `EngineConfig::default()` gives
/// the production defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub(crate) refresh_interval: Duration,
    pub(crate) default_page_size: usize,
    pub(crate) max_page_size: usize,
    pub(crate) index_scan_batch: usize,
    pub(crate) query_timeout: Option<Duration>,
    pub(crate) fuzzy_threshold: f32,
    pub(crate) highlight_window: usize,
    pub(crate) suggestion_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfigBuilder::new().build()
    }
}

impl EngineConfig {
    /// Start building a configuration
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Maximum index age before a rebuild is forced
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Page size applied when a query passes 0
    #[must_use]
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// Upper bound applied to requested page sizes
    #[must_use]
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Records fetched per store round-trip during an index scan
    #[must_use]
    pub fn index_scan_batch(&self) -> usize {
        self.index_scan_batch
    }

    /// Optional deadline for one query resolution
    #[must_use]
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout
    }

    /// Per-field score ceiling for a fuzzy match to count
    #[must_use]
    pub fn fuzzy_threshold(&self) -> f32 {
        self.fuzzy_threshold
    }

    /// Highlight fragment width in characters
    #[must_use]
    pub fn highlight_window(&self) -> usize {
        self.highlight_window
    }

    /// Cap on merged suggestions returned by the suggestion resolver
    #[must_use]
    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }
}
