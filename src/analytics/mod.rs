//! Fire-and-forget query analytics
//!
//! The reporter records query outcomes and popular-query counters through
//! the injected sink on a detached task. It is never on the query's
//! critical path: the response returns without awaiting the report, and
//! sink failures are logged, never re-thrown.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Query;

/// Rolling aggregation windows for popular-query counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    /// Every window a query increments
    #[must_use]
    pub fn all() -> [TimeWindow; 5] {
        [
            TimeWindow::Hour,
            TimeWindow::Day,
            TimeWindow::Week,
            TimeWindow::Month,
            TimeWindow::Year,
        ]
    }

    /// Stable lowercase label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
        }
    }
}

/// Error reported by an [`AnalyticsSink`]; always swallowed by the reporter
#[derive(Debug, Error)]
#[error("analytics sink failed: {0}")]
pub struct SinkError(pub String);

/// External analytics collaborator; both methods are best-effort
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Record one resolved query's outcome
    async fn record_query(
        &self,
        query: &Query,
        result_count: usize,
        elapsed_ms: u64,
        user_id: Option<&str>,
    ) -> Result<(), SinkError>;

    /// Increment the popular-query counter for one window
    async fn increment_popular_query(&self, text: &str, window: TimeWindow)
    -> Result<(), SinkError>;
}

/// Dispatches reports to the sink on a detached task
pub struct AnalyticsReporter {
    sink: Arc<dyn AnalyticsSink>,
}

impl AnalyticsReporter {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    /// Report a successful resolution; returns immediately
    ///
    /// Popular-query counters are incremented for every window, but only
    /// when the query carried text; filter-only queries have nothing to
    /// count.
    pub fn report(&self, query: Query, result_count: usize, elapsed_ms: u64) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let user_id = query.user_id.clone();
            if let Err(error) = sink
                .record_query(&query, result_count, elapsed_ms, user_id.as_deref())
                .await
            {
                tracing::warn!(error = %error, "query analytics report failed");
            }

            let text = query
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase);
            if let Some(text) = text {
                for window in TimeWindow::all() {
                    if let Err(error) = sink.increment_popular_query(&text, window).await {
                        tracing::warn!(
                            window = window.as_str(),
                            error = %error,
                            "popular query counter failed"
                        );
                    }
                }
            }
        });
    }
}
