//! Staleness-gated index cache with single-flight rebuild
//!
//! The cache holds the one object shared across concurrent query
//! resolutions. Reads go through a `parking_lot::RwLock` and return the
//! previously installed `Arc` even while a rebuild is in flight; the rebuild
//! itself serializes behind an async mutex so an expired cache under load
//! triggers exactly one store scan.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::errors::{EngineError, EngineResult};

use super::{IndexBuilder, SearchIndex};

/// Owner of the current [`SearchIndex`]
pub struct IndexCache {
    builder: IndexBuilder,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    current: RwLock<Option<Arc<SearchIndex>>>,
    rebuild: Mutex<()>,
}

impl IndexCache {
    pub fn new(builder: IndexBuilder, clock: Arc<dyn Clock>, refresh_interval: Duration) -> Self {
        Self {
            builder,
            clock,
            refresh_interval,
            current: RwLock::new(None),
            rebuild: Mutex::new(()),
        }
    }

    /// Return a fresh index, rebuilding if the staleness budget is exceeded
    ///
    /// Rebuild failure keeps the previous index: the stale index is served
    /// with a logged warning, and the error surfaces only when no usable
    /// index exists at all (cold start).
    pub async fn ensure_fresh(&self) -> EngineResult<Arc<SearchIndex>> {
        if let Some(index) = self.fresh_index() {
            return Ok(index);
        }

        let _guard = self.rebuild.lock().await;
        // Another caller may have completed the rebuild while we waited.
        if let Some(index) = self.fresh_index() {
            return Ok(index);
        }

        match self.builder.build().await {
            Ok(index) => {
                let index = Arc::new(index);
                *self.current.write() = Some(Arc::clone(&index));
                tracing::info!(documents = index.len(), "search index installed");
                Ok(index)
            }
            Err(source) => {
                let stale = self.current.read().clone();
                match stale {
                    Some(index) => {
                        tracing::warn!(
                            error = %source,
                            built_at = %index.built_at(),
                            "index rebuild failed, serving stale index"
                        );
                        Ok(index)
                    }
                    None => Err(EngineError::IndexBuild { source }),
                }
            }
        }
    }

    /// The installed index when it is within the staleness budget
    fn fresh_index(&self) -> Option<Arc<SearchIndex>> {
        let guard = self.current.read();
        let index = guard.as_ref()?;
        let age = self
            .clock
            .now()
            .signed_duration_since(index.built_at())
            .to_std()
            // A clock running behind the build stamp counts as fresh.
            .unwrap_or(Duration::ZERO);
        (age < self.refresh_interval).then(|| Arc::clone(index))
    }
}
