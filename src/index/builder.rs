//! Index construction from a store snapshot

use std::sync::Arc;

use crate::clock::Clock;
use crate::errors::StoreError;
use crate::store::{ContentStore, StorePredicate};
use crate::types::{ContentStatus, SortKey, Visibility};

use super::{SearchDocument, SearchIndex};

/// Builds a fresh [`SearchIndex`] by scanning the store in fixed batches
///
/// Only published, public content is eligible. The scan order is fixed
/// (newest first), so the build is deterministic for a given store snapshot.
pub struct IndexBuilder {
    store: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    scan_batch: usize,
}

impl IndexBuilder {
    pub fn new(store: Arc<dyn ContentStore>, clock: Arc<dyn Clock>, scan_batch: usize) -> Self {
        Self {
            store,
            clock,
            scan_batch: scan_batch.max(1),
        }
    }

    /// The fixed eligibility predicate for indexable content
    #[must_use]
    pub fn eligibility_predicate() -> StorePredicate {
        StorePredicate {
            statuses: vec![ContentStatus::Published],
            visibilities: vec![Visibility::Public],
            ..StorePredicate::default()
        }
    }

    /// Scan the store and construct a new index
    ///
    /// Any store error aborts the build; nothing is installed on failure.
    pub async fn build(&self) -> Result<SearchIndex, StoreError> {
        let predicate = Self::eligibility_predicate();
        let mut documents = Vec::new();
        let mut offset = 0usize;

        loop {
            let (records, total) = self
                .store
                .query_by_predicate(&predicate, SortKey::Newest, offset, self.scan_batch)
                .await?;
            let fetched = records.len();
            documents.extend(records.iter().map(SearchDocument::from_record));
            offset += fetched;
            if fetched == 0 || offset >= total {
                break;
            }
        }

        tracing::debug!(documents = documents.len(), "search index built");
        Ok(SearchIndex::new(documents, self.clock.now()))
    }
}
