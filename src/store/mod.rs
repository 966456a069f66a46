//! Content store collaborator contract
//!
//! The engine reads the catalog, per-user state, and suggestion sources
//! through this narrow trait. The store's internal implementation is out of
//! scope; anything that can answer these queries (SQL, document store, an
//! in-memory fake in tests) can back the engine.

pub mod predicate;

pub use predicate::StorePredicate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::types::{ContentRecord, SortKey};

/// Kind of a recorded user interaction with a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Bookmark,
    Like,
}

/// One user-interaction row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRow {
    pub item_id: String,
    pub kind: InteractionKind,
}

/// One user-progress row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub item_id: String,
    /// Completion percentage in `0.0..=100.0`
    pub percent: f32,
    pub completed: bool,
}

/// Display summary for one author
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub verified: bool,
}

/// One historical popular query with its aggregate count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularQuery {
    pub text: String,
    pub count: u64,
}

/// Read-only query contract against the persisted content store
///
/// All methods are suspension points; everything else in the engine is pure
/// CPU-bound computation. Implementations must evaluate predicates with the
/// semantics of [`StorePredicate::matches`] and sort with
/// [`SortKey::compare`] so that page boundaries agree with the in-memory
/// text path.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch one page of records matching `predicate` under `sort`, plus the
    /// exact total match count
    async fn query_by_predicate(
        &self,
        predicate: &StorePredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<ContentRecord>, usize), StoreError>;

    /// Fetch the records for exactly `ids`, intersected with `predicate`;
    /// ids with no matching record are silently absent from the result
    async fn query_by_ids(
        &self,
        ids: &[String],
        predicate: &StorePredicate,
    ) -> Result<Vec<ContentRecord>, StoreError>;

    /// Interaction rows of one user restricted to `item_ids`
    async fn user_interactions(
        &self,
        user_id: &str,
        item_ids: &[String],
    ) -> Result<Vec<InteractionRow>, StoreError>;

    /// Progress rows of one user restricted to `item_ids`
    async fn user_progress(
        &self,
        user_id: &str,
        item_ids: &[String],
    ) -> Result<Vec<ProgressRow>, StoreError>;

    /// Display summaries for the given author ids
    async fn author_summaries(
        &self,
        author_ids: &[String],
    ) -> Result<Vec<AuthorSummary>, StoreError>;

    /// Historical popular queries containing `prefix`
    async fn popular_queries(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<PopularQuery>, StoreError>;

    /// Distinct tags containing `prefix`
    async fn matching_tags(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Distinct topics containing `prefix`
    async fn matching_topics(&self, prefix: &str, limit: usize)
    -> Result<Vec<String>, StoreError>;

    /// Author display names containing `prefix`
    async fn matching_authors(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, StoreError>;
}
