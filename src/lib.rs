//! Hybrid search resolution engine for a persisted content catalog
//!
//! This crate answers content queries by combining an in-memory fuzzy text
//! index with structured filter/sort evaluation against an external content
//! store, then merges, paginates, and personalizes the results. The engine is
//! library-shaped: it owns no transport, CLI, or UI and is invoked in-process
//! by a calling service through [`SearchEngine`].
//!
//! The content store, analytics sink, and clock are narrow collaborator
//! traits injected at construction time, which keeps index lifetime and test
//! isolation explicit.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod enrich;
pub mod errors;
pub mod index;
pub mod query;
pub mod store;
pub mod suggest;
pub mod types;

pub use analytics::{AnalyticsReporter, AnalyticsSink, SinkError, TimeWindow};
pub use clock::{Clock, SystemClock};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use enrich::ResultEnricher;
pub use errors::{EngineError, EngineResult, StoreError};
pub use index::{IndexBuilder, IndexCache, SearchDocument, SearchIndex};
pub use query::{SearchEngine, TextMatch, TextResolver};
pub use store::{
    AuthorSummary, ContentStore, InteractionKind, InteractionRow, PopularQuery, ProgressRow,
    StorePredicate,
};
pub use suggest::{Suggestion, SuggestionKind, SuggestionResolver};
pub use types::{
    ContentRecord, ContentStatus, ContentType, FacetCount, Facets, Filters, Highlight, Level,
    Query, ResultItem, SearchField, SearchResult, SortKey, Visibility,
};
