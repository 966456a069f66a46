//! Query orchestration
//!
//! [`SearchEngine`] is the entry point callers construct with their injected
//! collaborators. Routing is a hard branch: non-whitespace free text takes
//! the text path (index match, then store intersection), anything else takes
//! the filter path (predicate pushed down to the store). Enrichment and
//! analytics run after the primary result is assembled and can never fail
//! the query.

use std::collections::HashMap;
use std::sync::Arc;

use crate::analytics::{AnalyticsReporter, AnalyticsSink};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::enrich::ResultEnricher;
use crate::errors::{EngineError, EngineResult};
use crate::index::{IndexBuilder, IndexCache};
use crate::store::{ContentStore, StorePredicate};
use crate::suggest::{Suggestion, SuggestionResolver};
use crate::types::{
    ContentRecord, ContentStatus, Filters, Highlight, Query, SearchResult, SortKey, Visibility,
};

use super::filter;
use super::resolver::{self, TextResolver};
use super::results;

/// The hybrid search resolution engine
///
/// One instance serves concurrent queries; the index cache is the only
/// shared mutable state, and it swaps whole indexes atomically.
pub struct SearchEngine {
    store: Arc<dyn ContentStore>,
    cache: IndexCache,
    resolver: TextResolver,
    enricher: ResultEnricher,
    suggestions: SuggestionResolver,
    reporter: AnalyticsReporter,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl SearchEngine {
    /// Construct an engine from its injected collaborators
    pub fn new(
        store: Arc<dyn ContentStore>,
        sink: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let builder = IndexBuilder::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.index_scan_batch(),
        );
        let cache = IndexCache::new(builder, Arc::clone(&clock), config.refresh_interval());
        let resolver = TextResolver::new(config.fuzzy_threshold(), config.highlight_window());
        let enricher = ResultEnricher::new(Arc::clone(&store));
        let suggestions = SuggestionResolver::new(Arc::clone(&store));
        let reporter = AnalyticsReporter::new(sink);
        Self {
            store,
            cache,
            resolver,
            enricher,
            suggestions,
            reporter,
            clock,
            config,
        }
    }

    /// Resolve one query into a paginated, optionally personalized result
    ///
    /// Under a configured deadline the whole resolution races
    /// `tokio::time::timeout`; expiry aborts in-flight store calls and
    /// surfaces [`EngineError::Timeout`].
    pub async fn search(&self, query: &Query) -> EngineResult<SearchResult> {
        match self.config.query_timeout() {
            Some(deadline) => tokio::time::timeout(deadline, self.resolve(query))
                .await
                .map_err(|_| EngineError::Timeout(deadline))?,
            None => self.resolve(query).await,
        }
    }

    /// Typeahead suggestions for a prefix; `limit == 0` uses the configured
    /// default
    pub async fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let limit = if limit == 0 {
            self.config.suggestion_limit()
        } else {
            limit
        };
        self.suggestions.suggest(prefix, limit).await
    }

    async fn resolve(&self, query: &Query) -> EngineResult<SearchResult> {
        let started = self.clock.now();
        let page = query.page.max(1);
        let page_size = if query.page_size == 0 {
            self.config.default_page_size()
        } else {
            query.page_size.clamp(1, self.config.max_page_size())
        };
        let text = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut result = match text {
            Some(text) => self.resolve_text(query, text, page, page_size).await?,
            None => self.resolve_filters(query, page, page_size).await?,
        };

        result.items = self
            .enricher
            .enrich(result.items, query.user_id.as_deref())
            .await;

        let elapsed_ms = self
            .clock
            .now()
            .signed_duration_since(started)
            .num_milliseconds()
            .max(0) as u64;
        result.elapsed_ms = elapsed_ms;

        tracing::info!(
            text = text.unwrap_or(""),
            page = page,
            page_size = page_size,
            total_count = result.total_count,
            duration_ms = elapsed_ms,
            "search resolved"
        );
        self.reporter
            .report(query.clone(), result.total_count, elapsed_ms);
        Ok(result)
    }

    async fn resolve_text(
        &self,
        query: &Query,
        text: &str,
        page: usize,
        page_size: usize,
    ) -> EngineResult<SearchResult> {
        let index = self.cache.ensure_fresh().await?;
        let effective_fuzzy = query.fuzzy && !query.exact_match;
        let matches = self
            .resolver
            .resolve(&index, text, &query.field_scope, effective_fuzzy);

        if matches.is_empty() {
            // Short-circuit: no candidates means no store round-trip.
            let mut result = results::empty_result(page, page_size);
            result.did_you_mean = resolver::did_you_mean(&index, text);
            result.related_queries = self.related_queries(text).await;
            return Ok(result);
        }

        let ids: Vec<String> = matches.iter().map(|m| m.id.clone()).collect();
        let predicate = scoped_predicate(&query.filters, query.include_archived);
        let records = self
            .store
            .query_by_ids(&ids, &predicate)
            .await
            .map_err(|source| EngineError::Search { source })?;

        let mut match_info: HashMap<String, (usize, f32, Vec<Highlight>)> = matches
            .into_iter()
            .enumerate()
            .map(|(rank, m)| (m.id, (rank, m.score, m.highlights)))
            .collect();

        let mut ranked: Vec<(usize, f32, Vec<Highlight>, ContentRecord)> = records
            .into_iter()
            .filter_map(|record| {
                match_info
                    .remove(record.id.as_str())
                    .map(|(rank, score, highlights)| (rank, score, highlights, record))
            })
            .collect();

        match query.sort {
            // Candidates are already in score-ascending order; rank keys it.
            SortKey::Relevance => ranked.sort_by_key(|(rank, ..)| *rank),
            sort => ranked.sort_by(|a, b| sort.compare(&a.3, &b.3)),
        }

        let total_count = ranked.len();
        let facets = query
            .include_facets
            .then(|| results::compute_facets(ranked.iter().map(|(_, _, _, record)| record)));

        let offset = (page - 1).saturating_mul(page_size);
        let items = ranked
            .into_iter()
            .skip(offset)
            .take(page_size)
            .map(|(_, score, highlights, record)| {
                let mut item = results::item_from_record(&record);
                item.score = Some(score);
                item.highlights = highlights;
                item
            })
            .collect();

        Ok(SearchResult {
            items,
            total_count,
            total_pages: results::total_pages(total_count, page_size),
            page,
            page_size,
            elapsed_ms: 0,
            facets,
            related_queries: None,
            did_you_mean: None,
        })
    }

    async fn resolve_filters(
        &self,
        query: &Query,
        page: usize,
        page_size: usize,
    ) -> EngineResult<SearchResult> {
        let predicate = scoped_predicate(&query.filters, query.include_archived);
        let offset = (page - 1).saturating_mul(page_size);
        let (records, total_count) = self
            .store
            .query_by_predicate(&predicate, query.sort, offset, page_size)
            .await
            .map_err(|source| EngineError::Search { source })?;

        let items = records.iter().map(results::item_from_record).collect();
        Ok(SearchResult {
            items,
            total_count,
            total_pages: results::total_pages(total_count, page_size),
            page,
            page_size,
            elapsed_ms: 0,
            facets: None,
            related_queries: None,
            did_you_mean: None,
        })
    }

    /// Popular queries sharing the leading token, offered alongside a
    /// did-you-mean correction; best-effort
    async fn related_queries(&self, text: &str) -> Option<Vec<String>> {
        let token = text.split_whitespace().next()?;
        match self
            .store
            .popular_queries(token, self.config.suggestion_limit())
            .await
        {
            Ok(rows) => {
                let related: Vec<String> = rows
                    .into_iter()
                    .map(|q| q.text)
                    .filter(|t| !t.eq_ignore_ascii_case(text))
                    .collect();
                (!related.is_empty()).then_some(related)
            }
            Err(error) => {
                tracing::warn!(error = %error, "related query lookup failed");
                None
            }
        }
    }
}

/// Caller filters plus the engine's status/visibility defaults
///
/// Explicit status filters win; otherwise only published (and optionally
/// archived) content is visible. Visibility is never caller-controlled.
fn scoped_predicate(filters: &Filters, include_archived: bool) -> StorePredicate {
    let mut predicate = filter::compile(filters);
    if predicate.statuses.is_empty() {
        predicate.statuses = if include_archived {
            vec![ContentStatus::Published, ContentStatus::Archived]
        } else {
            vec![ContentStatus::Published]
        };
    }
    predicate.visibilities = vec![Visibility::Public];
    predicate
}
