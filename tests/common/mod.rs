//! Test utilities and fixtures for the catalog-search test suite
//!
//! An in-memory content store, a manually driven clock, and a recording
//! analytics sink. The store evaluates predicates with
//! `StorePredicate::matches` and sorts with `SortKey::compare`, i.e. the
//! same semantics a conforming production store must implement.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use catalog_search::{
    AnalyticsSink, AuthorSummary, Clock, ContentRecord, ContentStatus, ContentStore, ContentType,
    EngineConfig, InteractionKind, InteractionRow, Level, PopularQuery, ProgressRow, Query,
    SearchEngine, SinkError, SortKey, StoreError, StorePredicate, TimeWindow, Visibility,
};

/// Base timestamp all fixtures are offset from
#[allow(dead_code)]
pub const BASE_TS: i64 = 1_700_000_000;

/// A published, public article with neutral defaults; tests override fields
/// with struct-update syntax
#[allow(dead_code)]
pub fn record(id: &str, title: &str) -> ContentRecord {
    let ts = Utc.timestamp_opt(BASE_TS, 0).unwrap();
    ContentRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        body: String::new(),
        content_type: ContentType::Article,
        category: "general".to_string(),
        level: Level::Beginner,
        language: "en".to_string(),
        status: ContentStatus::Published,
        visibility: Visibility::Public,
        tags: Vec::new(),
        keywords: Vec::new(),
        topics: Vec::new(),
        author_id: "author-1".to_string(),
        author_name: "Avery Lane".to_string(),
        location: None,
        published_at: ts,
        updated_at: ts,
        view_count: 0,
        like_count: 0,
        average_rating: 0.0,
        quality_score: 0.5,
        verified: false,
        has_video: false,
        has_audio: false,
        has_attachments: false,
        app_id: None,
        organization_id: None,
    }
}

/// Timestamp `seconds` after the fixture base
#[allow(dead_code)]
pub fn ts(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(BASE_TS + seconds, 0).unwrap()
}

/// In-memory content store with injectable failures and call counters
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ContentRecord>>,
    interactions: Mutex<Vec<(String, InteractionRow)>>,
    progress: Mutex<Vec<(String, ProgressRow)>>,
    authors: Mutex<Vec<AuthorSummary>>,
    popular: Mutex<Vec<PopularQuery>>,
    pub predicate_queries: AtomicUsize,
    pub id_queries: AtomicUsize,
    fail_scans: AtomicBool,
    fail_id_queries: AtomicBool,
    fail_interactions: AtomicBool,
    fail_popular: AtomicBool,
    hang_scans: AtomicBool,
    scan_delay: Mutex<Option<Duration>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn add_interaction(&self, user_id: &str, item_id: &str, kind: InteractionKind) {
        self.interactions.lock().push((
            user_id.to_string(),
            InteractionRow {
                item_id: item_id.to_string(),
                kind,
            },
        ));
    }

    pub fn add_progress(&self, user_id: &str, item_id: &str, percent: f32, completed: bool) {
        self.progress.lock().push((
            user_id.to_string(),
            ProgressRow {
                item_id: item_id.to_string(),
                percent,
                completed,
            },
        ));
    }

    pub fn add_author(&self, id: &str, name: &str, avatar: Option<&str>, verified: bool) {
        self.authors.lock().push(AuthorSummary {
            id: id.to_string(),
            name: name.to_string(),
            avatar: avatar.map(str::to_string),
            verified,
        });
    }

    pub fn add_popular_query(&self, text: &str, count: u64) {
        self.popular.lock().push(PopularQuery {
            text: text.to_string(),
            count,
        });
    }

    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    pub fn fail_id_queries(&self, fail: bool) {
        self.fail_id_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_interactions(&self, fail: bool) {
        self.fail_interactions.store(fail, Ordering::SeqCst);
    }

    pub fn fail_popular(&self, fail: bool) {
        self.fail_popular.store(fail, Ordering::SeqCst);
    }

    pub fn hang_scans(&self, hang: bool) {
        self.hang_scans.store(hang, Ordering::SeqCst);
    }

    pub fn set_scan_delay(&self, delay: Option<Duration>) {
        *self.scan_delay.lock() = delay;
    }

    pub fn scan_count(&self) -> usize {
        self.predicate_queries.load(Ordering::SeqCst)
    }

    pub fn id_query_count(&self) -> usize {
        self.id_queries.load(Ordering::SeqCst)
    }

    async fn scan_gate(&self) -> Result<(), StoreError> {
        if self.hang_scans.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        let delay = *self.scan_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected scan failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn query_by_predicate(
        &self,
        predicate: &StorePredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<ContentRecord>, usize), StoreError> {
        self.predicate_queries.fetch_add(1, Ordering::SeqCst);
        self.scan_gate().await?;

        let mut matched: Vec<ContentRecord> = self
            .records
            .lock()
            .iter()
            .filter(|r| predicate.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| sort.compare(a, b));
        let total = matched.len();
        let page = matched.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }

    async fn query_by_ids(
        &self,
        ids: &[String],
        predicate: &StorePredicate,
    ) -> Result<Vec<ContentRecord>, StoreError> {
        self.id_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_id_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected id-query failure".into()));
        }

        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| ids.contains(&r.id) && predicate.matches(r))
            .cloned()
            .collect())
    }

    async fn user_interactions(
        &self,
        user_id: &str,
        item_ids: &[String],
    ) -> Result<Vec<InteractionRow>, StoreError> {
        if self.fail_interactions.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected interaction failure".into()));
        }
        Ok(self
            .interactions
            .lock()
            .iter()
            .filter(|(user, row)| user == user_id && item_ids.contains(&row.item_id))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn user_progress(
        &self,
        user_id: &str,
        item_ids: &[String],
    ) -> Result<Vec<ProgressRow>, StoreError> {
        Ok(self
            .progress
            .lock()
            .iter()
            .filter(|(user, row)| user == user_id && item_ids.contains(&row.item_id))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn author_summaries(
        &self,
        author_ids: &[String],
    ) -> Result<Vec<AuthorSummary>, StoreError> {
        Ok(self
            .authors
            .lock()
            .iter()
            .filter(|author| author_ids.contains(&author.id))
            .cloned()
            .collect())
    }

    async fn popular_queries(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<PopularQuery>, StoreError> {
        if self.fail_popular.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected popular-query failure".into()));
        }
        let needle = prefix.to_lowercase();
        let mut matched: Vec<PopularQuery> = self
            .popular
            .lock()
            .iter()
            .filter(|q| q.text.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn matching_tags(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        Ok(matching_strings(
            self.records.lock().iter().flat_map(|r| r.tags.clone()),
            prefix,
            limit,
        ))
    }

    async fn matching_topics(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Ok(matching_strings(
            self.records.lock().iter().flat_map(|r| r.topics.clone()),
            prefix,
            limit,
        ))
    }

    async fn matching_authors(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Ok(matching_strings(
            self.records.lock().iter().map(|r| r.author_name.clone()),
            prefix,
            limit,
        ))
    }
}

fn matching_strings(
    candidates: impl Iterator<Item = String>,
    prefix: &str,
    limit: usize,
) -> Vec<String> {
    let needle = prefix.to_lowercase();
    let mut matched: Vec<String> = candidates
        .filter(|c| c.to_lowercase().contains(&needle))
        .collect();
    matched.sort();
    matched.dedup();
    matched.truncate(limit);
    matched
}

/// Manually driven clock for deterministic staleness tests
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_opt(BASE_TS, 0).unwrap()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock();
        *now = *now + chrono::Duration::from_std(duration).expect("advance duration fits");
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Analytics sink that records everything it is handed
#[derive(Default)]
pub struct RecordingSink {
    queries: Mutex<Vec<(Option<String>, usize, u64, Option<String>)>>,
    counters: Mutex<Vec<(String, TimeWindow)>>,
    fail: AtomicBool,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn recorded_queries(&self) -> Vec<(Option<String>, usize, u64, Option<String>)> {
        self.queries.lock().clone()
    }

    pub fn recorded_counters(&self) -> Vec<(String, TimeWindow)> {
        self.counters.lock().clone()
    }
}

#[async_trait]
impl AnalyticsSink for RecordingSink {
    async fn record_query(
        &self,
        query: &Query,
        result_count: usize,
        elapsed_ms: u64,
        user_id: Option<&str>,
    ) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError("injected sink failure".into()));
        }
        self.queries.lock().push((
            query.text.clone(),
            result_count,
            elapsed_ms,
            user_id.map(str::to_string),
        ));
        Ok(())
    }

    async fn increment_popular_query(
        &self,
        text: &str,
        window: TimeWindow,
    ) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError("injected sink failure".into()));
        }
        self.counters.lock().push((text.to_string(), window));
        Ok(())
    }
}

/// Engine wired to the in-memory fixtures
#[allow(dead_code)]
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
    pub engine: SearchEngine,
}

/// Build an engine over `records` with default configuration
#[allow(dead_code)]
pub fn harness(records: Vec<ContentRecord>) -> Harness {
    harness_with_config(records, EngineConfig::default())
}

/// Build an engine over `records` with a custom configuration
#[allow(dead_code)]
pub fn harness_with_config(records: Vec<ContentRecord>, config: EngineConfig) -> Harness {
    let store = Arc::new(MemoryStore::new(records));
    let clock = Arc::new(ManualClock::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = SearchEngine::new(
        Arc::clone(&store) as Arc<dyn ContentStore>,
        Arc::clone(&sink) as Arc<dyn AnalyticsSink>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        config,
    );
    Harness {
        store,
        clock,
        sink,
        engine,
    }
}

/// Wait until the detached analytics task has flushed, bounded by a timeout
#[allow(dead_code)]
pub async fn flush_analytics(sink: &RecordingSink) {
    for _ in 0..50 {
        if !sink.recorded_queries().is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
