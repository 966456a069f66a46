//! Result envelope assembly
//!
//! Record-to-item projection, pagination math, and facet counting shared by
//! both resolution paths.

use std::collections::BTreeMap;

use crate::types::{ContentRecord, FacetCount, Facets, ResultItem, SearchResult};

/// `ceil(total_count / page_size)`, 0 when nothing matched
#[must_use]
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if total_count == 0 {
        0
    } else {
        total_count.div_ceil(page_size.max(1))
    }
}

/// An empty envelope for queries that matched nothing
#[must_use]
pub fn empty_result(page: usize, page_size: usize) -> SearchResult {
    SearchResult {
        items: Vec::new(),
        total_count: 0,
        total_pages: 0,
        page,
        page_size,
        elapsed_ms: 0,
        facets: None,
        related_queries: None,
        did_you_mean: None,
    }
}

/// Project a catalog record into a display item
///
/// Score, highlights, author extras, and user context start absent; the text
/// path and the enricher fill in what applies.
#[must_use]
pub fn item_from_record(record: &ContentRecord) -> ResultItem {
    ResultItem {
        id: record.id.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        content_type: record.content_type,
        category: record.category.clone(),
        level: record.level,
        language: record.language.clone(),
        tags: record.tags.clone(),
        topics: record.topics.clone(),
        author_id: record.author_id.clone(),
        author_name: record.author_name.clone(),
        author_avatar: None,
        author_verified: None,
        location: record.location.clone(),
        published_at: record.published_at,
        updated_at: record.updated_at,
        view_count: record.view_count,
        like_count: record.like_count,
        average_rating: record.average_rating,
        quality_score: record.quality_score,
        verified: record.verified,
        has_video: record.has_video,
        has_audio: record.has_audio,
        has_attachments: record.has_attachments,
        score: None,
        highlights: Vec::new(),
        is_bookmarked: None,
        is_liked: None,
        progress: None,
        is_completed: None,
    }
}

/// Count facet buckets over the filtered candidate set
///
/// Buckets are ordered by count descending, then value ascending, so the
/// output is deterministic.
#[must_use]
pub fn compute_facets<'a, I>(records: I) -> Facets
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let mut content_types: BTreeMap<&str, usize> = BTreeMap::new();
    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    let mut levels: BTreeMap<&str, usize> = BTreeMap::new();
    let mut languages: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        *content_types.entry(record.content_type.as_str()).or_default() += 1;
        *categories.entry(record.category.as_str()).or_default() += 1;
        *levels.entry(record.level.as_str()).or_default() += 1;
        *languages.entry(record.language.as_str()).or_default() += 1;
    }

    Facets {
        content_types: into_buckets(content_types),
        categories: into_buckets(categories),
        levels: into_buckets(levels),
        languages: into_buckets(languages),
    }
}

fn into_buckets(counts: BTreeMap<&str, usize>) -> Vec<FacetCount> {
    let mut buckets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    buckets
}
