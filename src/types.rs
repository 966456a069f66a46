//! Core data model shared across the engine
//!
//! Catalog records, the query object, and the result envelope. Content
//! classification uses tagged enums with exhaustive handling in the filter
//! compiler rather than dynamically typed records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Course,
    Video,
    Podcast,
    Guide,
}

impl ContentType {
    /// Stable lowercase label used for facet buckets
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Course => "course",
            ContentType::Video => "video",
            ContentType::Podcast => "podcast",
            ContentType::Guide => "guide",
        }
    }
}

/// Difficulty level of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// Stable lowercase label used for facet buckets
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

/// Publication status of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

/// Audience visibility of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

/// Textual fields participating in fuzzy matching
///
/// The weights form the fixed table the index is built over; they sum to 1.0
/// across [`SearchField::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Description,
    Body,
    Tags,
    Keywords,
    Topics,
}

impl SearchField {
    /// All weighted fields in table order
    #[must_use]
    pub fn all() -> [SearchField; 6] {
        [
            SearchField::Title,
            SearchField::Description,
            SearchField::Body,
            SearchField::Tags,
            SearchField::Keywords,
            SearchField::Topics,
        ]
    }

    /// Relevance weight of this field
    #[must_use]
    pub fn weight(&self) -> f32 {
        match self {
            SearchField::Title => 0.30,
            SearchField::Description => 0.20,
            SearchField::Body => 0.15,
            SearchField::Tags => 0.15,
            SearchField::Keywords => 0.10,
            SearchField::Topics => 0.10,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SearchField::Title => 0,
            SearchField::Description => 1,
            SearchField::Body => 2,
            SearchField::Tags => 3,
            SearchField::Keywords => 4,
            SearchField::Topics => 5,
        }
    }
}

/// One catalog item as persisted by the content store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub content_type: ContentType,
    pub category: String,
    pub level: Level,
    pub language: String,
    pub status: ContentStatus,
    pub visibility: Visibility,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub topics: Vec<String>,
    pub author_id: String,
    pub author_name: String,
    pub location: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub average_rating: f32,
    pub quality_score: f32,
    pub verified: bool,
    pub has_video: bool,
    pub has_audio: bool,
    pub has_attachments: bool,
    pub app_id: Option<String>,
    pub organization_id: Option<String>,
}

/// Requested result ordering
///
/// One comparator is shared by the in-memory text path and any conforming
/// store implementation so that page boundaries agree across both paths.
/// Every key carries a final ascending-id tie-break, which makes the order
/// total and repeatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Fuzzy-match score ascending; the default for text queries. On the
    /// filter path (no score exists) this orders like [`SortKey::Newest`].
    #[default]
    Relevance,
    Newest,
    Oldest,
    Popular,
    TopRated,
    MostLiked,
    RecentlyUpdated,
}

impl SortKey {
    /// Compare two records under this key
    ///
    /// Relevance has no meaning on bare records and falls back to Newest;
    /// the text path orders relevance-sorted candidates before records are
    /// ever compared with this function.
    #[must_use]
    pub fn compare(&self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        let primary = match self {
            SortKey::Relevance | SortKey::Newest => b.published_at.cmp(&a.published_at),
            SortKey::Oldest => a.published_at.cmp(&b.published_at),
            SortKey::Popular => b.view_count.cmp(&a.view_count),
            SortKey::TopRated => b.average_rating.total_cmp(&a.average_rating),
            SortKey::MostLiked => b.like_count.cmp(&a.like_count),
            SortKey::RecentlyUpdated => b.updated_at.cmp(&a.updated_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Structured filter predicates; each field is independently optional
///
/// Absence means "don't care", never "must be empty". Multiple values within
/// one field are OR'd; distinct fields are AND'd.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub content_types: Vec<ContentType>,
    pub categories: Vec<String>,
    pub levels: Vec<Level>,
    pub languages: Vec<String>,
    pub statuses: Vec<ContentStatus>,
    pub author_ids: Vec<String>,
    pub tags: Vec<String>,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub min_rating: Option<f32>,
    pub verified_only: bool,
    pub min_quality: Option<f32>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
    pub min_views: Option<u64>,
    pub min_likes: Option<u64>,
    pub has_video: Option<bool>,
    pub has_audio: Option<bool>,
    pub has_attachments: Option<bool>,
    pub app_id: Option<String>,
    pub organization_id: Option<String>,
}

/// A caller-supplied search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Free text; non-whitespace text routes the query onto the text path
    pub text: Option<String>,
    pub filters: Filters,
    pub sort: SortKey,
    /// 1-based page number; values below 1 are treated as 1
    pub page: usize,
    /// Items per page, clamped to 1..=100; 0 selects the configured default
    pub page_size: usize,
    /// Widen matching tolerance (typo-friendly). Default on.
    pub fuzzy: bool,
    /// Tighten matching to near-exact substring behavior
    pub exact_match: bool,
    /// Also match archived content on the filter defaults
    pub include_archived: bool,
    /// Compute facet buckets over the filtered candidate set (text path)
    pub include_facets: bool,
    /// Requesting user; enables per-user enrichment
    pub user_id: Option<String>,
    /// Requesting user's location, recorded with analytics
    pub user_location: Option<String>,
    /// Restrict matching to these fields; empty means all weighted fields
    pub field_scope: Vec<SearchField>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: None,
            filters: Filters::default(),
            sort: SortKey::default(),
            page: 1,
            page_size: 0,
            fuzzy: true,
            exact_match: false,
            include_archived: false,
            include_facets: false,
            user_id: None,
            user_location: None,
            field_scope: Vec::new(),
        }
    }
}

/// Best-effort highlight fragment for one matched field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub field: SearchField,
    pub fragment: String,
}

/// A read-only, enriched projection of one catalog item for display
///
/// User-context fields are `None` (and omitted from serialized output) when
/// no requesting user id was supplied, so callers can distinguish "no user
/// context requested" from "no interaction found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub category: String,
    pub level: Level,
    pub language: String,
    pub tags: Vec<String>,
    pub topics: Vec<String>,
    pub author_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_verified: Option<bool>,
    pub location: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub average_rating: f32,
    pub quality_score: f32,
    pub verified: bool,
    pub has_video: bool,
    pub has_audio: bool,
    pub has_attachments: bool,
    /// Fuzzy-match score; present only on the text path. Lower is closer,
    /// 0 is a perfect match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub highlights: Vec<Highlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// One facet bucket: a distinct field value and its match count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Facet buckets over the filtered candidate set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facets {
    pub content_types: Vec<FacetCount>,
    pub categories: Vec<FacetCount>,
    pub levels: Vec<FacetCount>,
    pub languages: Vec<FacetCount>,
}

/// The response envelope returned for every resolved query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Items for the current page in final sort order
    pub items: Vec<ResultItem>,
    pub total_count: usize,
    /// `ceil(total_count / page_size)`; 0 when nothing matched
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_queries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_you_mean: Option<String>,
}
