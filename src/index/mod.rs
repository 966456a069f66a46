//! In-memory fuzzy document index
//!
//! The index is a denormalized snapshot of eligible catalog content with a
//! precomputed lowercase text per weighted field. It is immutable once
//! built: rebuilds produce a whole new index that the cache swaps in
//! atomically, so in-flight readers keep a consistent view.

pub mod builder;
pub mod cache;

pub use builder::IndexBuilder;
pub use cache::IndexCache;

use chrono::{DateTime, Utc};

use crate::types::{ContentRecord, ContentType, Level, SearchField};

/// Denormalized projection of one catalog item used only by the fuzzy index
#[derive(Debug, Clone)]
pub struct SearchDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub content_type: ContentType,
    pub category: String,
    pub level: Level,
    pub language: String,
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
    pub quality_score: f32,
    pub verified: bool,
    pub has_video: bool,
    pub has_audio: bool,
    pub has_attachments: bool,
    pub app_id: Option<String>,
    pub organization_id: Option<String>,
    /// Lowercased text per weighted field, in [`SearchField::all`] order.
    /// List fields are joined with single spaces.
    search_texts: [String; 6],
}

impl SearchDocument {
    /// Project a catalog record into an index document
    #[must_use]
    pub fn from_record(record: &ContentRecord) -> Self {
        let search_texts = [
            record.title.to_lowercase(),
            record.description.to_lowercase(),
            record.body.to_lowercase(),
            record.tags.join(" ").to_lowercase(),
            record.keywords.join(" ").to_lowercase(),
            record.topics.join(" ").to_lowercase(),
        ];
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            body: record.body.clone(),
            content_type: record.content_type,
            category: record.category.clone(),
            level: record.level,
            language: record.language.clone(),
            tags: record.tags.clone(),
            keywords: record.keywords.clone(),
            topics: record.topics.clone(),
            author_id: record.author_id.clone(),
            author_name: record.author_name.clone(),
            location: record.location.clone(),
            published_at: record.published_at,
            updated_at: record.updated_at,
            view_count: record.view_count,
            like_count: record.like_count,
            quality_score: record.quality_score,
            verified: record.verified,
            has_video: record.has_video,
            has_audio: record.has_audio,
            has_attachments: record.has_attachments,
            app_id: record.app_id.clone(),
            organization_id: record.organization_id.clone(),
            search_texts,
        }
    }

    /// Precomputed lowercase text for one weighted field
    #[must_use]
    pub fn search_text(&self, field: SearchField) -> &str {
        &self.search_texts[field.index()]
    }

    /// Original-case text for one weighted field, used for highlight
    /// fragments. List fields are joined with single spaces.
    #[must_use]
    pub fn display_text(&self, field: SearchField) -> String {
        match field {
            SearchField::Title => self.title.clone(),
            SearchField::Description => self.description.clone(),
            SearchField::Body => self.body.clone(),
            SearchField::Tags => self.tags.join(" "),
            SearchField::Keywords => self.keywords.join(" "),
            SearchField::Topics => self.topics.join(" "),
        }
    }
}

/// The fuzzy-searchable snapshot of eligible catalog content
///
/// Owned exclusively by [`IndexCache`] behind an `Arc`; never patched in
/// place. Document order is the store-snapshot order and defines the stable
/// tie-break for equal relevance scores.
#[derive(Debug)]
pub struct SearchIndex {
    documents: Vec<SearchDocument>,
    built_at: DateTime<Utc>,
}

impl SearchIndex {
    /// Assemble an index from projected documents
    #[must_use]
    pub fn new(documents: Vec<SearchDocument>, built_at: DateTime<Utc>) -> Self {
        Self {
            documents,
            built_at,
        }
    }

    /// Documents in store-snapshot order
    #[must_use]
    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    /// When this index was built
    #[must_use]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate the correction vocabulary: title tokens and tags of every
    /// document, in original case
    pub(crate) fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().flat_map(|doc| {
            doc.title
                .split_whitespace()
                .chain(doc.tags.iter().map(String::as_str))
        })
    }
}
