//! Translation of caller filters into store predicates
//!
//! Purely structural: every populated filter field maps to the matching
//! predicate field, omitted fields impose no constraint. Status and
//! visibility defaults are the executor's concern, not the compiler's.

use crate::store::StorePredicate;
use crate::types::Filters;

/// Compile a structured filter object into a store predicate
///
/// The exhaustive destructuring means a new `Filters` field fails to compile
/// until it is mapped here.
#[must_use]
pub fn compile(filters: &Filters) -> StorePredicate {
    let Filters {
        content_types,
        categories,
        levels,
        languages,
        statuses,
        author_ids,
        tags,
        topics,
        keywords,
        location,
        min_rating,
        verified_only,
        min_quality,
        published_after,
        published_before,
        updated_after,
        min_views,
        min_likes,
        has_video,
        has_audio,
        has_attachments,
        app_id,
        organization_id,
    } = filters;

    StorePredicate {
        content_types: content_types.clone(),
        categories: categories.clone(),
        levels: levels.clone(),
        languages: languages.clone(),
        statuses: statuses.clone(),
        // Visibility is never caller-controlled; the executor narrows it.
        visibilities: Vec::new(),
        author_ids: author_ids.clone(),
        tags: tags.clone(),
        topics: topics.clone(),
        keywords: keywords.clone(),
        location: location.clone(),
        min_rating: *min_rating,
        verified_only: *verified_only,
        min_quality: *min_quality,
        published_after: *published_after,
        published_before: *published_before,
        updated_after: *updated_after,
        min_views: *min_views,
        min_likes: *min_likes,
        has_video: *has_video,
        has_audio: *has_audio,
        has_attachments: *has_attachments,
        app_id: app_id.clone(),
        organization_id: organization_id.clone(),
    }
}
