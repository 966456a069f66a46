//! Compiled store predicate
//!
//! The shape every conforming store must be able to evaluate: equality,
//! set-membership, list overlap, ranges, and case-insensitive substring for
//! location. [`StorePredicate::matches`] is the executable meaning of the
//! predicate; the text path uses it to intersect candidates in-process and
//! test stores evaluate it directly.

use serde::{Deserialize, Serialize};

use crate::types::{ContentRecord, ContentStatus, ContentType, Level, Visibility};

/// Conjunction of per-field constraints over catalog records
///
/// An empty vector or `None` imposes no constraint on its field (open
/// world); multiple values within one field are OR'd, distinct fields are
/// AND'd. `StorePredicate::default()` is the universal predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorePredicate {
    pub content_types: Vec<ContentType>,
    pub categories: Vec<String>,
    pub levels: Vec<Level>,
    pub languages: Vec<String>,
    pub statuses: Vec<ContentStatus>,
    pub visibilities: Vec<Visibility>,
    pub author_ids: Vec<String>,
    /// Overlap: the record's tag list must contain at least one of these
    pub tags: Vec<String>,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    /// Case-insensitive substring match against the record location
    pub location: Option<String>,
    pub min_rating: Option<f32>,
    pub verified_only: bool,
    pub min_quality: Option<f32>,
    pub published_after: Option<chrono::DateTime<chrono::Utc>>,
    pub published_before: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_after: Option<chrono::DateTime<chrono::Utc>>,
    pub min_views: Option<u64>,
    pub min_likes: Option<u64>,
    pub has_video: Option<bool>,
    pub has_audio: Option<bool>,
    pub has_attachments: Option<bool>,
    pub app_id: Option<String>,
    pub organization_id: Option<String>,
}

fn any_eq_ignore_case(values: &[String], actual: &str) -> bool {
    values.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(actual))
}

fn lists_overlap(values: &[String], actual: &[String]) -> bool {
    values.is_empty()
        || values
            .iter()
            .any(|v| actual.iter().any(|a| a.eq_ignore_ascii_case(v)))
}

impl StorePredicate {
    /// The predicate matching every record
    #[must_use]
    pub fn universal() -> Self {
        Self::default()
    }

    /// Evaluate this predicate against one record
    #[must_use]
    pub fn matches(&self, record: &ContentRecord) -> bool {
        if !self.content_types.is_empty() && !self.content_types.contains(&record.content_type) {
            return false;
        }
        if !any_eq_ignore_case(&self.categories, &record.category) {
            return false;
        }
        if !self.levels.is_empty() && !self.levels.contains(&record.level) {
            return false;
        }
        if !any_eq_ignore_case(&self.languages, &record.language) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&record.status) {
            return false;
        }
        if !self.visibilities.is_empty() && !self.visibilities.contains(&record.visibility) {
            return false;
        }
        if !self.author_ids.is_empty() && !self.author_ids.contains(&record.author_id) {
            return false;
        }
        if !lists_overlap(&self.tags, &record.tags) {
            return false;
        }
        if !lists_overlap(&self.topics, &record.topics) {
            return false;
        }
        if !lists_overlap(&self.keywords, &record.keywords) {
            return false;
        }
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            let matched = record
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&needle));
            if !matched {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if record.average_rating < min {
                return false;
            }
        }
        if self.verified_only && !record.verified {
            return false;
        }
        if let Some(min) = self.min_quality {
            if record.quality_score < min {
                return false;
            }
        }
        if let Some(after) = self.published_after {
            if record.published_at < after {
                return false;
            }
        }
        if let Some(before) = self.published_before {
            if record.published_at > before {
                return false;
            }
        }
        if let Some(after) = self.updated_after {
            if record.updated_at < after {
                return false;
            }
        }
        if let Some(min) = self.min_views {
            if record.view_count < min {
                return false;
            }
        }
        if let Some(min) = self.min_likes {
            if record.like_count < min {
                return false;
            }
        }
        if let Some(wanted) = self.has_video {
            if record.has_video != wanted {
                return false;
            }
        }
        if let Some(wanted) = self.has_audio {
            if record.has_audio != wanted {
                return false;
            }
        }
        if let Some(wanted) = self.has_attachments {
            if record.has_attachments != wanted {
                return false;
            }
        }
        if let Some(app) = &self.app_id {
            if record.app_id.as_deref() != Some(app.as_str()) {
                return false;
            }
        }
        if let Some(org) = &self.organization_id {
            if record.organization_id.as_deref() != Some(org.as_str()) {
                return false;
            }
        }
        true
    }
}
